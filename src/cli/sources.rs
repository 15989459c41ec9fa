use clap::Parser;

use crate::parameters::{Source, Sources};

#[derive(Parser)]
pub struct SourceArgs {
    /// Rate table with one row per city: a CSV file or an `http(s)://` CSV export link.
    #[clap(long, env = "TARIF_RATES", conflicts_with_all = ["parameters", "workbook"])]
    pub rates: Option<Source>,

    /// Multiplier table with `Type` and `Value` columns: a CSV file or an `http(s)://` link.
    #[clap(long, env = "TARIF_MULTIPLIERS", requires = "rates")]
    pub multipliers: Option<Source>,

    /// Excel workbook with `BaseRates` and `Multipliers` sheets: a file or an `http(s)://` link.
    #[clap(long, env = "TARIF_WORKBOOK", conflicts_with = "parameters")]
    pub workbook: Option<Source>,

    /// TOML parameter document, see `tarif parameters --export`.
    #[clap(long, env = "TARIF_PARAMETERS")]
    pub parameters: Option<Source>,
}

impl SourceArgs {
    pub fn sources(&self) -> Sources {
        match (&self.parameters, &self.workbook, &self.rates) {
            (Some(document), _, _) => Sources::Document(document.clone()),
            (None, Some(workbook), _) => Sources::Workbook(workbook.clone()),
            (None, None, Some(rates)) => {
                Sources::Tables { rates: rates.clone(), multipliers: self.multipliers.clone() }
            }
            (None, None, None) => Sources::None,
        }
    }
}
