mod document;
mod error;
mod multipliers;
mod rates;
mod source;
mod store;
mod table;
mod workbook;

use std::collections::BTreeMap;

pub use self::{document::Document, source::Source, store::ParameterStore};
use crate::{
    core::{
        schedule::{Brackets, RateSchedule},
        situation::Multipliers,
    },
    parameters::{
        multipliers::parse_multiplier_table,
        rates::parse_rate_table,
        table::Table,
        workbook::{MULTIPLIERS_SHEET, RATES_SHEET, Workbook},
    },
    prelude::*,
    quantity::currency::Dirhams,
};

/// Rate schedules by city name, plus the situational multipliers.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameters {
    pub cities: BTreeMap<String, RateSchedule>,
    pub multipliers: Multipliers,
}

impl Parameters {
    /// Built-in sample dataset, used whenever the configured sources are unusable.
    pub fn fallback() -> Self {
        Self {
            cities: BTreeMap::from([
                (
                    "Tanger".to_owned(),
                    RateSchedule::builder()
                        .base_charge(Dirhams(1.0))
                        .brackets(Brackets::from([(10.0, 6.5), (30.0, 5.5), (50.0, 4.5)]))
                        .build(),
                ),
                (
                    "Casablanca".to_owned(),
                    RateSchedule::builder()
                        .base_charge(Dirhams(3.0))
                        .brackets(Brackets::from([(10.0, 7.5), (30.0, 6.0), (50.0, 5.0)]))
                        .build(),
                ),
            ]),
            multipliers: Multipliers::default(),
        }
    }

    /// Look up the city, falling back to the first one when it is unknown.
    ///
    /// Returns the name of the city actually used.
    pub fn schedule_or_first(&self, city: &str) -> Option<(&str, &RateSchedule)> {
        self.cities
            .get_key_value(city)
            .or_else(|| self.cities.first_key_value())
            .map(|(name, schedule)| (name.as_str(), schedule))
    }
}

/// Configured parameter sources.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Sources {
    /// Nothing configured, use the built-in dataset.
    None,

    /// Spreadsheet tables: one row per city, and optionally one row per multiplier type.
    Tables { rates: Source, multipliers: Option<Source> },

    /// Excel workbook with a `BaseRates` sheet and a `Multipliers` sheet.
    Workbook(Source),

    /// Typed parameter document.
    Document(Source),
}

/// Parameters along with the advisory to show when something had to be substituted.
#[must_use]
#[derive(Debug)]
pub struct Loaded {
    pub parameters: Parameters,
    pub advisory: Option<String>,
}

impl Loaded {
    fn fallback(advisory: String) -> Self {
        Self { parameters: Parameters::fallback(), advisory: Some(advisory) }
    }

    /// Load the parameters, never failing: unusable sources are substituted with the built-in
    /// defaults, and the advisory explains what happened.
    #[instrument(skip_all)]
    pub fn load(sources: &Sources) -> Self {
        match sources {
            Sources::None => {
                info!("no parameter sources configured");
                Self::fallback("No parameter sources configured, using the built-in rates.".into())
            }

            Sources::Document(source) => match load_document(source) {
                Ok(parameters) => Self { parameters, advisory: None },
                Err(error) => {
                    warn!(%source, error = format!("{error:#}"), "failed to load the parameters");
                    Self::fallback(format!(
                        "Failed to load the parameters: {error:#}. Using the built-in rates."
                    ))
                }
            },

            Sources::Tables { rates, multipliers } => Self::from_tables(
                load_rate_table(rates),
                multipliers.as_ref().map(load_multiplier_table),
            ),

            Sources::Workbook(source) => match Workbook::fetch(source) {
                Ok(mut workbook) => Self::from_tables(
                    workbook.sheet(RATES_SHEET).and_then(|table| Ok(parse_rate_table(&table)?)),
                    Some(
                        workbook
                            .sheet(MULTIPLIERS_SHEET)
                            .and_then(|table| Ok(parse_multiplier_table(&table)?)),
                    ),
                ),
                Err(error) => {
                    warn!(%source, error = format!("{error:#}"), "failed to open the workbook");
                    Self::fallback(format!(
                        "Failed to open the workbook: {error:#}. Using the built-in rates."
                    ))
                }
            },
        }
    }

    /// Combine the rates with the multipliers, each of which may have failed to load.
    ///
    /// Unusable rates discard everything in favour of the built-in dataset, while unusable
    /// multipliers only get replaced with the defaults.
    fn from_tables(
        cities: Result<BTreeMap<String, RateSchedule>>,
        multipliers: Option<Result<Multipliers>>,
    ) -> Self {
        let cities = match cities {
            Ok(cities) => cities,
            Err(error) => {
                warn!(error = format!("{error:#}"), "failed to load the rates");
                return Self::fallback(format!(
                    "Failed to load the rates: {error:#}. Using the built-in rates."
                ));
            }
        };
        match multipliers {
            None => {
                info!("no multiplier source configured");
                Self {
                    parameters: Parameters { cities, multipliers: Multipliers::default() },
                    advisory: None,
                }
            }
            Some(Ok(multipliers)) => {
                Self { parameters: Parameters { cities, multipliers }, advisory: None }
            }
            Some(Err(error)) => {
                warn!(error = format!("{error:#}"), "failed to load the multipliers");
                Self {
                    parameters: Parameters { cities, multipliers: Multipliers::default() },
                    advisory: Some(format!(
                        "Failed to load the multipliers: {error:#}. Using the default multipliers."
                    )),
                }
            }
        }
    }
}

fn load_rate_table(source: &Source) -> Result<BTreeMap<String, RateSchedule>> {
    let table = Table::from_csv(&source.fetch()?)
        .with_context(|| format!("failed to parse the rate table `{source}`"))?;
    Ok(parse_rate_table(&table)?)
}

fn load_multiplier_table(source: &Source) -> Result<Multipliers> {
    let table = Table::from_csv(&source.fetch()?)
        .with_context(|| format!("failed to parse the multiplier table `{source}`"))?;
    Ok(parse_multiplier_table(&table)?)
}

fn load_document(source: &Source) -> Result<Parameters> {
    let document: Document =
        toml::from_str(&source.fetch()?).context("failed to parse the parameter document")?;
    Ok(document.into_parameters()?)
}
