use clap::Parser;

use crate::{
    cli::SourceArgs,
    parameters::{Document, ParameterStore},
    prelude::*,
    tables::{build_multipliers_table, build_rates_table, build_urgency_table},
};

#[derive(Parser)]
pub struct ParametersArgs {
    #[clap(flatten)]
    pub sources: SourceArgs,

    /// Print the parameters as a TOML document accepted by `--parameters`.
    #[clap(long)]
    pub export: bool,
}

#[instrument(skip_all)]
pub fn show_parameters(args: &ParametersArgs, store: &mut ParameterStore) -> Result {
    let loaded = store.get_or_load(&args.sources.sources());
    if args.export {
        print!("{}", toml::to_string_pretty(&Document::from(&loaded.parameters))?);
    } else {
        println!("{}", build_rates_table(&loaded.parameters));
        println!("{}", build_multipliers_table(&loaded.parameters.multipliers));
        println!("{}", build_urgency_table());
    }
    if let Some(advisory) = &loaded.advisory {
        eprintln!("⚠ {advisory}");
    }
    Ok(())
}
