mod parameters;
mod quote;
mod sources;

use clap::{Parser, Subcommand};

pub use self::{
    parameters::{ParametersArgs, show_parameters},
    quote::{QuoteArgs, quote},
    sources::SourceArgs,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Price a trip: print the breakdown and optionally write the quote document.
    #[clap(name = "quote")]
    Quote(Box<QuoteArgs>),

    /// Show the loaded rates, the situational multipliers, and the urgency levels.
    #[clap(name = "parameters")]
    Parameters(Box<ParametersArgs>),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args() {
        Args::command().debug_assert();
    }
}
