#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod document;
mod parameters;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Command, quote, show_parameters},
    parameters::ParameterStore,
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
    info!(version = crate_version!(), "starting…");

    let mut store = ParameterStore::default();
    match Args::parse().command {
        Command::Quote(args) => quote(&args, &mut store)?,
        Command::Parameters(args) => show_parameters(&args, &mut store)?,
    }

    info!("done!");
    Ok(())
}
