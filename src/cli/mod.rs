use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jiff::{Timestamp, tz::TimeZone};
use souk::{
    fixtures::{Fixture, FixtureError},
    render::RenderError,
    store::{PriceStore, StoreError},
    synthetic::GeneratorError,
};
use thiserror::Error;
use tracing::info;

use crate::cli::logging::LoggingArgs;

mod generate;
mod history;
pub(crate) mod logging;
mod markets;
mod products;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("Unknown time zone {name}: {source}")]
    TimeZone { name: String, source: jiff::Error },
}

#[derive(Debug, Parser)]
#[command(name = "souk", about = "Market price histories and listings", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    pub(crate) logging: LoggingArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Where prices are loaded from.
#[derive(Debug, Args)]
struct SourceArgs {
    /// Fixture directory
    #[arg(long, global = true, env = "SOUK_FIXTURES", default_value = "./fixtures")]
    fixtures: PathBuf,

    /// Fixture set name
    #[arg(long, global = true, env = "SOUK_SET", default_value = "default")]
    set: String,

    /// Reference time (RFC 3339); defaults to the current time
    #[arg(long, global = true, env = "SOUK_NOW")]
    now: Option<Timestamp>,

    /// Time zone calendar days are computed in
    #[arg(long, global = true, env = "SOUK_TIME_ZONE", default_value = "UTC")]
    time_zone: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Daily price history and statistics for a product
    History(history::HistoryArgs),

    /// Product listing with price summaries
    Products(products::ProductsArgs),

    /// Market listing with price summaries
    Markets(markets::MarketsArgs),

    /// Add a synthetic price history for a product and chart it
    Generate(generate::GenerateArgs),
}

/// Everything a command needs to run.
#[derive(Debug)]
pub(crate) struct Context {
    pub(crate) store: PriceStore,
    pub(crate) now: Timestamp,
    pub(crate) time_zone: TimeZone,
}

impl Cli {
    /// Parse arguments after loading `.env`.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) fn run(self) -> Result<(), CliError> {
        let context = self.source.load()?;

        match self.command {
            Commands::History(args) => history::run(&context, &args),
            Commands::Products(args) => products::run(&context, &args),
            Commands::Markets(args) => markets::run(&context, &args),
            Commands::Generate(args) => generate::run(context, &args),
        }
    }
}

impl SourceArgs {
    fn load(&self) -> Result<Context, CliError> {
        let now = self.now.unwrap_or_else(Timestamp::now);

        let time_zone =
            TimeZone::get(&self.time_zone).map_err(|source| CliError::TimeZone {
                name: self.time_zone.clone(),
                source,
            })?;

        let mut fixture = Fixture::with_base_path(&self.fixtures).at(now);
        fixture.load_set(&self.set)?;

        let store = fixture.into_store();

        info!(
            fixtures = %self.fixtures.display(),
            set = %self.set,
            submissions = store.submissions().len(),
            "loaded fixture set"
        );

        Ok(Context {
            store,
            now,
            time_zone,
        })
    }
}
