use std::io;

use clap::Args;
use decimal_percentage::Percentage;
use rand::{SeedableRng, rngs::StdRng};
use souk::{
    history::{HistoryQuery, HistoryWindow, PriceHistory},
    markets::MarketKey,
    products::ProductKey,
    render,
    synthetic::HistoryGenerator,
};
use tracing::info;

use crate::cli::{CliError, Context};

#[derive(Debug, Args)]
pub(crate) struct GenerateArgs {
    /// Product id
    product: String,

    /// Market ids; defaults to the markets already reporting the product, or every market
    #[arg(short, long, value_delimiter = ',')]
    markets: Vec<String>,

    /// Number of days to generate, ending at the reference time
    #[arg(short, long, default_value_t = 90)]
    days: u32,

    /// Random seed; a random one is chosen and logged when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Chance that a market reports on any given day
    #[arg(long, default_value_t = 0.7)]
    submission_probability: f64,

    /// Window of the history printed afterwards
    #[arg(long, value_enum, default_value_t = HistoryWindow::Quarter)]
    window: HistoryWindow,
}

pub(crate) fn run(mut context: Context, args: &GenerateArgs) -> Result<(), CliError> {
    let product = context.store.product_key(&args.product)?;
    let markets = target_markets(&context, args, product)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let generator = HistoryGenerator {
        submission_probability: Percentage::from(args.submission_probability),
        time_zone: context.time_zone.clone(),
        ..HistoryGenerator::default()
    };

    let inserted = generator.populate(
        &mut rng,
        &mut context.store,
        product,
        &markets,
        args.days,
        context.now,
    )?;

    info!(seed, inserted, product = %args.product, "generated synthetic history");

    let query =
        HistoryQuery::new(args.window, context.now).with_time_zone(context.time_zone.clone());
    let history = PriceHistory::build(&context.store, product, &query);

    render::write_history(io::stdout().lock(), &context.store, &history)?;

    Ok(())
}

fn target_markets(
    context: &Context,
    args: &GenerateArgs,
    product: ProductKey,
) -> Result<Vec<MarketKey>, CliError> {
    if !args.markets.is_empty() {
        return args
            .markets
            .iter()
            .map(|id| Ok(context.store.market_key(id)?))
            .collect();
    }

    let reporting = context.store.markets_for_product(product);

    if reporting.is_empty() {
        Ok(context.store.markets().map(|(key, _)| key).collect())
    } else {
        Ok(reporting)
    }
}
