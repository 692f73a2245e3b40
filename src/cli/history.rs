use std::io;

use clap::Args;
use souk::{
    history::{DEFAULT_MAX_MARKETS, HistoryQuery, HistoryWindow, PriceHistory},
    render,
};

use crate::cli::{CliError, Context};

#[derive(Debug, Args)]
pub(crate) struct HistoryArgs {
    /// Product id
    product: String,

    /// How far back to look
    #[arg(long, value_enum, default_value_t = HistoryWindow::Month)]
    window: HistoryWindow,

    /// Maximum number of markets to chart
    #[arg(long, default_value_t = DEFAULT_MAX_MARKETS)]
    max_markets: usize,
}

pub(crate) fn run(context: &Context, args: &HistoryArgs) -> Result<(), CliError> {
    let product = context.store.product_key(&args.product)?;

    let query = HistoryQuery::new(args.window, context.now)
        .with_time_zone(context.time_zone.clone())
        .with_max_markets(args.max_markets);

    let history = PriceHistory::build(&context.store, product, &query);

    render::write_history(io::stdout().lock(), &context.store, &history)?;

    Ok(())
}
