use std::io;

use clap::Args;
use souk::{
    listings::{MarketFilter, SortOrder, market_listings},
    markets::MarketType,
    render,
};

use crate::cli::{CliError, Context};

#[derive(Debug, Args)]
pub(crate) struct MarketsArgs {
    /// Case-insensitive name search
    #[arg(short, long)]
    query: Option<String>,

    /// Only list markets in this city (by id)
    #[arg(long)]
    city: Option<String>,

    /// Only list markets of this type
    #[arg(long = "type", value_enum)]
    market_type: Option<MarketType>,

    /// Sort order
    #[arg(short, long, value_enum, default_value_t = SortOrder::Name)]
    sort: SortOrder,
}

pub(crate) fn run(context: &Context, args: &MarketsArgs) -> Result<(), CliError> {
    let city = args
        .city
        .as_deref()
        .map(|city| context.store.city_key(city))
        .transpose()?;

    let filter = MarketFilter {
        query: args.query.clone(),
        city,
        market_type: args.market_type,
    };

    let listings = market_listings(&context.store, &filter, args.sort);

    render::write_market_listings(io::stdout().lock(), &context.store, &listings)?;

    Ok(())
}
