use std::io;

use clap::Args;
use souk::{
    listings::{ProductFilter, SortOrder, product_listings},
    products::Category,
    render,
};

use crate::cli::{CliError, Context};

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Case-insensitive name search
    #[arg(short, long)]
    query: Option<String>,

    /// Only list this category
    #[arg(short, long, value_enum)]
    category: Option<Category>,

    /// Sort order
    #[arg(short, long, value_enum, default_value_t = SortOrder::Name)]
    sort: SortOrder,
}

pub(crate) fn run(context: &Context, args: &ProductsArgs) -> Result<(), CliError> {
    let filter = ProductFilter {
        query: args.query.clone(),
        category: args.category,
    };

    let listings = product_listings(&context.store, &filter, args.sort);

    render::write_product_listings(io::stdout().lock(), &context.store, &listings)?;

    Ok(())
}
