//! Table Rendering
//!
//! Terminal tables for listings and price histories.

use std::io;

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    history::PriceHistory,
    listings::{MarketListing, ProductListing},
    markets::MarketKey,
    statistics::{PriceStatistics, Trend},
    store::PriceStore,
};

/// Errors writing tables.
#[derive(Debug, Error)]
pub enum RenderError {
    /// IO error
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Write the product listing as a table.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_product_listings(
    mut out: impl io::Write,
    store: &PriceStore,
    listings: &[ProductListing],
) -> Result<(), RenderError> {
    let currency = store.currency();
    let mut builder = Builder::default();

    builder.push_record([
        "Product",
        "Category",
        "Average",
        "Min",
        "Max",
        "Reports",
        "Markets",
        "Updated",
        "Cheapest",
    ]);

    for listing in listings {
        let cheapest = listing
            .top_markets
            .iter()
            .map(|&market| market_name(store, market))
            .collect::<Vec<_>>()
            .join("\n");

        builder.push_record([
            listing.name.clone(),
            listing.category.to_string(),
            money(listing.summary.average, currency),
            money(listing.summary.min, currency),
            money(listing.summary.max, currency),
            listing.summary.count.to_string(),
            listing.market_count.to_string(),
            updated(listing.latest_update),
            cheapest,
        ]);
    }

    write_table(&mut out, builder, 2..7)
}

/// Write the market listing as a table.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_market_listings(
    mut out: impl io::Write,
    store: &PriceStore,
    listings: &[MarketListing],
) -> Result<(), RenderError> {
    let currency = store.currency();
    let mut builder = Builder::default();

    builder.push_record([
        "Market", "City", "Type", "Average", "Reports", "Products", "Updated",
    ]);

    for listing in listings {
        let city = store
            .city(listing.city)
            .map_or_else(|| "<unknown>".to_string(), |city| city.name.clone());

        builder.push_record([
            listing.name.clone(),
            city,
            listing.market_type.to_string(),
            money(listing.summary.average, currency),
            listing.summary.count.to_string(),
            listing.product_count.to_string(),
            updated(listing.latest_update),
        ]);
    }

    write_table(&mut out, builder, 3..6)
}

/// Write a price history as one row per day, one column per charted market, followed by the
/// summary statistics.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_history(
    mut out: impl io::Write,
    store: &PriceStore,
    history: &PriceHistory,
) -> Result<(), RenderError> {
    let currency = store.currency();

    let title = store
        .product(history.product())
        .map_or("<unknown>", |product| product.name.as_str());

    if history.is_empty() {
        writeln!(out, "\nNo prices recorded for {title} in this window.")?;

        return Ok(());
    }

    let mut builder = Builder::default();
    let mut header = vec!["Date".to_string()];

    header.extend(
        history
            .markets()
            .iter()
            .map(|&market| market_name(store, market)),
    );
    header.push("Average".to_string());

    builder.push_record(header);

    for bucket in history.buckets() {
        let mut row = vec![bucket.date.to_string()];

        row.extend(history.markets().iter().map(|&market| {
            bucket
                .price_for(market)
                .map(|price| money(price, currency))
                .unwrap_or_default()
        }));
        row.push(money(bucket.average, currency));

        builder.push_record(row);
    }

    writeln!(out, "\n{title}")?;

    write_table(&mut out, builder, 1..history.markets().len() + 2)?;
    write_statistics(&mut out, &history.statistics(), currency)
}

/// Write summary statistics as aligned label/value lines.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_statistics(
    mut out: impl io::Write,
    stats: &PriceStatistics,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    let change = format!(
        "{} ({}%) {}",
        signed_money(stats.change, currency),
        signed(stats.change_percent.round_dp(2).normalize()),
        trend_arrow(stats.trend)
    );

    let range = format!(
        "{} - {}",
        money(stats.min, currency),
        money(stats.max, currency)
    );

    let lines = [
        ("Current:", money(stats.current, currency)),
        ("Previous:", money(stats.previous, currency)),
        ("Average:", money(stats.average, currency)),
        ("Range:", range),
        ("Change:", change),
    ];

    let label_width = lines
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or_default();

    for (label, value) in lines {
        writeln!(out, " {label:>label_width$}  {value}")?;
    }

    writeln!(out)?;

    Ok(())
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    numeric_columns: std::ops::Range<usize>,
) -> Result<(), RenderError> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric_columns), Alignment::right());

    writeln!(out, "\n{table}")?;

    Ok(())
}

fn market_name(store: &PriceStore, market: MarketKey) -> String {
    store
        .market(market)
        .map_or_else(|| "<unknown>".to_string(), |market| market.name.clone())
}

fn money(amount: Decimal, currency: &'static Currency) -> String {
    Money::from_decimal(amount.round_dp(2), currency).to_string()
}

fn signed_money(amount: Decimal, currency: &'static Currency) -> String {
    if amount.is_sign_negative() {
        format!("-{}", money(amount.abs(), currency))
    } else {
        format!("+{}", money(amount, currency))
    }
}

fn signed(value: Decimal) -> String {
    if value.is_sign_negative() {
        value.to_string()
    } else {
        format!("+{value}")
    }
}

fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "↑ up",
        Trend::Down => "↓ down",
        Trend::Stable => "→ stable",
    }
}

fn updated(at: Option<Timestamp>) -> String {
    at.map(|at| at.strftime("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use jiff::civil::time;
    use rust_decimal_macros::dec;
    use rusty_money::iso;
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;
    use crate::{
        cities::City,
        history::{HistoryQuery, HistoryWindow},
        listings::{MarketFilter, ProductFilter, SortOrder, market_listings, product_listings},
        markets::{Market, MarketType, OpeningHours},
        prices::Price,
        products::{Category, Product},
        submissions::PriceSubmission,
    };

    fn store() -> Result<(PriceStore, Timestamp), Box<dyn std::error::Error>> {
        let now: Timestamp = "2026-10-17T12:00:00Z".parse()?;
        let mut store = PriceStore::default();

        let city = store.insert_city(City {
            id: "marrakech".to_string(),
            name: "Marrakech".to_string(),
            region: "Marrakech-Safi".to_string(),
        })?;

        let market = store.insert_market(Market {
            id: "jemaa".to_string(),
            name: "Jemaa el-Fna".to_string(),
            city,
            market_type: MarketType::Traditional,
            opening_hours: OpeningHours::daily(time(8, 0, 0, 0), time(22, 0, 0, 0))?,
        })?;

        let product = store.insert_product(Product {
            id: "tomatoes".to_string(),
            name: "Tomatoes".to_string(),
            category: Category::Vegetables,
            units: smallvec!["kg".to_string()],
        })?;

        for (price, at) in [
            (dec!(8.50), "2026-10-15T09:00:00Z"),
            (dec!(8.25), "2026-10-16T09:00:00Z"),
        ] {
            store.insert_submission(
                PriceSubmission::new(product, market, Price::new(price)?, "kg", at.parse()?),
                now,
            )?;
        }

        Ok((store, now))
    }

    #[test]
    fn product_table_lists_names_and_cheapest_markets() -> TestResult {
        let (store, _) = store()?;
        let listings = product_listings(&store, &ProductFilter::default(), SortOrder::Name);

        let mut out = Vec::new();
        write_product_listings(&mut out, &store, &listings)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("Tomatoes"), "missing product name:\n{text}");
        assert!(text.contains("vegetables"), "missing category:\n{text}");
        assert!(text.contains("Jemaa el-Fna"), "missing market:\n{text}");

        Ok(())
    }

    #[test]
    fn market_table_lists_city_and_type() -> TestResult {
        let (store, _) = store()?;
        let listings = market_listings(&store, &MarketFilter::default(), SortOrder::Name);

        let mut out = Vec::new();
        write_market_listings(&mut out, &store, &listings)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("Marrakech"), "missing city:\n{text}");
        assert!(text.contains("traditional"), "missing type:\n{text}");

        Ok(())
    }

    #[test]
    fn history_table_has_a_row_per_day_and_statistics() -> TestResult {
        let (store, now) = store()?;
        let product = store.product_key("tomatoes")?;
        let history = PriceHistory::build(
            &store,
            product,
            &HistoryQuery::new(HistoryWindow::Week, now),
        );

        let mut out = Vec::new();
        write_history(&mut out, &store, &history)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("2026-10-15"), "missing first day:\n{text}");
        assert!(text.contains("2026-10-16"), "missing second day:\n{text}");
        assert!(text.contains("(-2.94%)"), "missing change percent:\n{text}");
        assert!(text.contains("down"), "missing trend:\n{text}");

        Ok(())
    }

    #[test]
    fn empty_history_prints_a_notice() -> TestResult {
        let (store, now) = store()?;
        let product = store.product_key("tomatoes")?;
        let later = now.checked_add(jiff::SignedDuration::from_hours(24 * 30))?;
        let history = PriceHistory::build(
            &store,
            product,
            &HistoryQuery::new(HistoryWindow::Week, later),
        );

        let mut out = Vec::new();
        write_history(&mut out, &store, &history)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("No prices recorded for Tomatoes"), "{text}");

        Ok(())
    }

    #[test]
    fn positive_changes_carry_a_sign() -> TestResult {
        let stats = PriceStatistics::from_daily_averages(&[dec!(10), dec!(11)]);

        let mut out = Vec::new();
        write_statistics(&mut out, &stats, iso::MAD)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("(+10%)"), "{text}");
        assert!(text.contains("up"), "{text}");

        Ok(())
    }
}
