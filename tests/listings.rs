//! Integration tests for product and market listings over the default fixture set.

use smallvec::smallvec;
use testresult::TestResult;

use souk::{
    fixtures::Fixture,
    history::{HistoryQuery, HistoryWindow, PriceHistory},
    listings::{
        Listing, MarketFilter, ProductFilter, SortOrder, market_listings, product_listings,
    },
    markets::MarketType,
    products::{Category, Product},
    store::PriceStore,
};

fn store() -> Result<PriceStore, Box<dyn std::error::Error>> {
    let mut fixture = Fixture::new().at("2026-10-17T12:00:00Z".parse()?);

    fixture.load_set("default")?;

    Ok(fixture.into_store())
}

#[test]
fn vegetables_named_tom_are_only_tomatoes() -> TestResult {
    let store = store()?;

    let filter = ProductFilter {
        query: Some("tom".to_string()),
        category: Some(Category::Vegetables),
    };

    let names: Vec<String> = product_listings(&store, &filter, SortOrder::Name)
        .into_iter()
        .map(|listing| listing.name)
        .collect();

    assert_eq!(names, ["Tomatoes"]);

    Ok(())
}

#[test]
fn query_alone_matches_across_categories() -> TestResult {
    let store = store()?;

    let filter = ProductFilter {
        query: Some("  TOMATO ".to_string()),
        category: None,
    };

    let names: Vec<String> = product_listings(&store, &filter, SortOrder::Name)
        .into_iter()
        .map(|listing| listing.name)
        .collect();

    assert_eq!(names, ["Tomato Paste", "Tomatoes"]);

    Ok(())
}

#[test]
fn top_markets_are_the_three_cheapest() -> TestResult {
    let store = store()?;
    let tomatoes = store.product_key("tomatoes")?;

    let listing = product_listings(&store, &ProductFilter::default(), SortOrder::Name)
        .into_iter()
        .find(|listing| listing.product == tomatoes)
        .ok_or("tomatoes not listed")?;

    assert_eq!(listing.market_count, 5);
    assert_eq!(listing.top_markets.len(), 3);

    let averages: Vec<_> = listing
        .top_markets
        .iter()
        .map(|&market| {
            let prices: Vec<_> = store
                .submissions_for_product(tomatoes)
                .filter(|s| s.market() == market)
                .map(|s| s.price().amount())
                .collect();

            souk::pricing::mean(prices)
        })
        .collect();

    assert!(
        averages.windows(2).all(|pair| matches!(pair, [a, b] if a <= b)),
        "top markets must be cheapest first: {averages:?}"
    );

    Ok(())
}

#[test]
fn price_sorts_are_ordered() -> TestResult {
    let store = store()?;

    let low = product_listings(&store, &ProductFilter::default(), SortOrder::PriceLow);
    let high = product_listings(&store, &ProductFilter::default(), SortOrder::PriceHigh);

    assert!(
        low.windows(2)
            .all(|pair| matches!(pair, [a, b] if a.summary().average <= b.summary().average)),
        "price-low must be ascending"
    );
    assert!(
        high.windows(2)
            .all(|pair| matches!(pair, [a, b] if a.summary().average >= b.summary().average)),
        "price-high must be descending"
    );
    assert_eq!(low.len(), high.len());

    Ok(())
}

#[test]
fn products_without_submissions_are_still_listed() -> TestResult {
    let store = store()?;

    let mint = product_listings(
        &store,
        &ProductFilter {
            query: Some("mint".to_string()),
            category: None,
        },
        SortOrder::Recent,
    );

    let [listing] = mint.as_slice() else {
        return Err("expected one mint listing".into());
    };

    assert_eq!(listing.summary.count, 0);
    assert!(listing.latest_update.is_none());
    assert!(listing.top_markets.is_empty());

    Ok(())
}

#[test]
fn markets_filter_by_city_and_type() -> TestResult {
    let store = store()?;
    let casablanca = store.city_key("casablanca")?;

    let in_city = market_listings(
        &store,
        &MarketFilter {
            city: Some(casablanca),
            ..MarketFilter::default()
        },
        SortOrder::Name,
    );

    assert_eq!(in_city.len(), 3);
    assert!(in_city.iter().all(|listing| listing.city == casablanca));

    let modern = market_listings(
        &store,
        &MarketFilter {
            city: Some(casablanca),
            market_type: Some(MarketType::Modern),
            ..MarketFilter::default()
        },
        SortOrder::Name,
    );

    let names: Vec<&str> = modern.iter().map(Listing::name).collect();
    assert_eq!(names, ["Marjane Californie"]);

    Ok(())
}

#[test]
fn fixture_history_charts_at_most_three_markets() -> TestResult {
    let store = store()?;
    let tomatoes = store.product_key("tomatoes")?;

    let history = PriceHistory::build(
        &store,
        tomatoes,
        &HistoryQuery::new(HistoryWindow::Month, "2026-10-17T12:00:00Z".parse()?),
    );

    assert!(!history.is_empty());
    assert_eq!(history.markets().len(), 3);
    assert!(
        history
            .buckets()
            .windows(2)
            .all(|pair| matches!(pair, [a, b] if a.timestamp < b.timestamp)),
        "buckets must be in chronological order"
    );

    Ok(())
}

#[test]
fn accented_product_names_sort_alphabetically() -> TestResult {
    let mut store = PriceStore::default();

    for (id, name, category) in [
        ("zaatar", "Zaatar", Category::Spices),
        ("epinards", "Épinards", Category::Vegetables),
        ("abricots", "Abricots", Category::Fruits),
    ] {
        store.insert_product(Product {
            id: id.to_string(),
            name: name.to_string(),
            category,
            units: smallvec!["kg".to_string()],
        })?;
    }

    let names: Vec<String> = product_listings(&store, &ProductFilter::default(), SortOrder::Name)
        .into_iter()
        .map(|listing| listing.name)
        .collect();

    assert_eq!(names, ["Abricots", "Épinards", "Zaatar"]);

    Ok(())
}
