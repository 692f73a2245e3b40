//! Product Fixtures

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::products::{Category, Product};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product id -> product fixture
    pub products: BTreeMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product category
    pub category: Category,

    /// Units prices are quoted in; the first is the default
    pub units: Vec<String>,
}

impl ProductFixture {
    /// Convert into a [`Product`] with the given id.
    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            units: self.units.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_products() -> TestResult {
        let fixture: ProductsFixture = serde_norway::from_str(
            "
products:
  mint:
    name: Fresh Mint
    category: spices
    units: [bunch, kg]
",
        )?;

        let product = fixture
            .products
            .into_iter()
            .next()
            .map(|(id, product)| product.into_product(id))
            .ok_or("no product")?;

        assert_eq!(product.id, "mint");
        assert_eq!(product.category, Category::Spices);
        assert_eq!(product.default_unit(), Some("bunch"));

        Ok(())
    }

    #[test]
    fn rejects_unknown_category() {
        let result: Result<ProductsFixture, _> = serde_norway::from_str(
            "
products:
  widget:
    name: Widget
    category: gadgets
    units: [piece]
",
        );

        assert!(result.is_err());
    }
}
