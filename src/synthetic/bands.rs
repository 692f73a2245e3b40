//! Category price bands

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

use crate::products::Category;

/// Plausible price range and daily volatility for a product category, in MAD per unit.
#[derive(Debug, Clone, Copy)]
pub struct CategoryBand {
    /// Lowest plausible price
    pub min: Decimal,

    /// Highest plausible price
    pub max: Decimal,

    /// Relative day-to-day swing
    pub volatility: Percentage,
}

impl CategoryBand {
    /// Band for the given category.
    pub fn for_category(category: Category) -> Self {
        let (min, max, volatility) = match category {
            Category::Vegetables => (3, 15, 0.15),
            Category::Fruits => (5, 30, 0.20),
            Category::Meat => (60, 120, 0.10),
            Category::Fish => (20, 150, 0.25),
            Category::Dairy => (5, 40, 0.05),
            Category::Grains => (3, 20, 0.05),
            Category::Spices => (20, 200, 0.10),
            Category::Other => (5, 50, 0.10),
        };

        CategoryBand {
            min: Decimal::from(min),
            max: Decimal::from(max),
            volatility: Percentage::from(volatility),
        }
    }

    /// Clamp a price into the band.
    pub fn clamp(&self, price: Decimal) -> Decimal {
        price.clamp(self.min, self.max)
    }

    /// Returns `true` if the price lies within the band, inclusive.
    pub fn contains(&self, price: Decimal) -> bool {
        (self.min..=self.max).contains(&price)
    }
}
