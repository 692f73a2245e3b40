//! Submission Fixtures

use jiff::Timestamp;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    prices::parse_price,
    store::{PriceStore, StoreError},
    submissions::{PriceSubmission, Quality, VerificationStatus},
};

/// Wrapper for submissions in YAML
#[derive(Debug, Deserialize)]
pub struct SubmissionsFixture {
    /// Submissions, in any order
    pub submissions: Vec<SubmissionFixture>,
}

/// Submission Fixture
#[derive(Debug, Deserialize)]
pub struct SubmissionFixture {
    /// Product id
    pub product: String,

    /// Market id
    pub market: String,

    /// Submitting user
    #[serde(default)]
    pub user: String,

    /// Price in "amount currency" format (e.g., "8.50 MAD")
    pub price: String,

    /// Unit the price is quoted in; defaults to the product's first unit
    #[serde(default)]
    pub unit: Option<String>,

    /// Observed quality
    #[serde(default)]
    pub quality: Quality,

    /// When the price was observed
    pub submitted_at: Timestamp,

    /// Moderation state
    #[serde(default)]
    pub status: VerificationStatus,
}

impl SubmissionFixture {
    /// Convert into a [`PriceSubmission`], resolving ids in `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the product or market is unknown, the price cannot be parsed, or it
    /// is quoted in a currency other than the store's.
    pub fn try_into_submission(self, store: &PriceStore) -> Result<PriceSubmission, FixtureError> {
        let product = store.product_by_id(&self.product)?;
        let product_key = store.product_key(&self.product)?;
        let market = store.market_key(&self.market)?;

        let (price, currency) = parse_price(&self.price)?;

        if currency != store.currency() {
            return Err(FixtureError::CurrencyMismatch(
                store.currency().iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            ));
        }

        let unit = match self.unit {
            Some(unit) => unit,
            None => product
                .default_unit()
                .ok_or_else(|| StoreError::NoUnits(product.id.clone()))?
                .to_string(),
        };

        Ok(
            PriceSubmission::new(product_key, market, price, unit, self.submitted_at)
                .with_user(self.user)
                .with_quality(self.quality)
                .with_status(self.status),
        )
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn optional_fields_take_defaults() -> TestResult {
        let fixture: SubmissionsFixture = serde_norway::from_str(
            "
submissions:
  - product: tomatoes
    market: marche-central
    price: 8.50 MAD
    submitted_at: 2026-10-10T09:00:00Z
",
        )?;

        let submission = fixture.submissions.first().ok_or("submission")?;

        assert_eq!(submission.user, "");
        assert_eq!(submission.unit, None);
        assert_eq!(submission.quality, Quality::Average);
        assert_eq!(submission.status, VerificationStatus::Pending);

        Ok(())
    }

    #[test]
    fn quality_aliases_are_accepted() -> TestResult {
        let fixture: SubmissionsFixture = serde_norway::from_str(
            "
submissions:
  - product: tomatoes
    market: marche-central
    price: 8.50 MAD
    quality: premium
    submitted_at: 2026-10-10T09:00:00Z
  - product: tomatoes
    market: marche-central
    price: 8.00 MAD
    quality: fair
    submitted_at: 2026-10-11T09:00:00Z
",
        )?;

        let grades: Vec<Quality> = fixture.submissions.iter().map(|s| s.quality).collect();

        assert_eq!(grades, [Quality::Excellent, Quality::Average]);

        Ok(())
    }
}
