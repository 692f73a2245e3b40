//! Price Submissions

use std::fmt;

use jiff::Timestamp;
use serde::Deserialize;
use thiserror::Error;

use crate::{markets::MarketKey, prices::Price, products::ProductKey};

/// Errors validating a submission against the current time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// Submissions cannot be dated in the future.
    #[error("submission dated {submitted_at} is later than now ({now})")]
    FutureDate {
        /// Submission timestamp
        submitted_at: Timestamp,

        /// Reference time
        now: Timestamp,
    },
}

/// Observed quality of the produce a price was recorded for.
///
/// `premium` and `fair` are accepted as aliases for `excellent` and `average`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Poor
    Poor,

    /// Average
    #[default]
    #[serde(alias = "fair")]
    Average,

    /// Good
    Good,

    /// Excellent
    #[serde(alias = "premium")]
    Excellent,
}

impl Quality {
    /// All grades, worst first.
    pub const ALL: [Quality; 4] = [
        Quality::Poor,
        Quality::Average,
        Quality::Good,
        Quality::Excellent,
    ];

    /// Lowercase identifier, as used in fixtures.
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Poor => "poor",
            Quality::Average => "average",
            Quality::Good => "good",
            Quality::Excellent => "excellent",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moderation state of a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Awaiting review
    #[default]
    Pending,

    /// Confirmed by a reviewer
    Verified,

    /// Rejected by a reviewer; never aggregated
    Rejected,
}

impl VerificationStatus {
    /// Returns `true` if submissions with this status contribute to aggregates.
    pub fn is_counted(self) -> bool {
        !matches!(self, VerificationStatus::Rejected)
    }
}

/// A single crowdsourced price observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSubmission {
    product: ProductKey,
    market: MarketKey,
    user: String,
    price: Price,
    unit: String,
    quality: Quality,
    submitted_at: Timestamp,
    status: VerificationStatus,
}

impl PriceSubmission {
    /// Creates a new pending submission of average quality.
    pub fn new(
        product: ProductKey,
        market: MarketKey,
        price: Price,
        unit: impl Into<String>,
        submitted_at: Timestamp,
    ) -> Self {
        Self {
            product,
            market,
            user: String::new(),
            price,
            unit: unit.into(),
            quality: Quality::default(),
            submitted_at,
            status: VerificationStatus::default(),
        }
    }

    /// Sets the submitting user.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Sets the observed quality.
    #[must_use]
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Sets the verification status.
    #[must_use]
    pub fn with_status(mut self, status: VerificationStatus) -> Self {
        self.status = status;
        self
    }

    /// Check the submission is not dated after `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::FutureDate`] if the submission is in the future.
    pub fn validate(&self, now: Timestamp) -> Result<(), SubmissionError> {
        if self.submitted_at > now {
            return Err(SubmissionError::FutureDate {
                submitted_at: self.submitted_at,
                now,
            });
        }

        Ok(())
    }

    /// Product the price is for
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Market the price was observed in
    pub fn market(&self) -> MarketKey {
        self.market
    }

    /// Submitting user
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Observed price
    pub fn price(&self) -> Price {
        self.price
    }

    /// Unit the price is quoted in
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Observed quality
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// When the price was observed
    pub fn submitted_at(&self) -> Timestamp {
        self.submitted_at
    }

    /// Verification status
    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    /// Returns `true` if this submission contributes to aggregates.
    pub fn is_counted(&self) -> bool {
        self.status.is_counted()
    }
}
