use crate::error::{SegmentError, SegmentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of fixed customer segments.
pub const SEGMENT_COUNT: usize = 6;

/// Behavioural attributes of a single customer, as submitted by the form layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAttributes {
    pub age: f64,
    pub income: f64,
    pub total_spending: f64,
    /// Days since last purchase.
    pub recency: f64,
    /// Tenure in days.
    pub customer_since: f64,
    pub num_web_purchases: f64,
    pub num_store_purchases: f64,
    pub num_web_visits_month: f64,
}

impl CustomerAttributes {
    /// Field name / value pairs, in declaration order.
    pub fn fields(&self) -> [(&'static str, f64); 8] {
        [
            ("age", self.age),
            ("income", self.income),
            ("totalSpending", self.total_spending),
            ("recency", self.recency),
            ("customerSince", self.customer_since),
            ("numWebPurchases", self.num_web_purchases),
            ("numStorePurchases", self.num_store_purchases),
            ("numWebVisitsMonth", self.num_web_visits_month),
        ]
    }

    /// Reject NaN and infinite values before they reach scoring math.
    /// Negative or implausible values are accepted as-is.
    pub fn validate(&self) -> SegmentResult<()> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(SegmentError::validation(field, "must be a finite number"));
            }
        }
        Ok(())
    }
}

/// Identifier of one of the six fixed segments (0..=5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SegmentId(u8);

impl SegmentId {
    pub const HIGH_VALUE_LOYAL: SegmentId = SegmentId(0);
    pub const BUDGET_CONSCIOUS: SegmentId = SegmentId(1);
    pub const SENIOR: SegmentId = SegmentId(2);
    pub const ACTIVE_BALANCED: SegmentId = SegmentId(3);
    pub const PREMIUM: SegmentId = SegmentId(4);
    pub const MODERATE: SegmentId = SegmentId(5);

    pub fn new(id: u8) -> SegmentResult<Self> {
        if (id as usize) < SEGMENT_COUNT {
            Ok(Self(id))
        } else {
            Err(SegmentError::UnknownSegment(id))
        }
    }

    pub fn all() -> impl Iterator<Item = SegmentId> {
        (0..SEGMENT_COUNT as u8).map(SegmentId)
    }

    pub fn as_u8(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for SegmentId {
    type Error = SegmentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SegmentId::new(value)
    }
}

impl From<SegmentId> for u8 {
    fn from(id: SegmentId) -> Self {
        id.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed reference record describing a segment archetype.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentProfile {
    pub id: SegmentId,
    pub name: &'static str,
    pub description: &'static str,
    pub recommendations: &'static [&'static str],
    pub reference: CustomerAttributes,
}

/// Outcome of classifying one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub segment: SegmentId,
    pub segment_name: String,
    pub description: String,
    pub recommendations: Vec<String>,
    /// Reference profile the match score was computed against.
    pub characteristics: CustomerAttributes,
    pub match_score: u8,
}

impl PredictionResult {
    pub fn from_profile(profile: &SegmentProfile, match_score: u8) -> Self {
        Self {
            segment: profile.id,
            segment_name: profile.name.to_string(),
            description: profile.description.to_string(),
            recommendations: profile.recommendations.iter().map(|r| r.to_string()).collect(),
            characteristics: profile.reference,
            match_score: match_score.min(100),
        }
    }
}

/// A prediction retained by the analytics store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub attributes: CustomerAttributes,
    pub result: PredictionResult,
}

impl PredictionRecord {
    pub fn new(attributes: CustomerAttributes, result: PredictionResult) -> Self {
        Self::at(attributes, result, Utc::now())
    }

    pub fn at(
        attributes: CustomerAttributes,
        result: PredictionResult,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            attributes,
            result,
        }
    }
}
