//! Threshold predicates and the ordered segment rule table.

use segment_core::{CustomerAttributes, SegmentId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Age,
    Income,
    TotalSpending,
    Recency,
    CustomerSince,
    NumWebPurchases,
    NumStorePurchases,
    NumWebVisitsMonth,
}

impl Dimension {
    pub fn value_of(self, attrs: &CustomerAttributes) -> f64 {
        match self {
            Dimension::Age => attrs.age,
            Dimension::Income => attrs.income,
            Dimension::TotalSpending => attrs.total_spending,
            Dimension::Recency => attrs.recency,
            Dimension::CustomerSince => attrs.customer_since,
            Dimension::NumWebPurchases => attrs.num_web_purchases,
            Dimension::NumStorePurchases => attrs.num_store_purchases,
            Dimension::NumWebVisitsMonth => attrs.num_web_visits_month,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Threshold {
    pub dimension: Dimension,
    pub operator: ComparisonOperator,
    pub value: f64,
}

impl Threshold {
    pub const fn new(dimension: Dimension, operator: ComparisonOperator, value: f64) -> Self {
        Self {
            dimension,
            operator,
            value,
        }
    }

    pub fn matches(&self, attrs: &CustomerAttributes) -> bool {
        compare_numbers(self.dimension.value_of(attrs), self.operator, self.value)
    }
}

/// A conjunction of thresholds that assigns `segment` when all of them hold.
/// A rule with no thresholds always matches.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SegmentRule {
    pub segment: SegmentId,
    pub thresholds: &'static [Threshold],
}

impl SegmentRule {
    pub fn matches(&self, attrs: &CustomerAttributes) -> bool {
        self.thresholds.iter().all(|t| t.matches(attrs))
    }

    pub fn is_catch_all(&self) -> bool {
        self.thresholds.is_empty()
    }
}

use ComparisonOperator::{GreaterThan, LessThan};
use Dimension::{Age, Income, TotalSpending};

/// Ordered rule table; the first matching rule wins. Ranges overlap, so the
/// order is significant.
pub static RULES: [SegmentRule; 6] = [
    SegmentRule {
        segment: SegmentId::PREMIUM,
        thresholds: &[
            Threshold::new(Income, GreaterThan, 100_000.0),
            Threshold::new(TotalSpending, GreaterThan, 2000.0),
        ],
    },
    SegmentRule {
        segment: SegmentId::HIGH_VALUE_LOYAL,
        thresholds: &[
            Threshold::new(Income, GreaterThan, 70_000.0),
            Threshold::new(Age, GreaterThan, 55.0),
        ],
    },
    SegmentRule {
        segment: SegmentId::SENIOR,
        thresholds: &[Threshold::new(Age, GreaterThan, 65.0)],
    },
    SegmentRule {
        segment: SegmentId::BUDGET_CONSCIOUS,
        thresholds: &[Threshold::new(Income, LessThan, 35_000.0)],
    },
    SegmentRule {
        segment: SegmentId::ACTIVE_BALANCED,
        thresholds: &[Threshold::new(TotalSpending, GreaterThan, 800.0)],
    },
    SegmentRule {
        segment: SegmentId::MODERATE,
        thresholds: &[],
    },
];

pub fn compare_numbers(actual: f64, operator: ComparisonOperator, expected: f64) -> bool {
    match operator {
        ComparisonOperator::GreaterThan => actual > expected,
        ComparisonOperator::GreaterThanOrEqual => actual >= expected,
        ComparisonOperator::LessThan => actual < expected,
        ComparisonOperator::LessThanOrEqual => actual <= expected,
    }
}
