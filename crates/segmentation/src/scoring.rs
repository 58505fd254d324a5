//! Match score — similarity between a customer and a segment reference profile.

use crate::predicates::Dimension;
use segment_core::{CustomerAttributes, SegmentProfile};

/// Dimensions compared by the match score, equally weighted.
pub const SCORED_DIMENSIONS: [Dimension; 4] = [
    Dimension::Income,
    Dimension::Age,
    Dimension::TotalSpending,
    Dimension::Recency,
];

/// Relative deviation `|a - b| / max(a, b)`, or 0 when the larger value is
/// not positive.
fn relative_difference(customer: f64, reference: f64) -> f64 {
    let max = customer.max(reference);
    if max > 0.0 {
        (customer - reference).abs() / max
    } else {
        0.0
    }
}

/// Score in [0, 100]; 100 is an exact match on all scored dimensions.
pub fn match_score(attrs: &CustomerAttributes, profile: &SegmentProfile) -> u8 {
    let total: f64 = SCORED_DIMENSIONS
        .iter()
        .map(|d| relative_difference(d.value_of(attrs), d.value_of(&profile.reference)))
        .sum();
    let similarity = (1.0 - total / SCORED_DIMENSIONS.len() as f64) * 100.0;
    similarity.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::{profile, PROFILES};
    use segment_core::SegmentId;

    #[test]
    fn test_self_match_is_100() {
        for p in PROFILES.iter() {
            assert_eq!(match_score(&p.reference, p), 100);
        }
    }

    #[test]
    fn test_zero_values_do_not_divide_by_zero() {
        let mut attrs = profile(SegmentId::MODERATE).reference;
        attrs.recency = 0.0;
        let mut reference = profile(SegmentId::MODERATE).clone();
        reference.reference.recency = 0.0;
        assert_eq!(match_score(&attrs, &reference), 100);
    }

    #[test]
    fn test_known_score() {
        // Premium profile vs. a 150k / 40y / 3000 / 10d customer:
        // income 0.775, age ~0.184, spending 0.4, recency ~0.667 -> 49
        let attrs = CustomerAttributes {
            age: 40.0,
            income: 150_000.0,
            total_spending: 3000.0,
            recency: 10.0,
            customer_since: 1000.0,
            num_web_purchases: 10.0,
            num_store_purchases: 2.0,
            num_web_visits_month: 3.0,
        };
        assert_eq!(match_score(&attrs, profile(SegmentId::PREMIUM)), 49);
    }

    #[test]
    fn test_large_deviation_clamps_to_zero() {
        let attrs = CustomerAttributes {
            age: -500.0,
            income: -1.0e9,
            total_spending: -1.0e9,
            recency: -1.0e9,
            customer_since: 0.0,
            num_web_purchases: 0.0,
            num_store_purchases: 0.0,
            num_web_visits_month: 0.0,
        };
        for p in PROFILES.iter() {
            assert_eq!(match_score(&attrs, p), 0);
        }
    }
}
