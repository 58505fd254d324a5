//! Core classification engine — assigns a customer to exactly one segment.

use segment_core::{CustomerAttributes, PredictionResult, SegmentId, SegmentProfile, SegmentResult};
use tracing::debug;

use crate::predicates::{SegmentRule, RULES};
use crate::profiles::{profile, PROFILES};
use crate::scoring::match_score;

pub struct SegmentClassifier {
    rules: &'static [SegmentRule],
}

impl SegmentClassifier {
    pub fn new() -> Self {
        Self { rules: &RULES }
    }

    /// Evaluate the ordered rule table; the first matching rule wins.
    pub fn predict(&self, attrs: &CustomerAttributes) -> SegmentId {
        self.rules
            .iter()
            .find(|rule| rule.matches(attrs))
            .map(|rule| rule.segment)
            .unwrap_or(SegmentId::MODERATE)
    }

    pub fn score(&self, attrs: &CustomerAttributes, profile: &SegmentProfile) -> u8 {
        match_score(attrs, profile)
    }

    /// Validate, predict and score in one step.
    pub fn classify(&self, attrs: &CustomerAttributes) -> SegmentResult<PredictionResult> {
        attrs.validate()?;

        let segment = self.predict(attrs);
        let profile = profile(segment);
        let score = self.score(attrs, profile);

        metrics::counter!("classifier.predictions").increment(1);
        debug!(
            segment = %segment,
            segment_name = profile.name,
            match_score = score,
            "Customer classified"
        );

        Ok(PredictionResult::from_profile(profile, score))
    }

    pub fn rules(&self) -> &[SegmentRule] {
        self.rules
    }

    pub fn profiles(&self) -> &'static [SegmentProfile] {
        &PROFILES
    }
}

impl Default for SegmentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use segment_core::SegmentError;

    #[allow(clippy::too_many_arguments)]
    fn attrs(
        income: f64,
        age: f64,
        total_spending: f64,
        recency: f64,
        customer_since: f64,
        web: f64,
        store: f64,
        visits: f64,
    ) -> CustomerAttributes {
        CustomerAttributes {
            age,
            income,
            total_spending,
            recency,
            customer_since,
            num_web_purchases: web,
            num_store_purchases: store,
            num_web_visits_month: visits,
        }
    }

    fn base(income: f64, age: f64, total_spending: f64) -> CustomerAttributes {
        attrs(income, age, total_spending, 30.0, 1000.0, 3.0, 3.0, 5.0)
    }

    #[test]
    fn test_premium_scenario() {
        let classifier = SegmentClassifier::new();
        let customer = attrs(150_000.0, 40.0, 3000.0, 10.0, 1000.0, 10.0, 2.0, 3.0);
        assert_eq!(classifier.predict(&customer), SegmentId::PREMIUM);
    }

    #[test]
    fn test_budget_conscious_scenario() {
        let classifier = SegmentClassifier::new();
        let customer = attrs(30_000.0, 40.0, 500.0, 50.0, 1000.0, 2.0, 3.0, 5.0);
        assert_eq!(classifier.predict(&customer), SegmentId::BUDGET_CONSCIOUS);
    }

    #[test]
    fn test_high_value_loyal_precedes_senior() {
        let classifier = SegmentClassifier::new();
        let customer = attrs(80_000.0, 60.0, 500.0, 40.0, 2000.0, 3.0, 5.0, 4.0);
        assert_eq!(classifier.predict(&customer), SegmentId::HIGH_VALUE_LOYAL);

        // Satisfies rules 1, 2 and 3; rule 1 wins.
        let customer = base(120_000.0, 70.0, 2500.0);
        assert_eq!(classifier.predict(&customer), SegmentId::PREMIUM);
    }

    #[test]
    fn test_premium_regardless_of_other_fields() {
        let classifier = SegmentClassifier::new();
        for age in [18.0, 40.0, 60.0, 90.0] {
            for recency in [0.0, 50.0, 100.0] {
                let customer = attrs(100_001.0, age, 2000.5, recency, 0.0, 0.0, 0.0, 0.0);
                assert_eq!(classifier.predict(&customer), SegmentId::PREMIUM);
            }
        }
    }

    #[test]
    fn test_senior_when_earlier_rules_miss() {
        let classifier = SegmentClassifier::new();
        assert_eq!(classifier.predict(&base(50_000.0, 66.0, 100.0)), SegmentId::SENIOR);
        // Low income seniors are still seniors: rule 3 precedes rule 4.
        assert_eq!(classifier.predict(&base(20_000.0, 80.0, 100.0)), SegmentId::SENIOR);
        // 65 is not > 65.
        assert_eq!(classifier.predict(&base(50_000.0, 65.0, 100.0)), SegmentId::MODERATE);
    }

    #[test]
    fn test_active_balanced_and_moderate() {
        let classifier = SegmentClassifier::new();
        assert_eq!(classifier.predict(&base(50_000.0, 40.0, 801.0)), SegmentId::ACTIVE_BALANCED);
        assert_eq!(classifier.predict(&base(50_000.0, 40.0, 800.0)), SegmentId::MODERATE);
        assert_eq!(classifier.predict(&base(35_000.0, 40.0, 100.0)), SegmentId::MODERATE);
    }

    #[test]
    fn test_predict_is_total() {
        let classifier = SegmentClassifier::new();
        let incomes = [0.0, 34_999.0, 35_000.0, 70_001.0, 100_001.0, 1.0e7];
        let ages = [0.0, 30.0, 56.0, 66.0, 120.0];
        let spends = [0.0, 801.0, 2001.0, 1.0e6];
        for &i in &incomes {
            for &a in &ages {
                for &s in &spends {
                    let id = classifier.predict(&base(i, a, s));
                    assert!(id.index() < PROFILES.len());
                }
            }
        }
    }

    #[test]
    fn test_classify_copies_profile() {
        let classifier = SegmentClassifier::new();
        let customer = attrs(150_000.0, 40.0, 3000.0, 10.0, 1000.0, 10.0, 2.0, 3.0);
        let result = classifier.classify(&customer).unwrap();

        assert_eq!(result.segment, SegmentId::PREMIUM);
        assert_eq!(result.segment_name, "Premium");
        assert_eq!(result.recommendations.len(), 4);
        assert_eq!(result.characteristics.income, 666_666.0);
        assert_eq!(result.match_score, 49);
    }

    #[test]
    fn test_classify_rejects_nan() {
        let classifier = SegmentClassifier::new();
        let customer = base(f64::NAN, 40.0, 100.0);
        assert!(matches!(
            classifier.classify(&customer),
            Err(SegmentError::Validation { field: "income", .. })
        ));
    }

    #[test]
    fn test_profile_as_customer_scores_100() {
        let classifier = SegmentClassifier::new();
        for p in classifier.profiles() {
            assert_eq!(classifier.score(&p.reference, p), 100);
        }
    }
}
