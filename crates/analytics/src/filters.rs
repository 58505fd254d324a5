//! History filters — narrow the prediction set before aggregating.

use chrono::NaiveDate;
use segment_core::PredictionRecord;
use serde::{Deserialize, Serialize};

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Inclusive calendar-date range (UTC). Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Default dashboard slider bounds.
pub const DEFAULT_AGE_RANGE: ValueRange = ValueRange::new(18.0, 90.0);
pub const DEFAULT_INCOME_RANGE: ValueRange = ValueRange::new(0.0, 200_000.0);
pub const DEFAULT_SPENDING_RANGE: ValueRange = ValueRange::new(0.0, 10_000.0);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PredictionFilter {
    pub age_range: Option<ValueRange>,
    pub income_range: Option<ValueRange>,
    pub spending_range: Option<ValueRange>,
    pub date_range: Option<DateRange>,
    /// Segment display names; empty means all segments.
    pub segments: Vec<String>,
    /// Case-insensitive match against segment name or description.
    pub search_term: Option<String>,
}

impl PredictionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn age(mut self, min: f64, max: f64) -> Self {
        self.age_range = Some(ValueRange::new(min, max));
        self
    }

    pub fn income(mut self, min: f64, max: f64) -> Self {
        self.income_range = Some(ValueRange::new(min, max));
        self
    }

    pub fn spending(mut self, min: f64, max: f64) -> Self {
        self.spending_range = Some(ValueRange::new(min, max));
        self
    }

    pub fn dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_range = Some(DateRange { start, end });
        self
    }

    pub fn segment(mut self, name: impl Into<String>) -> Self {
        self.segments.push(name.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Number of constraints that differ from the dashboard defaults.
    pub fn active_count(&self) -> usize {
        let narrowed = |range: &Option<ValueRange>, default: ValueRange| {
            range.map_or(false, |r| r != default)
        };
        [
            self.date_range.map_or(false, |d| !d.is_open()),
            narrowed(&self.age_range, DEFAULT_AGE_RANGE),
            narrowed(&self.income_range, DEFAULT_INCOME_RANGE),
            narrowed(&self.spending_range, DEFAULT_SPENDING_RANGE),
            !self.segments.is_empty(),
            self.search_term.as_deref().map_or(false, |t| !t.trim().is_empty()),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    pub fn matches(&self, record: &PredictionRecord) -> bool {
        let attrs = &record.attributes;
        let in_range = |range: &Option<ValueRange>, value: f64| range.map_or(true, |r| r.contains(value));

        if !in_range(&self.age_range, attrs.age)
            || !in_range(&self.income_range, attrs.income)
            || !in_range(&self.spending_range, attrs.total_spending)
        {
            return false;
        }

        if let Some(dates) = &self.date_range {
            if !dates.contains(record.created_at.date_naive()) {
                return false;
            }
        }

        if !self.segments.is_empty()
            && !self
                .segments
                .iter()
                .any(|s| s.eq_ignore_ascii_case(&record.result.segment_name))
        {
            return false;
        }

        match self.search_term.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                record.result.segment_name.to_lowercase().contains(&term)
                    || record.result.description.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use segment_core::{CustomerAttributes, PredictionResult, SegmentId};

    fn record(name: &str, age: f64, income: f64, day: u32) -> PredictionRecord {
        let attributes = CustomerAttributes {
            age,
            income,
            total_spending: 500.0,
            recency: 30.0,
            customer_since: 1000.0,
            num_web_purchases: 2.0,
            num_store_purchases: 3.0,
            num_web_visits_month: 5.0,
        };
        let result = PredictionResult {
            segment: SegmentId::MODERATE,
            segment_name: name.to_string(),
            description: format!("{name} customers with average engagement"),
            recommendations: Vec::new(),
            characteristics: attributes,
            match_score: 75,
        };
        let at = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
        PredictionRecord::at(attributes, result, at)
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = PredictionFilter::new();
        assert_eq!(filter.active_count(), 0);
        assert!(filter.matches(&record("Moderate", -3.0, -10.0, 1)));
    }

    #[test]
    fn test_ranges_are_inclusive() {
        let filter = PredictionFilter::new().age(30.0, 40.0);
        assert!(filter.matches(&record("Moderate", 30.0, 1.0, 1)));
        assert!(filter.matches(&record("Moderate", 40.0, 1.0, 1)));
        assert!(!filter.matches(&record("Moderate", 41.0, 1.0, 1)));
    }

    #[test]
    fn test_segment_and_search() {
        let filter = PredictionFilter::new().segment("premium");
        assert!(filter.matches(&record("Premium", 40.0, 1.0, 1)));
        assert!(!filter.matches(&record("Moderate", 40.0, 1.0, 1)));

        let filter = PredictionFilter::new().search("  ENGAGEMENT ");
        assert!(filter.matches(&record("Moderate", 40.0, 1.0, 1)));
        let filter = PredictionFilter::new().search("loyal");
        assert!(!filter.matches(&record("Moderate", 40.0, 1.0, 1)));
    }

    #[test]
    fn test_date_range() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 10);
        let filter = PredictionFilter::new().dates(start, None);
        assert!(!filter.matches(&record("Moderate", 40.0, 1.0, 9)));
        assert!(filter.matches(&record("Moderate", 40.0, 1.0, 10)));
        assert!(filter.matches(&record("Moderate", 40.0, 1.0, 28)));
    }

    #[test]
    fn test_active_count_ignores_default_ranges() {
        let filter = PredictionFilter::new()
            .age(18.0, 90.0)
            .income(50_000.0, 200_000.0)
            .segment("Premium")
            .search("vip");
        assert_eq!(filter.active_count(), 3);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let filter: PredictionFilter =
            serde_json::from_str(r#"{"incomeRange": {"min": 0, "max": 50000}}"#).unwrap();
        assert_eq!(filter.income_range, Some(ValueRange::new(0.0, 50_000.0)));
        assert!(filter.segments.is_empty());
    }
}
