//! Segment comparison and generated textual insights.

use segment_core::SegmentId;
use serde::Serialize;

use crate::snapshot::AnalyticsSnapshot;

/// Average spending above which a segment counts as high-value.
const HIGH_VALUE_SPENDING: f64 = 2000.0;
const HIGH_CONFIDENCE: f64 = 90.0;
const LOW_CONFIDENCE: f64 = 80.0;
const DOMINANT_CONTRIBUTION_PCT: f64 = 60.0;
const MAX_INSIGHTS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentComparison {
    pub segment: SegmentId,
    pub name: String,
    pub count: usize,
    pub percentage: f64,
    pub avg_spending: f64,
    pub avg_income: f64,
    /// Average spending as a percentage of average income.
    pub value_ratio: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsReport {
    pub insights: Vec<String>,
    pub comparison: Vec<SegmentComparison>,
}

impl InsightsReport {
    pub fn from_snapshot(snapshot: &AnalyticsSnapshot) -> Self {
        Self {
            insights: generate_insights(snapshot),
            comparison: segment_comparison(snapshot),
        }
    }
}

/// Per-segment performance, highest average spending first.
pub fn segment_comparison(snapshot: &AnalyticsSnapshot) -> Vec<SegmentComparison> {
    let mut rows: Vec<SegmentComparison> = snapshot
        .top_segments
        .iter()
        .map(|top| {
            let (avg_spending, avg_income) = snapshot
                .conversion_trend(top.segment)
                .map_or((0.0, 0.0), |t| (t.avg_spending, t.avg_income));
            SegmentComparison {
                segment: top.segment,
                name: top.name.clone(),
                count: top.count,
                percentage: top.percentage,
                avg_spending,
                avg_income,
                value_ratio: if avg_income != 0.0 {
                    avg_spending / avg_income * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();
    rows.sort_by(|a, b| b.avg_spending.total_cmp(&a.avg_spending));
    rows
}

pub fn generate_insights(snapshot: &AnalyticsSnapshot) -> Vec<String> {
    let mut insights = Vec::new();
    let Some(top) = snapshot.top_segments.first() else {
        return insights;
    };

    insights.push(format!(
        "{} is your dominant segment with {:.1}% of customers",
        top.name, top.percentage
    ));

    let high_value = snapshot
        .conversion_trends
        .iter()
        .filter(|t| t.avg_spending > HIGH_VALUE_SPENDING)
        .count();
    if high_value > 0 {
        insights.push(format!(
            "{high_value} segment(s) show high-value characteristics (>$2000 avg spending)"
        ));
    }

    let active = snapshot.top_segments.len();
    if active >= 4 {
        insights.push(format!("Good customer diversity with {active} active segments"));
    } else if active <= 2 {
        insights.push(
            "Limited segment diversity - consider expanding customer acquisition".to_string(),
        );
    }

    let total_value: f64 = snapshot
        .conversion_trends
        .iter()
        .map(|t| t.avg_spending * t.count as f64)
        .sum();
    if total_value > 0.0 {
        if let Some(trend) = snapshot.conversion_trend(top.segment) {
            let contribution = trend.avg_spending * top.count as f64 / total_value * 100.0;
            if contribution > DOMINANT_CONTRIBUTION_PCT {
                insights.push(format!(
                    "{} segment contributes {:.1}% of total customer value",
                    top.name, contribution
                ));
            }
        }
    }

    if snapshot.average_confidence > HIGH_CONFIDENCE {
        insights.push(format!(
            "High prediction confidence ({:.1}%) indicates strong segmentation model",
            snapshot.average_confidence
        ));
    } else if snapshot.average_confidence < LOW_CONFIDENCE {
        insights.push(
            "Lower confidence scores suggest need for model refinement or more data".to_string(),
        );
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}
