//! Aggregate analytics over the full prediction history.

use chrono::{DateTime, Timelike, Utc};
use segment_core::types::SEGMENT_COUNT;
use segment_core::{PredictionRecord, SegmentId};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSegment {
    pub segment: SegmentId,
    pub name: String,
    pub count: usize,
    /// Share of all predictions, one decimal place.
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyBucket {
    pub hour: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionTrend {
    pub segment: SegmentId,
    pub avg_income: f64,
    pub avg_spending: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_predictions: usize,
    pub predictions_today: usize,
    pub average_confidence: f64,
    pub segment_distribution: BTreeMap<SegmentId, usize>,
    pub top_segments: Vec<TopSegment>,
    pub average_customer_value: f64,
    pub hourly_predictions: Vec<HourlyBucket>,
    pub conversion_trends: Vec<ConversionTrend>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Default)]
struct SegmentAccumulator {
    name: Option<String>,
    count: usize,
    income_sum: f64,
    spending_sum: f64,
}

impl AnalyticsSnapshot {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self::compute(std::iter::empty(), now)
    }

    /// Recompute every aggregate from scratch. `now` decides which records
    /// count as "today" (UTC calendar date).
    pub fn compute<'a, I>(records: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a PredictionRecord>,
    {
        let today = now.date_naive();
        let mut segments: [SegmentAccumulator; SEGMENT_COUNT] = Default::default();
        let mut hourly = [0usize; 24];
        let mut total = 0usize;
        let mut today_count = 0usize;
        let mut confidence_sum = 0.0;
        let mut spending_sum = 0.0;

        for record in records {
            total += 1;
            if record.created_at.date_naive() == today {
                today_count += 1;
            }
            hourly[record.created_at.hour() as usize] += 1;
            confidence_sum += f64::from(record.result.match_score);
            spending_sum += record.attributes.total_spending;

            let acc = &mut segments[record.result.segment.index()];
            acc.count += 1;
            acc.income_sum += record.attributes.income;
            acc.spending_sum += record.attributes.total_spending;
            if acc.name.is_none() {
                acc.name = Some(record.result.segment_name.clone());
            }
        }

        let mean = |sum: f64, n: usize| if n > 0 { sum / n as f64 } else { 0.0 };

        let active: Vec<(SegmentId, &SegmentAccumulator)> = SegmentId::all()
            .map(|id| (id, &segments[id.index()]))
            .filter(|(_, acc)| acc.count > 0)
            .collect();

        let segment_distribution = active.iter().map(|(id, acc)| (*id, acc.count)).collect();

        let conversion_trends = active
            .iter()
            .map(|(id, acc)| ConversionTrend {
                segment: *id,
                avg_income: mean(acc.income_sum, acc.count),
                avg_spending: mean(acc.spending_sum, acc.count),
                count: acc.count,
            })
            .collect();

        let counts: Vec<usize> = active.iter().map(|(_, acc)| acc.count).collect();
        let tenths = percentage_tenths(&counts, total);
        let mut top_segments: Vec<TopSegment> = active
            .iter()
            .zip(tenths)
            .map(|((id, acc), t)| TopSegment {
                segment: *id,
                name: acc.name.clone().unwrap_or_default(),
                count: acc.count,
                percentage: t as f64 / 10.0,
            })
            .collect();
        // Stable sort keeps ascending segment id for equal counts.
        top_segments.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            total_predictions: total,
            predictions_today: today_count,
            average_confidence: mean(confidence_sum, total),
            segment_distribution,
            top_segments,
            average_customer_value: mean(spending_sum, total),
            hourly_predictions: hourly
                .iter()
                .enumerate()
                .map(|(hour, &count)| HourlyBucket {
                    hour: hour as u32,
                    count,
                })
                .collect(),
            conversion_trends,
            generated_at: now,
        }
    }

    pub fn conversion_trend(&self, segment: SegmentId) -> Option<&ConversionTrend> {
        self.conversion_trends.iter().find(|t| t.segment == segment)
    }
}

/// Percentages in tenths of a percent, apportioned by largest remainder so
/// that they always sum to exactly 1000 when `total > 0`.
fn percentage_tenths(counts: &[usize], total: usize) -> Vec<u64> {
    if total == 0 {
        return vec![0; counts.len()];
    }
    let total = total as u64;
    let mut tenths: Vec<u64> = counts.iter().map(|&c| c as u64 * 1000 / total).collect();
    let mut remainders: Vec<(usize, u64)> = counts
        .iter()
        .enumerate()
        .map(|(i, &c)| (i, c as u64 * 1000 % total))
        .collect();
    // Largest remainder first; earlier index wins ties.
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let assigned: u64 = tenths.iter().sum();
    let shortfall = 1000u64.saturating_sub(assigned) as usize;
    for (i, _) in remainders.into_iter().take(shortfall) {
        tenths[i] += 1;
    }
    tenths
}
