//! Prediction analytics — in-memory history, snapshot aggregation, filtered
//! views, and generated segment insights.

pub mod filters;
pub mod insights;
pub mod snapshot;
pub mod store;

pub use filters::PredictionFilter;
pub use insights::{generate_insights, segment_comparison, InsightsReport};
pub use snapshot::AnalyticsSnapshot;
pub use store::{AnalyticsStore, Subscription};
