//! Rule-based customer segmentation — ordered threshold rules, fixed segment
//! profiles, and match scoring against a segment's reference profile.

pub mod builder;
pub mod engine;
pub mod predicates;
pub mod profiles;
pub mod scoring;

pub use builder::AttributesBuilder;
pub use engine::SegmentClassifier;
pub use profiles::{profile, PROFILES};
pub use scoring::match_score;
