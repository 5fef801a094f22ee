// Core algorithm exports
pub mod confidence;
pub mod cuisine;
pub mod distance;
pub mod keywords;
pub mod ranker;
pub mod sentiment;
pub mod signal;

pub use confidence::{volume_bonus, wilson_lower_bound, ConfidenceEstimator};
pub use cuisine::CuisineMatcher;
pub use distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box};
pub use keywords::KeywordDetector;
pub use ranker::{RankError, Ranker};
pub use sentiment::SentimentClassifier;
pub use signal::{summarize, SignalExtractor};
