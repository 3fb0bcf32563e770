pub mod calibration;
pub mod candidate;
pub mod config;
pub mod contact;
pub mod engine;
pub mod enumerate;
pub mod normalize;
pub mod scorers;
pub mod trace;

pub use calibration::{calibrate, CalibrationReport, LabeledPair};
pub use candidate::{sort_candidates, CandidatePair};
pub use config::{MatchingConfig, ScorerWeights};
pub use contact::{ContactRecord, NormalizedContact};
pub use engine::{MatchResult, Matcher};
pub use enumerate::{Cancelled, Enumeration, EnumerationStats};
pub use scorers::SubScoreKind;
pub use trace::{RuleTrace, ScorerResult};
