pub mod elo;
pub mod ledger;
pub mod pairwise;
pub mod recompute;
pub mod timeline;
pub mod types;

pub use ledger::DomainLedger;
pub use pairwise::PairwiseAggregator;
pub use recompute::replay;
pub use types::{CurrentRating, PairRelation, PairStat, PlayedMatch, RatingEntry, RecomputeOutput};
