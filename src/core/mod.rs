// Core algorithm exports
pub mod engine;
pub mod explain;
pub mod matcher;
pub mod peers;
pub mod scoring;
pub mod similarity;

pub use engine::{MatchError, MatchingEngine};
pub use explain::explain_match;
pub use matcher::{mentors_with_history, Matcher};
pub use peers::{peer_compatibility, rank_peers, PeerMatch, PeerProfile};
pub use scoring::{aggregate_score, adjust_score, calculate_match_score, score_components};
pub use similarity::jaccard_similarity;
