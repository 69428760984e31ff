pub mod evidence;
pub mod outcome;
pub mod query;
pub mod thread;

pub use evidence::{EvidenceItem, SearchItem, SearchResponse};
pub use outcome::{AggregateOutcome, Resolution, ResolveStatus, WorkResult};
pub use query::Query;
pub use thread::{NodeId, ThreadArena, ThreadNode};
