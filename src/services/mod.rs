pub mod evidence_service;
pub mod item_processor;
pub mod summary_service;
pub mod thread_parser;

pub use evidence_service::{EvidenceProvider, SearchEvidenceProvider};
pub use item_processor::{ItemProcessor, ThreadItemProcessor};
pub use summary_service::{SummaryService, NOT_APPLICABLE_MARKER};
