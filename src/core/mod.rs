pub mod analysis;
pub mod collector;
pub mod enricher;
pub mod etl;
pub mod filter;
pub mod pipeline;
pub mod prompts;
pub mod relevance;
pub mod report;

pub use crate::domain::model::{AnalysisOutcome, PatentRecord, SearchRequest};
pub use crate::domain::ports::{PatentSource, Pipeline, Storage, TextGenerator};
pub use crate::utils::error::Result;
