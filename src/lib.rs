pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{GeminiClient, KiprisClient};
pub use config::cli::LocalStorage;
pub use core::{etl::AnalysisEngine, pipeline::PatentPipeline};
pub use utils::error::{AnalyzerError, Result};
