pub mod cli;
pub mod secrets;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{AnalysisMode, CollectStrategy, SearchField, SearchRequest};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "kipris-analyzer")]
#[command(about = "Search KIPRIS patents, analyze them with Gemini and write a report bundle")]
pub struct CliConfig {
    /// Search keyword, e.g. "battery" or "삼성전자"
    pub keyword: String,

    /// Fields to search (astrtCont, applicantName, inventionTitle, claim)
    #[arg(long = "field", value_delimiter = ',', default_value = "astrtCont")]
    pub fields: Vec<String>,

    #[arg(long, default_value = "1000")]
    pub max_results: usize,

    /// chronological | relevance
    #[arg(long, default_value = "chronological")]
    pub strategy: String,

    /// Keep only patents filed by these applicants
    #[arg(long = "applicant", value_delimiter = ',')]
    pub applicants: Vec<String>,

    /// fast | detailed
    #[arg(long, default_value = "fast")]
    pub mode: String,

    /// Free-text analysis request sent to Gemini; analysis is skipped without it
    #[arg(long)]
    pub question: Option<String>,

    /// How many of the newest patents get IPC details in detailed mode
    #[arg(long, default_value = "100")]
    pub detail_limit: usize,

    /// Write a one-paragraph Gemini summary for the first N patents that have an abstract
    #[arg(long = "summarize", default_value = "0")]
    pub summary_limit: usize,

    /// Optional TOML settings file
    #[arg(long)]
    pub config: Option<String>,

    /// Overrides [output].output_path
    #[arg(long)]
    pub output_path: Option<String>,

    /// Overrides [output].report_name
    #[arg(long)]
    pub report_name: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 轉成單次請求的內容，欄位名稱與模式在這裡驗證
    pub fn to_request(&self) -> Result<SearchRequest> {
        let fields = self
            .fields
            .iter()
            .filter(|f| !f.trim().is_empty())
            .map(|f| f.parse::<SearchField>())
            .collect::<Result<Vec<_>>>()?;

        Ok(SearchRequest {
            keyword: self.keyword.trim().to_string(),
            fields,
            max_results: self.max_results,
            strategy: self.strategy.parse::<CollectStrategy>()?,
            applicants: self
                .applicants
                .iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            mode: self.mode.parse::<AnalysisMode>()?,
            question: self.question.clone(),
            detail_limit: self.detail_limit,
            summary_limit: self.summary_limit,
        })
    }
}
