use crate::utils::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 欄位缺值時顯示用的預設字串
pub const MISSING_VALUE: &str = "N/A";

const DETAIL_PAGE_URL: &str = "https://kipris.or.kr/search/view_patent.jsp";

/// 單筆專利檢索結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentRecord {
    pub application_number: String,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub applicant: Option<String>,
    pub inventor: Option<String>,
    pub filing_date: Option<String>,
    pub register_status: Option<String>,
    pub register_number: Option<String>,
    pub register_date: Option<String>,
    pub link: String,
    pub ipc_code: Option<String>,
}

impl PatentRecord {
    pub fn new(application_number: impl Into<String>) -> Self {
        let application_number = application_number.into();
        let link = detail_link(&application_number);
        Self {
            application_number,
            title: None,
            abstract_text: None,
            applicant: None,
            inventor: None,
            filing_date: None,
            register_status: None,
            register_number: None,
            register_date: None,
            link,
            ipc_code: None,
        }
    }

    /// 以原紀錄加上詳細欄位建立新紀錄，原紀錄不變
    pub fn with_details(&self, details: &PatentDetails) -> Self {
        let mut enriched = self.clone();
        enriched.ipc_code = if details.is_empty() {
            None
        } else {
            Some(details.ipc_code.clone())
        };
        enriched
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(MISSING_VALUE)
    }

    pub fn applicant_or_default(&self) -> &str {
        self.applicant.as_deref().unwrap_or(MISSING_VALUE)
    }

    pub fn filing_date_or_default(&self) -> &str {
        self.filing_date.as_deref().unwrap_or(MISSING_VALUE)
    }

    pub fn status_or_default(&self) -> &str {
        self.register_status.as_deref().unwrap_or(MISSING_VALUE)
    }

    /// 排序用的申請日，缺值視為最小
    pub fn sort_date(&self) -> &str {
        self.filing_date.as_deref().unwrap_or("")
    }

    /// 申請人欄位可能以 `|` 或 `;` 串接多個名稱
    pub fn applicant_names(&self) -> Vec<&str> {
        self.applicant
            .as_deref()
            .unwrap_or("")
            .split(['|', ';'])
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

fn detail_link(application_number: &str) -> String {
    format!(
        "{}?applno={}",
        DETAIL_PAGE_URL,
        application_number.replace('-', "")
    )
}

/// 可檢索的欄位，對應 KIPRIS searchQuery 的欄位代碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Abstract,
    Applicant,
    Title,
    Claim,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [
        SearchField::Abstract,
        SearchField::Applicant,
        SearchField::Title,
        SearchField::Claim,
    ];

    pub fn query_code(&self) -> &'static str {
        match self {
            SearchField::Abstract => "AB",
            SearchField::Applicant => "AP",
            SearchField::Title => "TI",
            SearchField::Claim => "CL",
        }
    }

    pub fn api_name(&self) -> &'static str {
        match self {
            SearchField::Abstract => "astrtCont",
            SearchField::Applicant => "applicantName",
            SearchField::Title => "inventionTitle",
            SearchField::Claim => "claim",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for SearchField {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        SearchField::ALL
            .into_iter()
            .find(|field| {
                field.api_name().eq_ignore_ascii_case(needle)
                    || format!("{:?}", field).eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| AnalyzerError::InvalidConfigValueError {
                field: "search_field".to_string(),
                value: s.to_string(),
                reason: "Unknown search field. Valid fields: astrtCont, applicantName, inventionTitle, claim".to_string(),
            })
    }
}

/// 單次分頁查詢
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub field: SearchField,
    pub page_no: usize,
    pub num_of_rows: usize,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, field: SearchField, page_no: usize, num_of_rows: usize) -> Self {
        Self {
            keyword: keyword.into(),
            field,
            page_no,
            num_of_rows,
        }
    }

    /// 例如 `AP=(삼성전자)`
    pub fn search_expression(&self) -> String {
        format!("{}=({})", self.field.query_code(), self.keyword)
    }
}

impl crate::utils::validation::Validate for SearchQuery {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_positive_number("page_no", self.page_no, 1)?;
        crate::utils::validation::validate_page_size("num_of_rows", self.num_of_rows)?;
        Ok(())
    }
}

/// 某欄位某一頁的檢索結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub records: Vec<PatentRecord>,
    pub total_count: usize,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 詳細資訊查詢結果，空字串代表查詢失敗
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentDetails {
    pub ipc_code: String,
}

impl PatentDetails {
    pub fn is_empty(&self) -> bool {
        self.ipc_code.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Fast,
    Detailed,
}

impl FromStr for AnalysisMode {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(AnalysisMode::Fast),
            "detailed" | "precise" => Ok(AnalysisMode::Detailed),
            other => Err(AnalyzerError::InvalidConfigValueError {
                field: "mode".to_string(),
                value: other.to_string(),
                reason: "Valid modes: fast, detailed".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectStrategy {
    #[default]
    Chronological,
    Relevance,
}

impl FromStr for CollectStrategy {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chronological" | "date" => Ok(CollectStrategy::Chronological),
            "relevance" => Ok(CollectStrategy::Relevance),
            other => Err(AnalyzerError::InvalidConfigValueError {
                field: "strategy".to_string(),
                value: other.to_string(),
                reason: "Valid strategies: chronological, relevance".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantCount {
    pub applicant: String,
    #[serde(default)]
    pub count: u64,
}

/// LLM 回傳的分析 JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub analysis_summary: String,
    #[serde(default)]
    pub top_applicants: Vec<ApplicantCount>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl AnalysisReport {
    /// 解析分析結果；`{"error": ...}` 或不合法的 JSON 都視為失敗
    pub fn parse(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw.trim())?;
        if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
            return Err(AnalyzerError::LlmError {
                message: message.to_string(),
            });
        }
        if !value.is_object() {
            return Err(AnalyzerError::ProcessingError {
                message: "analysis response is not a JSON object".to_string(),
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// 一次使用者操作的完整請求內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub keyword: String,
    pub fields: Vec<SearchField>,
    pub max_results: usize,
    pub strategy: CollectStrategy,
    pub applicants: Vec<String>,
    pub mode: AnalysisMode,
    pub question: Option<String>,
    pub detail_limit: usize,
    /// 前幾筆有摘要的紀錄要另外產生一段式整理，0 表示不做
    #[serde(default)]
    pub summary_limit: usize,
}

impl SearchRequest {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            fields: vec![SearchField::Abstract],
            max_results: 1000,
            strategy: CollectStrategy::Chronological,
            applicants: Vec::new(),
            mode: AnalysisMode::Fast,
            question: None,
            detail_limit: 100,
            summary_limit: 0,
        }
    }

    pub fn with_fields(mut self, fields: Vec<SearchField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn with_mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = mode;
        self
    }

    /// 有實際內容的分析問題
    pub fn analysis_question(&self) -> Option<&str> {
        self.question
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

impl crate::utils::validation::Validate for SearchRequest {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;
        validate_non_empty_string("keyword", &self.keyword)?;
        validate_positive_number("max_results", self.max_results, 1)?;
        if self.fields.is_empty() {
            return Err(AnalyzerError::ValidationError {
                message: "at least one search field is required".to_string(),
            });
        }
        Ok(())
    }
}

/// 單篇專利摘要的整理結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub application_number: String,
    pub summary: String,
}

/// 收集、過濾、分析後的完整結果
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub request: SearchRequest,
    pub records: Vec<PatentRecord>,
    pub analysis: Option<String>,
    pub summaries: Vec<RecordSummary>,
}
