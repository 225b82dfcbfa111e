use crate::adapters::kipris_xml::{self, ResponseHeader};
use crate::adapters::redact_url;
use crate::config::toml_config::KiprisSettings;
use crate::domain::model::{PatentDetails, SearchField, SearchPage, SearchQuery};
use crate::domain::ports::PatentSource;
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_SEARCH_ENDPOINT: &str =
    "http://plus.kipris.or.kr/kipo-api/kipi/patUtiModInfoSearchSevice/getAdvancedSearch";
pub const DEFAULT_DETAIL_ENDPOINT: &str =
    "http://plus.kipris.or.kr/kipo-api/kipi/patUtiModInfoSearchSevice/getDetailInfo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// KIPRIS Open API 用戶端
#[derive(Debug, Clone)]
pub struct KiprisClient {
    api_key: String,
    client: Client,
    search_endpoint: String,
    detail_endpoint: String,
}

impl KiprisClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::build(
            api_key.into(),
            DEFAULT_SEARCH_ENDPOINT.to_string(),
            DEFAULT_DETAIL_ENDPOINT.to_string(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn from_settings(api_key: impl Into<String>, settings: &KiprisSettings) -> Result<Self> {
        Self::build(
            api_key.into(),
            settings.search_endpoint.clone(),
            settings.detail_endpoint.clone(),
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    fn build(
        api_key: String,
        search_endpoint: String,
        detail_endpoint: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            client,
            search_endpoint,
            detail_endpoint,
        })
    }

    pub fn with_endpoints(mut self, search_endpoint: &str, detail_endpoint: &str) -> Self {
        self.search_endpoint = search_endpoint.to_string();
        self.detail_endpoint = detail_endpoint.to_string();
        self
    }

    async fn get_search_xml(&self, query: &SearchQuery) -> Result<(StatusCode, String)> {
        let response = self
            .client
            .get(&self.search_endpoint)
            .query(&[
                ("ServiceKey", self.api_key.clone()),
                ("searchQuery", query.search_expression()),
                ("numOfRows", query.num_of_rows.to_string()),
                ("pageNo", query.page_no.to_string()),
                ("sortSpec", "applicationDate".to_string()),
                ("descSort", "true".to_string()),
            ])
            .send()
            .await
            .map_err(redact_url)?;

        let status = response.status();
        let body = response.text().await.map_err(redact_url)?;
        Ok((status, body))
    }

    async fn try_search_page(&self, query: &SearchQuery) -> Result<SearchPage> {
        query.validate()?;

        tracing::debug!(
            "Searching KIPRIS: {} (page {}, {} rows)",
            query.search_expression(),
            query.page_no,
            query.num_of_rows
        );

        let (status, body) = self.get_search_xml(query).await?;
        if status != StatusCode::OK {
            return Err(AnalyzerError::ProcessingError {
                message: format!("search API returned HTTP {}", status),
            });
        }

        let parsed = kipris_xml::parse_search_response(&body)?;
        if parsed.header.is_failure() {
            return Err(AnalyzerError::ProcessingError {
                message: format!(
                    "search API rejected the request (resultCode={}, resultMsg={})",
                    parsed.header.result_code.as_deref().unwrap_or("?"),
                    parsed.header.result_msg.as_deref().unwrap_or("")
                ),
            });
        }

        Ok(SearchPage {
            records: parsed.records,
            total_count: parsed.total_count,
        })
    }

    async fn try_fetch_details(&self, application_number: &str) -> Result<PatentDetails> {
        let response = self
            .client
            .get(&self.detail_endpoint)
            .query(&[
                ("ServiceKey", self.api_key.as_str()),
                ("applicationNumber", application_number),
            ])
            .send()
            .await
            .map_err(redact_url)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AnalyzerError::ProcessingError {
                message: format!("detail API returned HTTP {}", status),
            });
        }

        let body = response.text().await.map_err(redact_url)?;
        let ipc_code = kipris_xml::parse_ipc_code(&body)?;
        Ok(PatentDetails { ipc_code })
    }

    /// 以一筆最小查詢檢查金鑰與服務狀態
    pub async fn check_health(&self, keyword: &str) -> Result<HealthReport> {
        let query = SearchQuery::new(keyword, SearchField::Abstract, 1, 1);
        let (status, body) = self.get_search_xml(&query).await?;
        let header = kipris_xml::parse_search_response(&body)
            .map(|parsed| parsed.header)
            .unwrap_or_default();
        Ok(HealthReport {
            http_status: status.as_u16(),
            header,
            body,
        })
    }
}

#[async_trait]
impl PatentSource for KiprisClient {
    async fn search_page(&self, query: &SearchQuery) -> SearchPage {
        match self.try_search_page(query).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    "⚠️ Search on field '{}' page {} failed: {}",
                    query.field,
                    query.page_no,
                    e
                );
                SearchPage::empty()
            }
        }
    }

    async fn fetch_details(&self, application_number: &str) -> PatentDetails {
        match self.try_fetch_details(application_number).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!("⚠️ Detail lookup for {} failed: {}", application_number, e);
                PatentDetails::default()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    InvalidKey,
    BadQuery,
    HttpError(u16),
    Unknown,
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    pub http_status: u16,
    pub header: ResponseHeader,
    pub body: String,
}

impl HealthReport {
    pub fn status(&self) -> HealthStatus {
        if self.http_status != 200 {
            return HealthStatus::HttpError(self.http_status);
        }
        if self.header.success_yn.as_deref() == Some("Y") {
            return HealthStatus::Healthy;
        }
        match self.header.result_code.as_deref() {
            Some("10") => HealthStatus::InvalidKey,
            Some("99") => HealthStatus::BadQuery,
            _ => HealthStatus::Unknown,
        }
    }
}
