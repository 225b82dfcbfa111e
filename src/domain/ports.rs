use crate::domain::model::{AnalysisOutcome, PatentDetails, PatentRecord, SearchPage, SearchQuery};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 專利資料來源。兩個方法都不回傳錯誤：失敗時記錄日誌並回傳空結果
#[async_trait]
pub trait PatentSource: Send + Sync {
    async fn search_page(&self, query: &SearchQuery) -> SearchPage;
    async fn fetch_details(&self, application_number: &str) -> PatentDetails;
}

/// 單一 prompt 進、純文字出的 LLM 介面
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// 進度回報：(完成比例 0.0..=1.0, 訊息)
pub type ProgressCallback<'a> = &'a (dyn Fn(f64, &str) + Send + Sync);

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn collect(&self) -> Result<Vec<PatentRecord>>;
    async fn analyze(&self, records: Vec<PatentRecord>) -> Result<AnalysisOutcome>;
    async fn load(&self, outcome: AnalysisOutcome) -> Result<String>;
}
