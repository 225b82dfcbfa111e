use crate::core::prompts;
use crate::domain::model::{AnalysisMode, PatentRecord};
use crate::domain::ports::TextGenerator;
use crate::utils::error::Result;
use serde::Serialize;

/// 快速分析送給 LLM 的欄位
#[derive(Debug, Serialize)]
struct FastProjection<'a> {
    title: Option<&'a str>,
    applicant: Option<&'a str>,
    app_date: Option<&'a str>,
    reg_status: Option<&'a str>,
}

/// 精密分析以 IPC 取代登錄狀態
#[derive(Debug, Serialize)]
struct DetailedProjection<'a> {
    title: Option<&'a str>,
    applicant: Option<&'a str>,
    app_date: Option<&'a str>,
    ipc_code: Option<&'a str>,
}

pub fn project_records(records: &[PatentRecord], mode: AnalysisMode) -> Result<String> {
    let json = match mode {
        AnalysisMode::Fast => {
            let rows: Vec<_> = records
                .iter()
                .map(|r| FastProjection {
                    title: r.title.as_deref(),
                    applicant: r.applicant.as_deref(),
                    app_date: r.filing_date.as_deref(),
                    reg_status: r.register_status.as_deref(),
                })
                .collect();
            serde_json::to_string_pretty(&rows)?
        }
        AnalysisMode::Detailed => {
            let rows: Vec<_> = records
                .iter()
                .map(|r| DetailedProjection {
                    title: r.title.as_deref(),
                    applicant: r.applicant.as_deref(),
                    app_date: r.filing_date.as_deref(),
                    ipc_code: r.ipc_code.as_deref(),
                })
                .collect();
            serde_json::to_string_pretty(&rows)?
        }
    };
    Ok(json)
}

/// 去掉模型常包在 JSON 外面的 code fence
pub fn strip_code_fences(response: &str) -> String {
    response.trim().replace("```json", "").replace("```", "").trim().to_string()
}

pub struct AnalysisService<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> AnalysisService<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// 回傳模型原文；任何失敗都轉成 `{"error": "..."}` 字串，不會回傳錯誤。
    /// 模型本身給出不合法的 JSON 時原樣回傳，由呼叫端以 `AnalysisReport::parse` 判斷。
    pub async fn analyze(&self, records: &[PatentRecord], question: &str, mode: AnalysisMode) -> String {
        match self.try_analyze(records, question, mode).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("❌ Gemini analysis failed: {}", e);
                serde_json::json!({ "error": format!("Analysis failed: {}", e) }).to_string()
            }
        }
    }

    async fn try_analyze(&self, records: &[PatentRecord], question: &str, mode: AnalysisMode) -> Result<String> {
        let data = project_records(records, mode)?;
        let prompt = prompts::build_analysis_prompt(mode, &data, question);

        tracing::info!(
            "🤖 Sending {} patents to Gemini ({:?} analysis)",
            records.len(),
            mode
        );
        let response = self.generator.generate(&prompt).await?;
        Ok(strip_code_fences(&response))
    }

    /// 單篇摘要的一段式整理，失敗時回傳錯誤說明文字
    pub async fn summarize(&self, abstract_text: &str) -> String {
        let prompt = prompts::build_summary_prompt(abstract_text);
        match self.generator.generate(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!("⚠️ Gemini summary failed: {}", e);
                format!("Error while calling the Gemini API: {}", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AnalysisReport;
    use crate::utils::error::AnalyzerError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedGenerator {
        reply: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl<'a> TextGenerator for &'a ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(|message| AnalyzerError::LlmError { message })
        }
    }

    fn records() -> Vec<PatentRecord> {
        let mut a = PatentRecord::new("1020200000001");
        a.title = Some("Battery".to_string());
        a.applicant = Some("삼성전자".to_string());
        a.filing_date = Some("20200101".to_string());
        a.register_status = Some("등록".to_string());
        a.ipc_code = Some("H01M 10/052".to_string());
        vec![a, PatentRecord::new("1020200000002")]
    }

    #[test]
    fn test_fast_projection_fields() {
        let json = project_records(&records(), AnalysisMode::Fast).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["title"], "Battery");
        assert_eq!(value[0]["reg_status"], "등록");
        assert!(value[0].get("ipc_code").is_none());
        assert!(value[1]["title"].is_null());
    }

    #[test]
    fn test_detailed_projection_fields() {
        let json = project_records(&records(), AnalysisMode::Detailed).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["ipc_code"], "H01M 10/052");
        assert_eq!(value[0]["app_date"], "20200101");
        assert!(value[0].get("reg_status").is_none());
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_analyze_returns_cleaned_response() {
        let generator = ScriptedGenerator::ok(
            "```json\n{\"analysis_summary\":\"ok\",\"top_applicants\":[],\"keywords\":[\"cell\"]}\n```",
        );
        let service = AnalysisService::new(&generator);

        let raw = service.analyze(&records(), "trend?", AnalysisMode::Fast).await;
        let report = AnalysisReport::parse(&raw).unwrap();

        assert_eq!(report.analysis_summary, "ok");
        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("trend?"));
        assert!(prompts[0].contains("\"reg_status\": \"등록\""));
    }

    #[tokio::test]
    async fn test_analyze_failure_becomes_error_payload() {
        let generator = ScriptedGenerator::failing("quota exceeded");
        let service = AnalysisService::new(&generator);

        let raw = service.analyze(&records(), "trend?", AnalysisMode::Detailed).await;
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert!(value["error"].as_str().unwrap().contains("quota exceeded"));
        assert!(AnalysisReport::parse(&raw).is_err());
    }

    #[tokio::test]
    async fn test_malformed_model_output_passes_through() {
        let generator = ScriptedGenerator::ok("Sure! Here is the analysis: ...");
        let service = AnalysisService::new(&generator);

        let raw = service.analyze(&records(), "q", AnalysisMode::Fast).await;
        assert_eq!(raw, "Sure! Here is the analysis: ...");
        assert!(AnalysisReport::parse(&raw).is_err());
    }

    #[tokio::test]
    async fn test_summarize() {
        let generator = ScriptedGenerator::ok("  A concise summary.  ");
        let service = AnalysisService::new(&generator);
        assert_eq!(service.summarize("abstract").await, "A concise summary.");

        let failing = ScriptedGenerator::failing("down");
        let service = AnalysisService::new(&failing);
        assert!(service.summarize("abstract").await.starts_with("Error while calling the Gemini API"));
    }
}
