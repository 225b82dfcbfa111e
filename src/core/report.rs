use crate::domain::model::{AnalysisMode, AnalysisOutcome, AnalysisReport, PatentRecord};
use crate::domain::ports::Storage;
use crate::utils::error::{AnalyzerError, Result};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

const CSV_HEADER: [&str; 11] = [
    "application_number",
    "title",
    "applicant",
    "inventor",
    "filing_date",
    "register_status",
    "register_number",
    "register_date",
    "ipc_code",
    "link",
    "abstract",
];

#[derive(Debug, Serialize)]
struct ReportSummary<'a> {
    keyword: &'a str,
    fields: Vec<String>,
    mode: AnalysisMode,
    question: Option<&'a str>,
    generated_at: String,
    record_count: usize,
    analysis: Option<AnalysisReport>,
    analysis_error: Option<String>,
    summary_count: usize,
}

pub fn records_to_csv(records: &[PatentRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for record in records {
        let opt = |value: &Option<String>| value.clone().unwrap_or_default();
        writer.write_record([
            record.application_number.clone(),
            opt(&record.title),
            opt(&record.applicant),
            opt(&record.inventor),
            opt(&record.filing_date),
            opt(&record.register_status),
            opt(&record.register_number),
            opt(&record.register_date),
            opt(&record.ipc_code),
            record.link.clone(),
            opt(&record.abstract_text),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| AnalyzerError::ProcessingError {
        message: format!("failed to flush CSV writer: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| AnalyzerError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

/// 把收集與分析結果打包成 ZIP，經由 Storage 寫出
pub struct ReportWriter<S: Storage> {
    storage: S,
    output_path: String,
    report_name: String,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S, output_path: impl Into<String>, report_name: impl Into<String>) -> Self {
        Self {
            storage,
            output_path: output_path.into(),
            report_name: report_name.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.zip", self.report_name)
    }

    pub fn build_archive(&self, outcome: &AnalysisOutcome) -> Result<Vec<u8>> {
        let (analysis, analysis_error) = match outcome.analysis.as_deref() {
            Some(raw) => match AnalysisReport::parse(raw) {
                Ok(report) => (Some(report), None),
                Err(e) => (None, Some(e.to_string())),
            },
            None => (None, None),
        };

        let summary = ReportSummary {
            keyword: &outcome.request.keyword,
            fields: outcome.request.fields.iter().map(|f| f.to_string()).collect(),
            mode: outcome.request.mode,
            question: outcome.request.analysis_question(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            record_count: outcome.records.len(),
            analysis,
            analysis_error,
            summary_count: outcome.summaries.len(),
        };

        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        zip.start_file::<_, ()>("patents.csv", FileOptions::default())?;
        zip.write_all(records_to_csv(&outcome.records)?.as_bytes())?;

        zip.start_file::<_, ()>("patents.json", FileOptions::default())?;
        zip.write_all(serde_json::to_string_pretty(&outcome.records)?.as_bytes())?;

        // 分析有跑才放原文
        if let Some(raw) = &outcome.analysis {
            zip.start_file::<_, ()>("analysis.json", FileOptions::default())?;
            zip.write_all(raw.as_bytes())?;
        }

        if !outcome.summaries.is_empty() {
            zip.start_file::<_, ()>("summaries.json", FileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&outcome.summaries)?.as_bytes())?;
        }

        zip.start_file::<_, ()>("report.json", FileOptions::default())?;
        zip.write_all(serde_json::to_string_pretty(&summary)?.as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    pub async fn write(&self, outcome: &AnalysisOutcome) -> Result<String> {
        let data = self.build_archive(outcome)?;
        let file_name = self.file_name();

        tracing::debug!("Writing report archive ({} bytes) to storage", data.len());
        self.storage.write_file(&file_name, &data).await?;

        Ok(format!("{}/{}", self.output_path, file_name))
    }
}
