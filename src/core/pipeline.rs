use crate::config::toml_config::{KiprisSettings, OutputSettings};
use crate::core::analysis::AnalysisService;
use crate::core::collector::PatentCollector;
use crate::core::enricher::DetailEnricher;
use crate::core::filter::{filter_by_applicants, unique_applicants};
use crate::core::report::ReportWriter;
use crate::domain::model::{AnalysisMode, AnalysisOutcome, PatentRecord, RecordSummary, SearchRequest};
use crate::domain::ports::{PatentSource, Pipeline, Storage, TextGenerator};
use crate::utils::error::Result;

type ProgressFn = Box<dyn Fn(f64, &str) + Send + Sync>;

pub struct PatentPipeline<S: Storage, P: PatentSource, G: TextGenerator> {
    request: SearchRequest,
    source: P,
    analysis: AnalysisService<G>,
    report: ReportWriter<S>,
    settings: KiprisSettings,
    progress: Option<ProgressFn>,
}

impl<S: Storage, P: PatentSource, G: TextGenerator> PatentPipeline<S, P, G> {
    pub fn new(
        request: SearchRequest,
        source: P,
        generator: G,
        storage: S,
        settings: KiprisSettings,
        output: &OutputSettings,
    ) -> Self {
        Self {
            request,
            source,
            analysis: AnalysisService::new(generator),
            report: ReportWriter::new(storage, output.output_path.clone(), output.report_name.clone()),
            settings,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: impl Fn(f64, &str) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    async fn summarize_records(&self, records: &[PatentRecord]) -> Vec<RecordSummary> {
        let targets: Vec<_> = records
            .iter()
            .filter_map(|r| r.abstract_text.as_deref().map(|text| (r, text)))
            .take(self.request.summary_limit)
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }

        tracing::info!("📝 Summarizing {} patent abstracts", targets.len());
        let mut summaries = Vec::with_capacity(targets.len());
        for (record, text) in targets {
            summaries.push(RecordSummary {
                application_number: record.application_number.clone(),
                summary: self.analysis.summarize(text).await,
            });
        }
        summaries
    }
}

#[async_trait::async_trait]
impl<S: Storage, P: PatentSource, G: TextGenerator> Pipeline for PatentPipeline<S, P, G> {
    async fn collect(&self) -> Result<Vec<PatentRecord>> {
        let collector = PatentCollector::new(&self.source)
            .with_page_size(self.settings.page_size)
            .with_page_delay(self.settings.page_delay());

        let records = collector
            .collect_with_strategy(
                &self.request.keyword,
                &self.request.fields,
                self.request.max_results,
                self.request.strategy,
                self.progress.as_deref(),
            )
            .await;

        Ok(records)
    }

    async fn analyze(&self, records: Vec<PatentRecord>) -> Result<AnalysisOutcome> {
        tracing::debug!("{} distinct applicants collected", unique_applicants(&records).len());
        let mut records = filter_by_applicants(&records, &self.request.applicants);
        if !self.request.applicants.is_empty() {
            tracing::info!(
                "🔎 {} patents match the selected applicants",
                records.len()
            );
        }

        let analysis = match self.request.analysis_question() {
            Some(question) if !records.is_empty() => {
                if self.request.mode == AnalysisMode::Detailed {
                    records = DetailEnricher::new(&self.source)
                        .with_delay(self.settings.detail_delay())
                        .enrich(&records, self.request.detail_limit, self.progress.as_deref())
                        .await;
                }
                Some(
                    self.analysis
                        .analyze(&records, question, self.request.mode)
                        .await,
                )
            }
            _ => {
                tracing::info!("⏭️ Skipping analysis (no question or no patents)");
                None
            }
        };

        let summaries = self.summarize_records(&records).await;

        Ok(AnalysisOutcome {
            request: self.request.clone(),
            records,
            analysis,
            summaries,
        })
    }

    async fn load(&self, outcome: AnalysisOutcome) -> Result<String> {
        self.report.write(&outcome).await
    }
}
