use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting patent analysis...");

        tracing::info!("📥 Collecting patents...");
        let records = self.pipeline.collect().await?;
        tracing::info!("Collected {} unique patents", records.len());

        tracing::info!("🧠 Analyzing patents...");
        let outcome = self.pipeline.analyze(records).await?;
        match &outcome.analysis {
            Some(_) => tracing::info!("Analyzed {} patents", outcome.records.len()),
            None => tracing::info!("No analysis for {} patents", outcome.records.len()),
        }

        tracing::info!("📦 Writing report...");
        let output_path = self.pipeline.load(outcome).await?;
        tracing::info!("Report saved to: {}", output_path);

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AnalysisOutcome, PatentRecord, SearchRequest};
    use crate::utils::error::AnalyzerError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingPipeline {
        stages: Mutex<Vec<&'static str>>,
        fail_load: bool,
    }

    #[async_trait]
    impl Pipeline for RecordingPipeline {
        async fn collect(&self) -> Result<Vec<PatentRecord>> {
            self.stages.lock().unwrap().push("collect");
            Ok(vec![PatentRecord::new("1")])
        }

        async fn analyze(&self, records: Vec<PatentRecord>) -> Result<AnalysisOutcome> {
            self.stages.lock().unwrap().push("analyze");
            Ok(AnalysisOutcome {
                request: SearchRequest::new("battery"),
                records,
                analysis: None,
                summaries: Vec::new(),
            })
        }

        async fn load(&self, outcome: AnalysisOutcome) -> Result<String> {
            self.stages.lock().unwrap().push("load");
            if self.fail_load {
                return Err(AnalyzerError::ProcessingError {
                    message: "disk full".to_string(),
                });
            }
            Ok(format!("out/{}.zip", outcome.records.len()))
        }
    }

    #[tokio::test]
    async fn test_run_drives_stages_in_order() {
        let engine = AnalysisEngine::new(RecordingPipeline {
            stages: Mutex::new(Vec::new()),
            fail_load: false,
        });

        let output_path = tokio_test::assert_ok!(engine.run().await);
        assert_eq!(output_path, "out/1.zip");
        assert_eq!(
            *engine.pipeline.stages.lock().unwrap(),
            vec!["collect", "analyze", "load"]
        );
    }

    #[tokio::test]
    async fn test_run_propagates_stage_errors() {
        let engine = AnalysisEngine::new(RecordingPipeline {
            stages: Mutex::new(Vec::new()),
            fail_load: true,
        });

        let err = tokio_test::assert_err!(engine.run().await);
        assert!(matches!(err, AnalyzerError::ProcessingError { .. }));
    }
}
