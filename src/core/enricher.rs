use crate::domain::model::PatentRecord;
use crate::domain::ports::{PatentSource, ProgressCallback};
use std::time::Duration;

pub const DEFAULT_DETAIL_LIMIT: usize = 100;
pub const DEFAULT_DETAIL_DELAY: Duration = Duration::from_millis(400);

/// 為前 N 筆紀錄補上 IPC 分類，回傳新的紀錄列表
pub struct DetailEnricher<'a, S: PatentSource + ?Sized> {
    source: &'a S,
    delay: Duration,
}

impl<'a, S: PatentSource + ?Sized> DetailEnricher<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            delay: DEFAULT_DETAIL_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn enrich(
        &self,
        records: &[PatentRecord],
        limit: usize,
        progress: Option<ProgressCallback<'_>>,
    ) -> Vec<PatentRecord> {
        let target = limit.min(records.len());
        tracing::info!(
            "📑 Fetching IPC details for {} of {} patents",
            target,
            records.len()
        );

        let mut enriched = Vec::with_capacity(records.len());
        let mut missing = 0usize;

        for (index, record) in records.iter().take(target).enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let details = self.source.fetch_details(&record.application_number).await;
            if details.is_empty() {
                missing += 1;
            }
            enriched.push(record.with_details(&details));

            if let Some(report) = progress {
                report(
                    (index + 1) as f64 / target as f64,
                    &format!("Fetching details ({}/{})", index + 1, target),
                );
            }
        }

        if missing > 0 {
            tracing::warn!("⚠️ {} patent(s) came back without an IPC code", missing);
        }

        enriched.extend(records.iter().skip(target).cloned());
        enriched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PatentDetails, SearchPage, SearchQuery};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct DetailSource {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PatentSource for DetailSource {
        async fn search_page(&self, _query: &SearchQuery) -> SearchPage {
            SearchPage::empty()
        }

        async fn fetch_details(&self, application_number: &str) -> PatentDetails {
            self.requested
                .lock()
                .unwrap()
                .push(application_number.to_string());
            if application_number == "broken" {
                PatentDetails::default()
            } else {
                PatentDetails {
                    ipc_code: format!("IPC-{application_number}"),
                }
            }
        }
    }

    #[tokio::test]
    async fn test_enrich_respects_limit_and_keeps_order() {
        let source = DetailSource {
            requested: Mutex::new(Vec::new()),
        };
        let records: Vec<_> = ["a", "broken", "c", "d"]
            .iter()
            .map(|id| PatentRecord::new(*id))
            .collect();

        let enriched = DetailEnricher::new(&source)
            .with_delay(Duration::ZERO)
            .enrich(&records, 3, None)
            .await;

        assert_eq!(*source.requested.lock().unwrap(), vec!["a", "broken", "c"]);
        assert_eq!(enriched.len(), 4);
        assert_eq!(enriched[0].ipc_code.as_deref(), Some("IPC-a"));
        assert_eq!(enriched[1].ipc_code, None);
        assert_eq!(enriched[2].ipc_code.as_deref(), Some("IPC-c"));
        assert_eq!(enriched[3].ipc_code, None);
        assert_eq!(enriched[3].application_number, "d");
        // 原始資料不被修改
        assert!(records.iter().all(|r| r.ipc_code.is_none()));
    }

    #[tokio::test]
    async fn test_enrich_reports_progress() {
        let source = DetailSource {
            requested: Mutex::new(Vec::new()),
        };
        let records = vec![PatentRecord::new("a"), PatentRecord::new("b")];
        let seen: Mutex<Vec<f64>> = Mutex::new(Vec::new());
        let callback = |fraction: f64, _message: &str| seen.lock().unwrap().push(fraction);

        DetailEnricher::new(&source)
            .with_delay(Duration::ZERO)
            .enrich(&records, 10, Some(&callback))
            .await;

        assert_eq!(seen.into_inner().unwrap(), vec![0.5, 1.0]);
    }
}
