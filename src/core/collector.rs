use crate::core::relevance;
use crate::domain::model::{CollectStrategy, PatentRecord, SearchField, SearchPage, SearchQuery};
use crate::domain::ports::{PatentSource, ProgressCallback};
use std::collections::HashSet;
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(300);

/// 依申請號去重，保留第一次出現的紀錄與插入順序
#[derive(Debug, Default)]
struct MergedRecords {
    seen: HashSet<String>,
    records: Vec<PatentRecord>,
}

impl MergedRecords {
    fn insert(&mut self, record: PatentRecord) -> bool {
        if self.seen.contains(&record.application_number) {
            return false;
        }
        self.seen.insert(record.application_number.clone());
        self.records.push(record);
        true
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    /// 依申請日由新到舊，stable sort 讓同日期維持插入順序
    fn into_sorted(self) -> Vec<PatentRecord> {
        let mut records = self.records;
        records.sort_by(|a, b| b.sort_date().cmp(a.sort_date()));
        records
    }
}

/// 在不超過上限的前提下，該欄位需要抓幾頁
pub fn pages_needed(total_count: usize, max_results: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_count.min(max_results).div_ceil(page_size)
}

/// 多欄位檢索、分頁、去重、排序
pub struct PatentCollector<'a, S: PatentSource + ?Sized> {
    source: &'a S,
    page_size: usize,
    page_delay: Duration,
}

impl<'a, S: PatentSource + ?Sized> PatentCollector<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub async fn collect(
        &self,
        keyword: &str,
        fields: &[SearchField],
        max_results: usize,
        progress: Option<ProgressCallback<'_>>,
    ) -> Vec<PatentRecord> {
        let mut merged = MergedRecords::default();
        if max_results == 0 || fields.is_empty() {
            return Vec::new();
        }

        let field_count = fields.len() as f64;
        let mut throttle = false;

        'fields: for (index, field) in fields.iter().enumerate() {
            tracing::info!("🔎 Searching field '{}' for '{}'", field, keyword);

            let first_page = self.fetch(keyword, *field, 1, &mut throttle).await;
            if first_page.total_count == 0 {
                tracing::info!("No results on field '{}', skipping", field);
                continue;
            }

            let total_pages = pages_needed(first_page.total_count, max_results, self.page_size);
            tracing::debug!(
                "Field '{}' reports {} results, fetching {} page(s)",
                field,
                first_page.total_count,
                total_pages
            );

            let mut pending = Some(first_page);
            for page_no in 1..=total_pages {
                if let Some(report) = progress {
                    let fraction = (index as f64 / field_count)
                        + (page_no as f64 / total_pages as f64) * (1.0 / field_count);
                    report(
                        fraction,
                        &format!("Searching '{}' ({}/{} pages)", field, page_no, total_pages),
                    );
                }

                let page = match pending.take() {
                    Some(page) => page,
                    None => self.fetch(keyword, *field, page_no, &mut throttle).await,
                };
                if page.is_empty() {
                    tracing::debug!("Field '{}' page {} came back empty, moving on", field, page_no);
                    break;
                }

                for record in page.records {
                    merged.insert(record);
                    if merged.len() >= max_results {
                        tracing::info!("Reached collection cap of {}", max_results);
                        break 'fields;
                    }
                }
            }
        }

        let records = merged.into_sorted();
        tracing::info!("✅ Collected {} unique patents", records.len());
        if let Some(report) = progress {
            report(1.0, &format!("Collected {} unique patents", records.len()));
        }
        records
    }

    /// 依策略收集。Relevance 先收集兩倍上限的候選，再評分截斷
    pub async fn collect_with_strategy(
        &self,
        keyword: &str,
        fields: &[SearchField],
        max_results: usize,
        strategy: CollectStrategy,
        progress: Option<ProgressCallback<'_>>,
    ) -> Vec<PatentRecord> {
        match strategy {
            CollectStrategy::Chronological => {
                self.collect(keyword, fields, max_results, progress).await
            }
            CollectStrategy::Relevance => {
                let pool_size = max_results.saturating_mul(relevance::CANDIDATE_POOL_FACTOR);
                let pool = self.collect(keyword, fields, pool_size, progress).await;
                relevance::rank_by_relevance(pool, keyword, max_results)
            }
        }
    }

    async fn fetch(
        &self,
        keyword: &str,
        field: SearchField,
        page_no: usize,
        throttle: &mut bool,
    ) -> SearchPage {
        if *throttle && !self.page_delay.is_zero() {
            tokio::time::sleep(self.page_delay).await;
        }
        *throttle = true;

        let query = SearchQuery::new(keyword, field, page_no, self.page_size);
        self.source.search_page(&query).await
    }
}
