//! 相關度排序。
//!
//! 候選池最多收集 `CANDIDATE_POOL_FACTOR * 上限` 筆，評分後只保留前 `上限` 筆，
//! 因此大量結果時最多會捨棄一半的候選。
//!
//! 分數 = 3 × 標題命中數 + 2 × 申請人命中數 + 1 × 摘要命中數
//! (不分大小寫、不重疊的子字串計數)。同分依申請日新到舊，再依候選池順序。

use crate::domain::model::PatentRecord;

pub const CANDIDATE_POOL_FACTOR: usize = 2;

const TITLE_WEIGHT: usize = 3;
const APPLICANT_WEIGHT: usize = 2;
const ABSTRACT_WEIGHT: usize = 1;

fn hits(haystack: Option<&str>, needle: &str) -> usize {
    match haystack {
        Some(text) => text.to_lowercase().matches(needle).count(),
        None => 0,
    }
}

pub fn relevance_score(record: &PatentRecord, keyword: &str) -> usize {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }

    TITLE_WEIGHT * hits(record.title.as_deref(), &needle)
        + APPLICANT_WEIGHT * hits(record.applicant.as_deref(), &needle)
        + ABSTRACT_WEIGHT * hits(record.abstract_text.as_deref(), &needle)
}

pub fn rank_by_relevance(
    records: Vec<PatentRecord>,
    keyword: &str,
    max_results: usize,
) -> Vec<PatentRecord> {
    let pool_size = records.len();
    let mut scored: Vec<(usize, PatentRecord)> = records
        .into_iter()
        .map(|record| (relevance_score(&record, keyword), record))
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .cmp(score_a)
            .then_with(|| b.sort_date().cmp(a.sort_date()))
    });
    scored.truncate(max_results);

    tracing::info!(
        "Ranked {} candidates by relevance, kept {}",
        pool_size,
        scored.len()
    );
    scored.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, applicant: &str, abstract_text: &str, date: &str) -> PatentRecord {
        let mut record = PatentRecord::new(id);
        record.title = Some(title.to_string());
        record.applicant = Some(applicant.to_string());
        record.abstract_text = Some(abstract_text.to_string());
        record.filing_date = Some(date.to_string());
        record
    }

    #[test]
    fn test_score_formula() {
        let r = record(
            "1",
            "Battery pack with BATTERY cooling",
            "Battery Corp",
            "a battery",
            "20200101",
        );
        assert_eq!(relevance_score(&r, "battery"), 3 * 2 + 2 + 1);
        assert_eq!(relevance_score(&r, "  "), 0);
        assert_eq!(relevance_score(&PatentRecord::new("2"), "battery"), 0);
    }

    #[test]
    fn test_rank_orders_by_score_then_date() {
        let records = vec![
            record("old-hit", "battery", "", "", "20190101"),
            record("miss", "motor", "", "", "20240101"),
            record("new-hit", "battery", "", "", "20230101"),
            record("abstract-only", "cell", "", "battery", "20220101"),
        ];

        let ranked = rank_by_relevance(records, "battery", 3);
        let ids: Vec<_> = ranked.iter().map(|r| r.application_number.as_str()).collect();
        assert_eq!(ids, vec!["new-hit", "old-hit", "abstract-only"]);
    }

    #[test]
    fn test_rank_with_empty_keyword_keeps_chronological_order() {
        let records = vec![
            record("a", "x", "", "", "20230101"),
            record("b", "y", "", "", "20220101"),
        ];
        let ranked = rank_by_relevance(records, "", 5);
        assert_eq!(ranked[0].application_number, "a");
        assert_eq!(ranked.len(), 2);
    }
}
