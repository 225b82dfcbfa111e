use crate::domain::model::PatentRecord;
use std::collections::BTreeSet;

/// 所有出現過的申請人，排序且不重複
pub fn unique_applicants(records: &[PatentRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.applicant_names())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 保留任一申請人在 `selected` 內的紀錄；`selected` 為空時全部保留
pub fn filter_by_applicants(records: &[PatentRecord], selected: &[String]) -> Vec<PatentRecord> {
    if selected.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| {
            record
                .applicant_names()
                .iter()
                .any(|name| selected.iter().any(|s| s == name))
        })
        .cloned()
        .collect()
}
