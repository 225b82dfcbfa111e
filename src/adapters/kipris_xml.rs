//! KIPRIS XML 回應解析。
//!
//! 回應格式大致如下，`item` 可重複出現：
//!
//! ```xml
//! <response>
//!   <header><successYN>Y</successYN><resultCode>00</resultCode><resultMsg/></header>
//!   <body>
//!     <items>
//!       <item><applicationNumber>1020200012345</applicationNumber>...</item>
//!     </items>
//!     <count><totalCount>23</totalCount></count>
//!   </body>
//! </response>
//! ```

use crate::domain::model::PatentRecord;
use crate::utils::error::{AnalyzerError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeader {
    pub success_yn: Option<String>,
    pub result_code: Option<String>,
    pub result_msg: Option<String>,
}

impl ResponseHeader {
    /// 只有明確回傳 `successYN=N` 才算失敗，缺 header 時視為成功
    pub fn is_failure(&self) -> bool {
        matches!(self.success_yn.as_deref(), Some(flag) if flag.eq_ignore_ascii_case("N"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResponse {
    pub header: ResponseHeader,
    pub total_count: usize,
    pub records: Vec<PatentRecord>,
}

pub fn parse_search_response(xml: &str) -> Result<SearchResponse> {
    let document = collect_elements(xml)?;
    let mut response = SearchResponse::default();

    for (name, text) in &document.leaves {
        match name.as_str() {
            "totalCount" => response.total_count = text.parse().unwrap_or(0),
            "successYN" => response.header.success_yn = Some(text.clone()),
            "resultCode" => response.header.result_code = Some(text.clone()),
            "resultMsg" => response.header.result_msg = non_empty(text),
            _ => {}
        }
    }

    for fields in document.items {
        match record_from_fields(fields) {
            Some(record) => response.records.push(record),
            None => tracing::debug!("Skipping search item without applicationNumber"),
        }
    }

    Ok(response)
}

/// 取第一個 `ipcCode`，找不到時回傳空字串
pub fn parse_ipc_code(xml: &str) -> Result<String> {
    let document = collect_elements(xml)?;
    Ok(document
        .leaves
        .into_iter()
        .find(|(name, _)| name == "ipcCode")
        .map(|(_, text)| text)
        .unwrap_or_default())
}

#[derive(Debug, Default)]
struct XmlDocument {
    /// 依結束順序記錄的元素 (名稱, 去頭尾空白後的文字)
    leaves: Vec<(String, String)>,
    /// 每個 `item` 底下的葉節點，同名取第一個
    items: Vec<HashMap<String, String>>,
}

fn collect_elements(xml: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(xml);
    let mut document = XmlDocument::default();
    let mut stack: Vec<String> = Vec::new();
    let mut item: Option<HashMap<String, String>> = None;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "item" {
                    item = Some(HashMap::new());
                }
                stack.push(name);
                text.clear();
            }
            Event::Text(e) => {
                let unescaped = e.unescape().map_err(quick_xml::Error::from)?;
                text.push_str(&unescaped);
            }
            Event::CData(e) => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::End(_) => {
                let name = stack.pop().unwrap_or_default();
                if name == "item" {
                    if let Some(fields) = item.take() {
                        document.items.push(fields);
                    }
                } else {
                    let value = text.trim().to_string();
                    if let Some(fields) = item.as_mut() {
                        fields.entry(name.clone()).or_insert_with(|| value.clone());
                    }
                    document.leaves.push((name, value));
                }
                text.clear();
            }
            Event::Eof => {
                // 連線中斷造成的截斷文件不能當成完整的一頁
                if let Some(open) = stack.last() {
                    return Err(AnalyzerError::ProcessingError {
                        message: format!("truncated XML: <{}> was never closed", open),
                    });
                }
                break;
            }
            _ => {}
        }
    }

    Ok(document)
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn record_from_fields(fields: HashMap<String, String>) -> Option<PatentRecord> {
    let field = |name: &str| fields.get(name).and_then(|v| non_empty(v));

    let application_number = field("applicationNumber")?;
    let mut record = PatentRecord::new(application_number);
    record.title = field("inventionTitle");
    record.abstract_text = field("astrtCont");
    record.applicant = field("applicantName");
    record.inventor = field("inventorName");
    record.filing_date = field("applicationDate");
    record.register_status = field("registerStatus");
    record.register_number = field("registerNumber");
    record.register_date = field("registerDate");
    Some(record)
}
