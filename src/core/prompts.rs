use crate::domain::model::AnalysisMode;

const DATA_SLOT: &str = "{{DATA}}";
const QUESTION_SLOT: &str = "{{QUESTION}}";
const ABSTRACT_SLOT: &str = "{{ABSTRACT}}";

/// Fast analysis: title, applicant, filing date and status only.
pub const FAST_ANALYSIS_TEMPLATE: &str = r#"You are a senior patent data analyst.
Using the [DATA] and the [REQUEST] below, answer with exactly one valid JSON object that follows the [OUTPUT FORMAT].
Do not add any explanation or text outside the JSON object.

[DATA]:
{{DATA}}

[REQUEST]:
{{QUESTION}}

[OUTPUT FORMAT]:
{
  "analysis_summary": "Your analysis of the data for the request, written in Markdown.",
  "top_applicants": [
    {"applicant": "Applicant with the most filings", "count": 0},
    {"applicant": "Applicant with the second most filings", "count": 0}
  ],
  "keywords": ["5 to 10 core technology keywords drawn from the analysis"]
}"#;

/// Detailed analysis: adds the IPC classification code per record.
pub const DETAILED_ANALYSIS_TEMPLATE: &str = r#"You are a senior patent data analyst.
Using the [DATA] and the [REQUEST] below, answer with exactly one valid JSON object that follows the [OUTPUT FORMAT].
Weigh IPC codes, applicants and yearly filing trends together in your analysis.
Do not add any explanation or text outside the JSON object.

[DATA]:
{{DATA}}

[REQUEST]:
{{QUESTION}}

[OUTPUT FORMAT]:
{
  "analysis_summary": "Your analysis of the data for the request, written in Markdown.",
  "top_applicants": [
    {"applicant": "Applicant with the most filings", "count": 0},
    {"applicant": "Applicant with the second most filings", "count": 0}
  ],
  "keywords": ["5 to 10 core technology keywords drawn from the analysis"]
}"#;

pub const SUMMARY_TEMPLATE: &str = r#"Summarize the following patent abstract in one paragraph, the way a patent expert would.

Abstract: {{ABSTRACT}}"#;

pub fn analysis_template(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Fast => FAST_ANALYSIS_TEMPLATE,
        AnalysisMode::Detailed => DETAILED_ANALYSIS_TEMPLATE,
    }
}

pub fn build_analysis_prompt(mode: AnalysisMode, data: &str, question: &str) -> String {
    // 先填問題再填資料，避免資料內容剛好含有佔位字串
    analysis_template(mode)
        .replacen(QUESTION_SLOT, question, 1)
        .replacen(DATA_SLOT, data, 1)
}

pub fn build_summary_prompt(abstract_text: &str) -> String {
    SUMMARY_TEMPLATE.replacen(ABSTRACT_SLOT, abstract_text, 1)
}
