// Adapters layer: concrete clients for the external KIPRIS and Gemini services.

pub mod gemini;
pub mod kipris;
pub mod kipris_xml;

pub use gemini::GeminiClient;
pub use kipris::KiprisClient;

use crate::utils::error::AnalyzerError;

/// reqwest 錯誤的 Display 帶完整 URL，KIPRIS 的 ServiceKey 就在 query string 裡
pub(crate) fn redact_url(e: reqwest::Error) -> AnalyzerError {
    AnalyzerError::ApiError(e.without_url())
}
