use crate::utils::error::{AnalyzerError, Result};
use url::Url;

/// KIPRIS 的 numOfRows 上限
pub const MAX_PAGE_SIZE: usize = 500;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> AnalyzerError {
    AnalyzerError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

/// 報告名稱會直接變成 `<name>.zip`，不能帶目錄
pub fn validate_report_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(invalid(
            field_name,
            name,
            "Report name must be a plain file name without directories",
        ));
    }
    Ok(())
}

pub fn validate_page_size(field_name: &str, page_size: usize) -> Result<()> {
    validate_range(field_name, page_size, 1, MAX_PAGE_SIZE)
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| AnalyzerError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("kipris.search_endpoint", "https://example.com").is_ok());
        assert!(validate_url("kipris.search_endpoint", "http://plus.kipris.or.kr/x").is_ok());
        assert!(validate_url("kipris.search_endpoint", "").is_err());
        assert!(validate_url("kipris.search_endpoint", "invalid-url").is_err());
        assert!(validate_url("kipris.search_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("max_results", 5, 1).is_ok());
        assert!(validate_positive_number("max_results", 0, 1).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("key".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("KIPRIS_API_KEY", &present).unwrap(), "key");
        assert!(matches!(
            validate_required_field("KIPRIS_API_KEY", &missing),
            Err(AnalyzerError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("gemini.temperature", 0.4, 0.0, 2.0).is_ok());
        assert!(validate_range("gemini.temperature", 2.5, 0.0, 2.0).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("keyword", "battery").is_ok());
        assert!(validate_non_empty_string("keyword", "   ").is_err());
    }

    #[test]
    fn test_validate_page_size() {
        assert!(validate_page_size("kipris.page_size", 10).is_ok());
        assert!(validate_page_size("kipris.page_size", MAX_PAGE_SIZE).is_ok());
        assert!(validate_page_size("kipris.page_size", 0).is_err());
        assert!(validate_page_size("kipris.page_size", MAX_PAGE_SIZE + 1).is_err());
    }

    #[test]
    fn test_validate_report_name() {
        assert!(validate_report_name("output.report_name", "battery_2024").is_ok());
        assert!(validate_report_name("output.report_name", "배터리").is_ok());
        assert!(validate_report_name("output.report_name", "../escape").is_err());
        assert!(validate_report_name("output.report_name", "a\\b").is_err());
        assert!(validate_report_name("output.report_name", "..").is_err());
        assert!(validate_report_name("output.report_name", " ").is_err());
    }
}
