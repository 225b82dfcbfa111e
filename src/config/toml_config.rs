use crate::adapters::gemini::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_TIMEOUT_SECS};
use crate::adapters::kipris::{DEFAULT_DETAIL_ENDPOINT, DEFAULT_SEARCH_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_page_size, validate_path, validate_positive_number, validate_range,
    validate_report_name, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 可選的 TOML 設定檔，所有區段都有預設值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub kipris: KiprisSettings,
    pub gemini: GeminiSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KiprisSettings {
    pub search_endpoint: String,
    pub detail_endpoint: String,
    pub page_size: usize,
    pub page_delay_ms: u64,
    pub detail_delay_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for KiprisSettings {
    fn default() -> Self {
        Self {
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            detail_endpoint: DEFAULT_DETAIL_ENDPOINT.to_string(),
            page_size: 10,
            page_delay_ms: 300,
            detail_delay_ms: 400,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl KiprisSettings {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub endpoint: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub temperature: Option<f32>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_seconds: DEFAULT_GEMINI_TIMEOUT_SECS,
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub output_path: String,
    pub report_name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            report_name: "patent_report".to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalyzerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalyzerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${KIPRIS_ENDPOINT})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AnalyzerError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn output_path(&self) -> &str {
        &self.output.output_path
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("kipris.search_endpoint", &self.kipris.search_endpoint)?;
        validate_url("kipris.detail_endpoint", &self.kipris.detail_endpoint)?;
        validate_page_size("kipris.page_size", self.kipris.page_size)?;
        validate_positive_number("kipris.timeout_seconds", self.kipris.timeout_seconds as usize, 1)?;

        validate_url("gemini.endpoint", &self.gemini.endpoint)?;
        validate_non_empty_string("gemini.model", &self.gemini.model)?;
        validate_positive_number("gemini.timeout_seconds", self.gemini.timeout_seconds as usize, 1)?;
        if let Some(temperature) = self.gemini.temperature {
            validate_range("gemini.temperature", temperature, 0.0, 2.0)?;
        }

        validate_path("output.output_path", &self.output.output_path)?;
        validate_report_name("output.report_name", &self.output.report_name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.kipris.page_size, 10);
        assert_eq!(config.kipris.page_delay(), Duration::from_millis(300));
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml_content = r#"
[kipris]
page_size = 50
page_delay_ms = 0

[gemini]
model = "gemini-1.5-pro"
temperature = 0.2

[output]
report_name = "battery"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.kipris.page_size, 50);
        assert_eq!(config.kipris.page_delay(), Duration::ZERO);
        assert_eq!(config.kipris.search_endpoint, DEFAULT_SEARCH_ENDPOINT);
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.gemini.temperature, Some(0.2));
        assert_eq!(config.output.report_name, "battery");
        assert_eq!(config.output_path(), "./output");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("KIPRIS_TEST_SEARCH_ENDPOINT", "https://mirror.example.com/search");

        let toml_content = r#"
[kipris]
search_endpoint = "${KIPRIS_TEST_SEARCH_ENDPOINT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.kipris.search_endpoint, "https://mirror.example.com/search");

        std::env::remove_var("KIPRIS_TEST_SEARCH_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[kipris]
search_endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[kipris]\npage_size = 0\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[kipris]\npage_size = 501\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[gemini]\ntemperature = 3.0\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[output]\nreport_name = \"../outside\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[kipris\npage_size = 1").unwrap_err();
        assert!(matches!(err, AnalyzerError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\noutput_path = \"./reports\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./reports");
    }
}
