use crate::utils::error::Result;
use crate::utils::logger::preview_secret;
use crate::utils::validation::validate_required_field;

pub const KIPRIS_API_KEY: &str = "KIPRIS_API_KEY";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// 啟動時必須存在的兩把 API 金鑰
#[derive(Clone)]
pub struct Secrets {
    pub kipris_api_key: String,
    pub gemini_api_key: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("kipris_api_key", &preview_secret(&self.kipris_api_key))
            .field("gemini_api_key", &preview_secret(&self.gemini_api_key))
            .finish()
    }
}

impl Secrets {
    /// 先載入 `.env`，再從行程環境讀取
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let kipris_api_key = read(KIPRIS_API_KEY);
        let gemini_api_key = read(GEMINI_API_KEY);

        let secrets = Self {
            kipris_api_key: validate_required_field(KIPRIS_API_KEY, &kipris_api_key)?.clone(),
            gemini_api_key: validate_required_field(GEMINI_API_KEY, &gemini_api_key)?.clone(),
        };
        secrets.log_keys();
        Ok(secrets)
    }

    /// 只需要 KIPRIS 金鑰的情境 (例如健康檢查)
    pub fn kipris_key_from_env() -> Result<String> {
        dotenvy::dotenv().ok();
        let key = std::env::var(KIPRIS_API_KEY)
            .ok()
            .filter(|value| !value.trim().is_empty());
        Ok(validate_required_field(KIPRIS_API_KEY, &key)?.clone())
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  {}: {}", KIPRIS_API_KEY, preview_secret(&self.kipris_api_key));
        tracing::info!("  {}: {}", GEMINI_API_KEY, preview_secret(&self.gemini_api_key));
    }
}
