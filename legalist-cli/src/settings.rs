use std::path::PathBuf;

use anyhow::{Result, anyhow};

pub(crate) const DEFAULT_API_URL: &str = "https://code-legalist-backend.onrender.com";
pub(crate) const DEFAULT_SESSION_FILE: &str = ".legalist_session.json";
pub(crate) const DEFAULT_NEWS_API_URL: &str = "https://google-news13.p.rapidapi.com";
pub(crate) const DEFAULT_NEWS_API_HOST: &str = "google-news13.p.rapidapi.com";

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) api_url: String,
    pub(crate) session_file: PathBuf,
    pub(crate) news_api_url: String,
    pub(crate) news_api_host: String,
    pub(crate) news_api_key: Option<String>,
    pub(crate) log_level: String,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_url = get("LEGALIST_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let session_file = get("LEGALIST_SESSION_FILE")
            .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string())
            .into();
        let news_api_url = get("NEWS_API_URL").unwrap_or_else(|| DEFAULT_NEWS_API_URL.to_string());
        let news_api_host =
            get("NEWS_API_HOST").unwrap_or_else(|| DEFAULT_NEWS_API_HOST.to_string());
        let news_api_key = get("NEWS_API_KEY");
        let log_level = get("LOG_LEVEL")
            .or_else(|| get("RUST_LOG"))
            .unwrap_or_else(|| "warn".to_string());

        Ok(Self {
            api_url,
            session_file,
            news_api_url,
            news_api_host,
            news_api_key,
            log_level,
        })
    }

    /// Адрес бэкенда из окружения; без схемы это ошибка конфигурации.
    pub(crate) fn checked_api_url(&self) -> Result<&str> {
        if !self.api_url.contains("://") {
            return Err(anyhow!(
                "LEGALIST_API_URL must include a scheme, got '{}'",
                self.api_url
            ));
        }
        Ok(&self.api_url)
    }
}
