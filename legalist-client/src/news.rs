//! Клиент стороннего новостного API и модель новости.

use chrono::{DateTime, Local, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LegalistClientError, LegalistClientResult};

/// Единое сообщение для любой ошибки новостного API.
pub const NEWS_FAILED: &str = "Failed to fetch news. Please try again later.";

/// Категория по умолчанию.
pub const DEFAULT_CATEGORY: &str = "Latest";
/// Язык по умолчанию.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Категории новостей.
pub const CATEGORIES: [&str; 8] = [
    "Latest",
    "Entertainment",
    "World",
    "Business",
    "Health",
    "Sport",
    "Science",
    "Technology",
];

/// Языки новостей: код и название.
pub const LANGUAGES: [(&str, &str); 8] = [
    ("en-US", "English"),
    ("hi-IN", "Hindi"),
    ("mr-IN", "Marathi"),
    ("ta-IN", "Tamil"),
    ("te-IN", "Telugu"),
    ("pa-IN", "Punjabi"),
    ("bn-IN", "Bengali"),
    ("gu-IN", "Gujarati"),
];

/// Название языка по коду.
pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Ключевое слово поиска: непустой запрос важнее категории.
pub fn search_keyword(category: &str, query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        category.trim().to_lowercase()
    } else {
        query.to_lowercase()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Картинки новости.
pub struct NewsImages {
    /// Оригинальная миниатюра.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Миниатюра через прокси API.
    #[serde(default)]
    pub thumbnail_proxied: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Новость из ленты.
pub struct NewsItem {
    /// Заголовок.
    pub title: String,
    /// Краткое содержание.
    #[serde(default)]
    pub snippet: Option<String>,
    /// Альтернативное поле краткого содержания.
    #[serde(default)]
    pub description: Option<String>,
    /// Издание.
    #[serde(default)]
    pub publisher: Option<String>,
    /// Ссылка на статью.
    #[serde(default)]
    pub news_url: Option<String>,
    /// Альтернативное поле ссылки.
    #[serde(default)]
    pub link: Option<String>,
    /// Время публикации в миллисекундах, строкой или числом.
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
    /// Картинки.
    #[serde(default)]
    pub images: Option<NewsImages>,
    /// Связанные новости.
    #[serde(default)]
    pub subnews: Vec<NewsItem>,
}

impl NewsItem {
    /// Краткое содержание, если есть.
    pub fn summary(&self) -> Option<&str> {
        self.snippet.as_deref().or(self.description.as_deref())
    }

    /// Ссылка на статью, если есть.
    pub fn url(&self) -> Option<&str> {
        self.news_url.as_deref().or(self.link.as_deref())
    }

    fn own_image(&self, proxied: bool) -> Option<&str> {
        let images = self.images.as_ref()?;
        if proxied {
            images.thumbnail_proxied.as_deref()
        } else {
            images.thumbnail.as_deref()
        }
    }

    /// Картинка: своя, затем первой связанной новости; прокси предпочтительнее.
    pub fn image_url(&self) -> Option<&str> {
        let first_sub = self.subnews.first();
        self.own_image(true)
            .or_else(|| self.own_image(false))
            .or_else(|| first_sub.and_then(|sub| sub.own_image(true)))
            .or_else(|| first_sub.and_then(|sub| sub.own_image(false)))
    }

    /// Время публикации.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let millis = match self.timestamp.as_ref()? {
            serde_json::Value::String(raw) => raw.trim().parse::<i64>().ok()?,
            serde_json::Value::Number(num) => num.as_i64()?,
            _ => return None,
        };
        DateTime::from_timestamp_millis(millis)
    }

    /// Дата публикации вида `Mar 5, 2025` в локальном часовом поясе.
    pub fn formatted_date(&self) -> Option<String> {
        self.published_at()
            .map(|at| at.with_timezone(&Local).format("%b %-d, %Y").to_string())
    }
}

#[derive(Debug, Deserialize)]
struct NewsResponseDto {
    #[serde(default)]
    items: Vec<NewsItem>,
}

#[derive(Debug, Clone)]
/// Клиент стороннего новостного API (RapidAPI).
pub struct NewsClient {
    base_url: String,
    host: String,
    api_key: String,
    client: Client,
}

impl NewsClient {
    /// Создаёт клиента. Ключ API берётся из конфигурации.
    pub fn new(
        base_url: impl Into<String>,
        host: impl Into<String>,
        api_key: impl Into<String>,
    ) -> LegalistClientResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("legalist-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            host: host.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Ищет новости по запросу, а при пустом запросе по категории.
    pub async fn search(
        &self,
        category: &str,
        query: &str,
        language: &str,
    ) -> LegalistClientResult<Vec<NewsItem>> {
        let keyword = search_keyword(category, query);
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        debug!(%url, %keyword, %language, "fetching news");

        let response = self
            .client
            .get(url)
            .query(&[("keyword", keyword.as_str()), ("lr", language)])
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await
            .map_err(|err| Self::failed(&err))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "news api rejected request");
            return Err(LegalistClientError::News(NEWS_FAILED.to_string()));
        }

        let body = response.text().await.map_err(|err| Self::failed(&err))?;
        let dto: NewsResponseDto =
            serde_json::from_str(&body).map_err(|err| Self::failed(&err))?;
        debug!(count = dto.items.len(), "news fetched");
        Ok(dto.items)
    }

    fn failed(err: &dyn std::error::Error) -> LegalistClientError {
        warn!(error = %err, "news request failed");
        LegalistClientError::News(NEWS_FAILED.to_string())
    }
}
