use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Формат даты, в котором пост показывается пользователю и по которому ищется.
pub const POST_DATE_FORMAT: &str = "%B %-d, %Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Профиль пользователя.
pub struct User {
    /// Имя.
    #[serde(default)]
    pub first_name: String,
    /// Фамилия.
    #[serde(default)]
    pub last_name: String,
    /// Логин.
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Публичная модель поста.
///
/// `city` и `state` у старых постов бывают пустыми, остальные поля обязательны.
pub struct Post {
    /// Идентификатор, выданный бэкендом.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Автор поста.
    pub username: String,
    /// Город.
    #[serde(default)]
    pub city: Option<String>,
    /// Штат.
    #[serde(default)]
    pub state: Option<String>,
    /// Текст поста.
    pub description: String,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Дата создания в локальном часовом поясе, например `March 5, 2025`.
    pub fn formatted_date(&self) -> String {
        self.formatted_date_in(&Local)
    }

    /// Дата создания в часовом поясе `tz`.
    pub fn formatted_date_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.created_at
            .with_timezone(tz)
            .format(POST_DATE_FORMAT)
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ после успешной регистрации или входа.
pub struct AuthResponse {
    /// Bearer-токен.
    pub token: String,
    /// Данные пользователя; бэкенд иногда опускает их при регистрации.
    #[serde(default)]
    pub user: Option<User>,
}
