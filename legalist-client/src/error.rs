use thiserror::Error;

/// Сообщение, которое видит пользователь, если бэкенд недоступен.
pub(crate) const NETWORK_ERROR_MESSAGE: &str = "Network error: backend is unreachable";

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `legalist-client`.
///
/// Любой вариант сводится к одному человекочитаемому сообщению через
/// [`LegalistClientError::message`].
pub enum LegalistClientError {
    /// Бэкенд отклонил токен (HTTP 401). Сессию нужно сбросить.
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Сообщение сервера или сообщение по умолчанию для операции.
        message: String,
    },

    /// Бэкенд вернул не-2xx статус (валидация, конфликт, ошибка сервера).
    #[error("request rejected ({status}): {message}")]
    Rejected {
        /// HTTP-статус ответа.
        status: u16,
        /// Сообщение сервера или сообщение по умолчанию для операции.
        message: String,
    },

    /// Ошибка HTTP-транспорта (`reqwest`): сеть, DNS, TLS.
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Тело успешного ответа не соответствует ожидаемой схеме.
    #[error("decode error: {0}")]
    Decode(String),

    /// Операция требует входа, а токена в сессии нет.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Запрос не удалось собрать (например, некорректный базовый URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Сбой при обращении к новостному API.
    #[error("news error: {0}")]
    News(String),
}

/// Результат операций `legalist-client`.
pub type LegalistClientResult<T> = Result<T, LegalistClientError>;

impl LegalistClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: String) -> Self {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Self::Unauthorized { message };
        }
        Self::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    /// Человекочитаемое сообщение об ошибке.
    pub fn message(&self) -> String {
        match self {
            Self::Unauthorized { message } | Self::Rejected { message, .. } => message.clone(),
            Self::Transport(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Decode(msg) => format!("Unexpected response from server: {msg}"),
            Self::NotAuthenticated => "Please log in first".to_string(),
            Self::InvalidRequest(msg) | Self::News(msg) => msg.clone(),
        }
    }

    /// `true`, если токен больше не действителен и сессию нужно закрыть.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
