use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::{LegalistClientError, LegalistClientResult};
use crate::models::{AuthResponse, Post, User};

const SIGNUP_FAILED: &str = "Registration failed";
const LOGIN_FAILED: &str = "Invalid credentials";
const PROFILE_FAILED: &str = "Failed to fetch user data";
const POSTS_FAILED: &str = "Failed to fetch posts";
const USER_POSTS_FAILED: &str = "Failed to fetch user posts";
const CREATE_POST_FAILED: &str = "Failed to create post";
const DELETE_ACCOUNT_FAILED: &str = "Failed to delete account";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupRequestDto<'a> {
    first_name: &'a str,
    last_name: &'a str,
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePostRequestDto<'a> {
    username: &'a str,
    city: &'a str,
    state: &'a str,
    description: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileResponseDto {
    user: User,
}

#[derive(Debug, Deserialize)]
struct UserPostsResponseDto {
    posts: Vec<Post>,
}

/// Достаёт сообщение из тела ошибки: сначала `message`, затем `error`,
/// иначе сообщение по умолчанию для операции.
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorResponseDto>(body)
        .ok()
        .and_then(|dto| dto.message.or(dto.error))
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn decode<T: DeserializeOwned>(body: &str) -> LegalistClientResult<T> {
    serde_json::from_str(body).map_err(|err| LegalistClientError::Decode(err.to_string()))
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API бэкенда.
///
/// Не хранит состояния сессии: токен передаётся в каждый защищённый вызов.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    ///
    /// Таймауты не задаются: действуют значения транспорта по умолчанию.
    pub fn new(base_url: impl Into<String>) -> LegalistClientResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("legalist-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Базовый URL, с которым был создан клиент.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn user_posts_url(&self, username: &str) -> LegalistClientResult<Url> {
        let mut url = Url::parse(&self.endpoint("/api/posts/user"))
            .map_err(|err| LegalistClientError::InvalidRequest(format!("bad base url: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| {
                LegalistClientError::InvalidRequest("base url cannot carry a path".to_string())
            })?
            .push(username);
        Ok(url)
    }

    /// Отправляет запрос и возвращает тело успешного ответа.
    ///
    /// Не-2xx ответ превращается в ошибку с сообщением сервера или `fallback`.
    async fn execute(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> LegalistClientResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body, fallback);
            warn!(%status, path = %url, %message, "backend rejected request");
            return Err(LegalistClientError::from_http_status(status, message));
        }

        debug!(%status, path = %url, "backend request succeeded");
        Ok(response.text().await?)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = self.endpoint(path);
        debug!(%method, %url, "sending request");

        let request = self.client.request(method, url);
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Регистрирует пользователя и возвращает токен + профиль.
    pub async fn signup(
        &self,
        first_name: &str,
        last_name: &str,
        username: &str,
        password: &str,
    ) -> LegalistClientResult<AuthResponse> {
        let payload = SignupRequestDto {
            first_name,
            last_name,
            username,
            password,
        };
        let request = self
            .request(Method::POST, "/api/auth/signup", None)
            .json(&payload);
        let body = self.execute(request, SIGNUP_FAILED).await?;
        decode(&body)
    }

    /// Выполняет вход и возвращает токен + профиль.
    pub async fn login(&self, username: &str, password: &str) -> LegalistClientResult<AuthResponse> {
        let payload = LoginRequestDto { username, password };
        let request = self
            .request(Method::POST, "/api/auth/login", None)
            .json(&payload);
        let body = self.execute(request, LOGIN_FAILED).await?;
        decode(&body)
    }

    /// Загружает профиль владельца токена.
    pub async fn fetch_profile(&self, token: &str) -> LegalistClientResult<User> {
        let request = self.request(Method::GET, "/api/auth/dashboard", Some(token));
        let body = self.execute(request, PROFILE_FAILED).await?;
        let dto: ProfileResponseDto = decode(&body)?;
        Ok(dto.user)
    }

    /// Загружает ленту постов.
    ///
    /// С `username` возвращает только посты этого пользователя.
    pub async fn fetch_posts(
        &self,
        token: &str,
        username: Option<&str>,
    ) -> LegalistClientResult<Vec<Post>> {
        match username {
            None => {
                let request = self.request(Method::GET, "/api/posts", Some(token));
                let body = self.execute(request, POSTS_FAILED).await?;
                decode(&body)
            }
            Some(username) => {
                let url = self.user_posts_url(username)?;
                debug!(method = %Method::GET, %url, "sending request");
                let request = self.client.get(url).bearer_auth(token);
                let body = self.execute(request, USER_POSTS_FAILED).await?;
                let dto: UserPostsResponseDto = decode(&body)?;
                Ok(dto.posts)
            }
        }
    }

    /// Создаёт пост от имени `username`.
    ///
    /// Бэкенд может ответить созданным постом или просто подтверждением:
    /// во втором случае возвращается `None`.
    pub async fn create_post(
        &self,
        token: &str,
        username: &str,
        city: &str,
        state: &str,
        description: &str,
    ) -> LegalistClientResult<Option<Post>> {
        let payload = CreatePostRequestDto {
            username,
            city,
            state,
            description,
        };
        let request = self
            .request(Method::POST, "/api/posts", Some(token))
            .json(&payload);
        let body = self.execute(request, CREATE_POST_FAILED).await?;

        match serde_json::from_str::<Post>(&body) {
            Ok(post) => Ok(Some(post)),
            Err(err) => {
                debug!(error = %err, "create post acknowledged without a post body");
                Ok(None)
            }
        }
    }

    /// Удаляет аккаунт владельца токена.
    pub async fn delete_account(&self, token: &str) -> LegalistClientResult<()> {
        let request = self.request(Method::DELETE, "/api/auth/delete-account", Some(token));
        self.execute(request, DELETE_ACCOUNT_FAILED).await?;
        Ok(())
    }
}
