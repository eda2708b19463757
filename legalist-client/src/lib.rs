//! Клиентская библиотека для бэкенда платформы правовой грамотности.
//!
//! Состоит из четырёх частей:
//! - [`SessionStore`] — токен и профиль, переживающие перезапуск;
//! - [`HttpClient`] — типизированная обёртка над REST API бэкенда;
//! - [`guard`] — какие экраны доступны при текущем состоянии входа;
//! - [`ListView`] — поиск и постраничный вывод загруженных постов.
//!
//! [`LegalistClient`] связывает их: после `login`/`signup` фиксирует сессию,
//! а на ответ 401 закрывает её.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;
mod session;
mod storage;

pub mod feed;
pub mod guard;
pub mod news;
pub mod rights;

pub use error::{LegalistClientError, LegalistClientResult};
pub use feed::{ListView, Searchable};
pub use guard::{AuthState, Navigation, View};
pub use http_client::HttpClient;
pub use models::{AuthResponse, POST_DATE_FORMAT, Post, User};
pub use news::{NewsClient, NewsItem};
pub use rights::{FUNDAMENTAL_RIGHTS, Right};
pub use session::{SessionStore, TOKEN_KEY, USER_KEY};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};

use tracing::{info, warn};

#[derive(Debug, Clone)]
/// Данные формы входа или регистрации.
pub enum AuthForm {
    /// Вход по логину и паролю.
    Login {
        /// Логин.
        username: String,
        /// Пароль.
        password: String,
    },
    /// Регистрация нового пользователя.
    Signup {
        /// Имя.
        first_name: String,
        /// Фамилия.
        last_name: String,
        /// Логин.
        username: String,
        /// Пароль.
        password: String,
    },
}

impl AuthForm {
    /// Экран, с которого отправляется форма.
    pub fn view(&self) -> View {
        match self {
            Self::Login { .. } => View::Login,
            Self::Signup { .. } => View::Signup,
        }
    }

    /// Логин из формы.
    pub fn username(&self) -> &str {
        match self {
            Self::Login { username, .. } | Self::Signup { username, .. } => username,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Чьи посты показывать на ленте.
pub enum FeedScope {
    /// Все посты.
    All,
    /// Только посты текущего пользователя.
    Mine,
}

impl FeedScope {
    /// Экран ленты.
    pub fn view(self) -> View {
        match self {
            Self::All => View::Dashboard,
            Self::Mine => View::MyPosts,
        }
    }
}

#[derive(Debug, Clone)]
/// Содержимое ленты: свежий профиль и посты.
pub struct Dashboard {
    /// Профиль владельца токена.
    pub user: User,
    /// Посты в порядке бэкенда.
    pub posts: Vec<Post>,
}

#[derive(Debug)]
/// Клиент приложения: владеет сессией и HTTP-клиентом.
///
/// Все операции, способные изменить сессию, берут `&mut self`.
pub struct LegalistClient<S: SessionStorage> {
    http: HttpClient,
    session: SessionStore<S>,
}

impl<S: SessionStorage> LegalistClient<S> {
    /// Создаёт клиента для бэкенда `base_url` и поднимает сессию из `storage`.
    pub fn new(base_url: impl Into<String>, storage: S) -> LegalistClientResult<Self> {
        Ok(Self::with_http(HttpClient::new(base_url)?, storage))
    }

    /// Создаёт клиента поверх готового [`HttpClient`].
    pub fn with_http(http: HttpClient, storage: S) -> Self {
        Self {
            http,
            session: SessionStore::initialize(storage),
        }
    }

    /// Текущая сессия.
    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// HTTP-клиент.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Состояние входа.
    pub fn auth_state(&self) -> AuthState {
        AuthState::from_authenticated(self.session.is_authenticated())
    }

    /// Проверяет переход на экран.
    pub fn guard(&self, view: View) -> Navigation {
        guard::guard(view, self.auth_state())
    }

    /// Проверяет переход по пути.
    pub fn navigate(&self, path: &str) -> Navigation {
        guard::navigate(path, self.auth_state())
    }

    /// Отправляет форму входа или регистрации и фиксирует сессию.
    pub async fn authenticate(&mut self, form: &AuthForm) -> LegalistClientResult<AuthResponse> {
        let auth = match form {
            AuthForm::Login { username, password } => self.http.login(username, password).await?,
            AuthForm::Signup {
                first_name,
                last_name,
                username,
                password,
            } => {
                self.http
                    .signup(first_name, last_name, username, password)
                    .await?
            }
        };

        if auth.token.trim().is_empty() {
            return Err(LegalistClientError::Decode(
                "auth response carries no token".to_string(),
            ));
        }

        self.session.login(&auth.token, auth.user.clone());
        info!(username = form.username(), view = ?form.view(), "authenticated");
        Ok(auth)
    }

    /// Регистрирует пользователя и открывает сессию.
    pub async fn signup(
        &mut self,
        first_name: &str,
        last_name: &str,
        username: &str,
        password: &str,
    ) -> LegalistClientResult<AuthResponse> {
        let form = AuthForm::Signup {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        };
        self.authenticate(&form).await
    }

    /// Входит и открывает сессию.
    pub async fn login(&mut self, username: &str, password: &str) -> LegalistClientResult<AuthResponse> {
        let form = AuthForm::Login {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.authenticate(&form).await
    }

    /// Закрывает сессию.
    pub fn logout(&mut self) {
        self.session.logout();
        info!("logged out");
    }

    /// Загружает профиль и кэширует его в сессии.
    ///
    /// Требует открытую сессию.
    pub async fn profile(&mut self) -> LegalistClientResult<User> {
        let token = self.require_token()?;
        let result = self.http.fetch_profile(&token).await;
        let user = self.check(result)?;
        self.session.cache_user(user.clone());
        Ok(user)
    }

    /// Загружает посты: все или только пользователя `username`.
    ///
    /// Требует открытую сессию.
    pub async fn posts(&mut self, username: Option<&str>) -> LegalistClientResult<Vec<Post>> {
        let token = self.require_token()?;
        let result = self.http.fetch_posts(&token, username).await;
        self.check(result)
    }

    /// Загружает профиль, затем посты для ленты.
    pub async fn dashboard(&mut self, scope: FeedScope) -> LegalistClientResult<Dashboard> {
        let user = self.profile().await?;
        let posts = match scope {
            FeedScope::All => self.posts(None).await?,
            FeedScope::Mine => self.posts(Some(&user.username)).await?,
        };
        Ok(Dashboard { user, posts })
    }

    /// Создаёт пост от имени текущего пользователя.
    ///
    /// Логин берётся из кэша сессии, а при его отсутствии из свежего профиля.
    pub async fn create_post(
        &mut self,
        city: &str,
        state: &str,
        description: &str,
    ) -> LegalistClientResult<Option<Post>> {
        let token = self.require_token()?;
        let username = match self.session.user() {
            Some(user) => user.username.clone(),
            None => self.profile().await?.username,
        };

        let result = self
            .http
            .create_post(&token, &username, city, state, description)
            .await;
        let created = self.check(result)?;
        info!(%username, "post created");
        Ok(created)
    }

    /// Удаляет аккаунт и закрывает сессию.
    pub async fn delete_account(&mut self) -> LegalistClientResult<()> {
        let token = self.require_token()?;
        let result = self.http.delete_account(&token).await;
        self.check(result)?;
        self.session.logout();
        info!("account deleted");
        Ok(())
    }

    fn require_token(&self) -> LegalistClientResult<String> {
        self.session
            .token()
            .map(str::to_string)
            .ok_or(LegalistClientError::NotAuthenticated)
    }

    /// Закрывает сессию, если бэкенд отверг токен.
    fn check<T>(&mut self, result: LegalistClientResult<T>) -> LegalistClientResult<T> {
        if let Err(err) = &result
            && err.is_unauthorized()
        {
            warn!(error = %err, "credential rejected, closing session");
            self.session.logout();
        }
        result
    }
}
