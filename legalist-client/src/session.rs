use tracing::{debug, warn};

use crate::models::User;
use crate::storage::{SessionStorage, StorageError};

/// Ключ токена в хранилище.
pub const TOKEN_KEY: &str = "token";
/// Ключ сериализованного профиля в хранилище.
pub const USER_KEY: &str = "user";

fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn parse_user(raw: &str) -> Option<User> {
    serde_json::from_str::<User>(raw).ok()
}

fn log_storage_failure(op: &'static str, key: &str, result: Result<(), StorageError>) {
    if let Err(err) = result {
        warn!(op, key, error = %err, "session storage unavailable, keeping session in memory only");
    }
}

#[derive(Debug)]
/// Единственный источник истины о состоянии входа.
///
/// Признак входа не хранится отдельно, а выводится из наличия токена,
/// поэтому токен и признак меняются вместе. Сбои хранилища только логируются.
pub struct SessionStore<S: SessionStorage> {
    storage: S,
    token: Option<String>,
    user: Option<User>,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Поднимает сессию из хранилища. Сеть не используется.
    pub fn initialize(storage: S) -> Self {
        let token = match storage.get(TOKEN_KEY) {
            Ok(raw) => raw.as_deref().and_then(parse_token),
            Err(err) => {
                warn!(error = %err, "failed to read persisted token");
                None
            }
        };
        let user = match storage.get(USER_KEY) {
            Ok(raw) => raw.as_deref().and_then(parse_user),
            Err(err) => {
                warn!(error = %err, "failed to read persisted user");
                None
            }
        };

        debug!(
            authenticated = token.is_some(),
            cached_user = user.is_some(),
            "session initialized"
        );
        Self {
            storage,
            token,
            user,
        }
    }

    /// Фиксирует успешный вход: сохраняет токен и профиль.
    ///
    /// Пустой токен равносилен выходу.
    pub fn login(&mut self, token: &str, user: Option<User>) {
        let Some(token) = parse_token(token) else {
            warn!("login committed with a blank token, clearing session");
            self.logout();
            return;
        };

        log_storage_failure("set", TOKEN_KEY, self.storage.set(TOKEN_KEY, &token));
        match &user {
            Some(user) => self.persist_user(user),
            None => log_storage_failure("remove", USER_KEY, self.storage.remove(USER_KEY)),
        }

        self.token = Some(token);
        self.user = user;
        debug!(username = self.user.as_ref().map(|u| u.username.as_str()), "session opened");
    }

    /// Закрывает сессию: чистит хранилище и состояние в памяти.
    pub fn logout(&mut self) {
        log_storage_failure("remove", TOKEN_KEY, self.storage.remove(TOKEN_KEY));
        log_storage_failure("remove", USER_KEY, self.storage.remove(USER_KEY));
        self.token = None;
        self.user = None;
        debug!("session closed");
    }

    /// Кладёт свежий профиль в кэш, токен не трогает.
    pub fn cache_user(&mut self, user: User) {
        if !self.is_authenticated() {
            debug!("ignoring profile for a closed session");
            return;
        }
        self.persist_user(&user);
        self.user = Some(user);
    }

    fn persist_user(&mut self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => log_storage_failure("set", USER_KEY, self.storage.set(USER_KEY, &raw)),
            Err(err) => warn!(error = %err, "failed to serialize user"),
        }
    }

    /// Вошёл ли пользователь.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Текущий токен.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Закэшированный профиль.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Хранилище, из которого поднята сессия.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Разбирает сессию и возвращает хранилище.
    pub fn into_storage(self) -> S {
        self.storage
    }
}
