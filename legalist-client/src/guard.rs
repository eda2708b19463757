//! Разграничение доступа к экранам по состоянию сессии.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Состояние входа, как его видит навигация.
pub enum AuthState {
    /// Токена нет.
    Anonymous,
    /// Токен есть.
    Authenticated,
}

impl AuthState {
    /// Состояние по признаку входа из сессии.
    pub fn from_authenticated(authenticated: bool) -> Self {
        if authenticated {
            Self::Authenticated
        } else {
            Self::Anonymous
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Кому доступен экран.
pub enum Access {
    /// Только гостям: вошедших уводит на ленту.
    Public,
    /// Только вошедшим: гостей уводит на вход.
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Экраны приложения.
pub enum View {
    /// Вход, `/`.
    Login,
    /// Регистрация, `/signup`.
    Signup,
    /// Общая лента, `/dashboard`.
    Dashboard,
    /// Посты текущего пользователя, `/dashboard/myposts`.
    MyPosts,
    /// Новый пост, `/create-post`.
    CreatePost,
    /// Профиль и удаление аккаунта, `/profile`.
    Profile,
    /// Новости, `/news`.
    News,
}

impl View {
    /// Экран, куда попадает гость.
    pub const PUBLIC_LANDING: View = View::Login;
    /// Экран, куда попадает вошедший пользователь.
    pub const AUTHENTICATED_LANDING: View = View::Dashboard;

    /// Путь экрана.
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Signup => "/signup",
            Self::Dashboard => "/dashboard",
            Self::MyPosts => "/dashboard/myposts",
            Self::CreatePost => "/create-post",
            Self::Profile => "/profile",
            Self::News => "/news",
        }
    }

    /// Экран по пути; `None` для неизвестных путей.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        match path {
            "" | "/" => Some(Self::Login),
            "/signup" => Some(Self::Signup),
            "/dashboard" => Some(Self::Dashboard),
            "/dashboard/myposts" => Some(Self::MyPosts),
            "/create-post" => Some(Self::CreatePost),
            "/profile" => Some(Self::Profile),
            "/news" => Some(Self::News),
            _ => None,
        }
    }

    /// Кому доступен экран.
    pub fn access(self) -> Access {
        match self {
            Self::Login | Self::Signup => Access::Public,
            Self::Dashboard | Self::MyPosts | Self::CreatePost | Self::Profile | Self::News => {
                Access::Protected
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Решение навигации.
pub enum Navigation {
    /// Экран можно показать.
    Allow(View),
    /// Нужно перейти на другой экран.
    Redirect(View),
}

impl Navigation {
    /// Экран, который в итоге будет показан.
    pub fn target(self) -> View {
        match self {
            Self::Allow(view) | Self::Redirect(view) => view,
        }
    }
}

/// Проверяет переход на `view` при состоянии `state`.
pub fn guard(view: View, state: AuthState) -> Navigation {
    match (view.access(), state) {
        (Access::Public, AuthState::Authenticated) => {
            Navigation::Redirect(View::AUTHENTICATED_LANDING)
        }
        (Access::Protected, AuthState::Anonymous) => Navigation::Redirect(View::PUBLIC_LANDING),
        _ => Navigation::Allow(view),
    }
}

/// Проверяет переход по пути. Неизвестный путь ведёт на вход, который
/// сам подчиняется охране.
pub fn navigate(path: &str, state: AuthState) -> Navigation {
    match View::from_path(path) {
        Some(view) => guard(view, state),
        None => Navigation::Redirect(guard(View::PUBLIC_LANDING, state).target()),
    }
}
