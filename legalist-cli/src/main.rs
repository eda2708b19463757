use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, anyhow};
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use legalist_client::feed::{DASHBOARD_PAGE_SIZE, NEWS_PAGE_LINKS, NEWS_PAGE_SIZE};
use legalist_client::news::{CATEGORIES, DEFAULT_CATEGORY, DEFAULT_LANGUAGE, LANGUAGES, language_name};
use legalist_client::rights::{FUNDAMENTAL_RIGHTS, right_at};
use legalist_client::{
    AuthForm, FeedScope, FileStorage, LegalistClient, LegalistClientError, ListView, Navigation,
    NewsClient, NewsItem, Post, User, View,
};
use tracing::debug;

mod logging;
mod settings;

use logging::init_logging;
use settings::Settings;

const MAX_DESCRIPTION_LENGTH: usize = 100;

#[derive(Debug, Parser)]
#[command(
    name = "legalist-cli",
    version,
    about = "CLI клиент платформы правовой грамотности"
)]
struct Cli {
    /// Адрес бэкенда (по умолчанию из LEGALIST_API_URL).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Файл сессии (по умолчанию из LEGALIST_SESSION_FILE).
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct FeedArgs {
    /// Поиск по автору, дате, тексту, городу и штату.
    #[arg(long, default_value = "")]
    query: String,
    /// Номер страницы, с единицы. За последней снова идёт первая.
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: сессия удаляется с диска.
    Logout,
    /// Состояние сессии.
    Status,
    /// Лента всех постов (требует вход).
    Dashboard(FeedArgs),
    /// Мои посты (требует вход).
    MyPosts(FeedArgs),
    /// Новый пост (требует вход).
    CreatePost {
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        description: String,
    },
    /// Профиль (требует вход).
    Profile,
    /// Удаление аккаунта (требует вход).
    DeleteAccount {
        /// Не спрашивать подтверждение.
        #[arg(long)]
        yes: bool,
    },
    /// Новости по категории или запросу (требует вход).
    News {
        #[arg(long, default_value = DEFAULT_CATEGORY, value_parser = PossibleValuesParser::new(CATEGORIES))]
        category: String,
        #[arg(long, default_value = DEFAULT_LANGUAGE, value_parser = PossibleValuesParser::new(LANGUAGES.map(|(code, _)| code)))]
        language: String,
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Основные права граждан (доступно всегда).
    Rights {
        /// Показать одно право, с единицы. За последним снова идёт первое.
        #[arg(long)]
        number: Option<usize>,
    },
}

impl Command {
    /// Экран, которому соответствует команда; `None` для служебных команд.
    fn view(&self) -> Option<View> {
        match self {
            Self::Signup { .. } => Some(View::Signup),
            Self::Login { .. } => Some(View::Login),
            Self::Logout | Self::Status | Self::Rights { .. } => None,
            Self::Dashboard(_) => Some(View::Dashboard),
            Self::MyPosts(_) => Some(View::MyPosts),
            Self::CreatePost { .. } => Some(View::CreatePost),
            Self::Profile | Self::DeleteAccount { .. } => Some(View::Profile),
            Self::News { .. } => Some(View::News),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    init_logging(&settings.log_level)?;

    let server = resolve_server(cli.server, &settings)?;
    let session_file = cli
        .session_file
        .unwrap_or_else(|| settings.session_file.clone());
    debug!(%server, session_file = %session_file.display(), "starting");

    let mut client = LegalistClient::new(server, FileStorage::new(session_file))
        .map_err(map_client_error)?;

    if let Some(view) = cli.command.view()
        && let Navigation::Redirect(target) = client.guard(view)
    {
        return Err(anyhow!(redirect_message(view, target)));
    }

    match cli.command {
        Command::Signup {
            first_name,
            last_name,
            username,
            password,
        } => {
            let form = AuthForm::Signup {
                first_name,
                last_name,
                username,
                password,
            };
            submit_auth_form(&mut client, &form, "Регистрация успешна").await?;
        }
        Command::Login { username, password } => {
            let form = AuthForm::Login { username, password };
            submit_auth_form(&mut client, &form, "Вход выполнен").await?;
        }
        Command::Logout => {
            client.logout();
            println!("Вы вышли из аккаунта");
        }
        Command::Status => print_status(&client),
        Command::Dashboard(args) => {
            show_feed(&mut client, FeedScope::All, &args).await?;
        }
        Command::MyPosts(args) => {
            show_feed(&mut client, FeedScope::Mine, &args).await?;
        }
        Command::CreatePost {
            city,
            state,
            description,
        } => {
            let created = client
                .create_post(&city, &state, &description)
                .await
                .map_err(map_client_error)?;
            match created {
                Some(post) => print_post("Пост создан", &post),
                None => println!("Пост создан"),
            }
        }
        Command::Profile => {
            let user = client.profile().await.map_err(map_client_error)?;
            print_user("Профиль", &user);
        }
        Command::DeleteAccount { yes } => {
            if !yes && !confirm_deletion().context("не удалось прочитать подтверждение")? {
                println!("Удаление отменено");
                return Ok(());
            }
            client.delete_account().await.map_err(map_client_error)?;
            println!("Аккаунт удалён");
        }
        Command::News {
            category,
            language,
            query,
            page,
        } => {
            let api_key = settings
                .news_api_key
                .clone()
                .ok_or_else(|| anyhow!("NEWS_API_KEY не задан: новости недоступны"))?;
            let news = NewsClient::new(&settings.news_api_url, &settings.news_api_host, api_key)
                .map_err(map_client_error)?;
            let items = news
                .search(&category, &query, &language)
                .await
                .map_err(map_client_error)?;

            let mut view = ListView::new(items, NEWS_PAGE_SIZE);
            view.go_to(page.saturating_sub(1));
            print_news(&view, &category, &query, &language);
        }
        Command::Rights { number } => print_rights(number),
    }

    Ok(())
}

async fn submit_auth_form(
    client: &mut LegalistClient<FileStorage>,
    form: &AuthForm,
    title: &str,
) -> Result<()> {
    let auth = client.authenticate(form).await.map_err(map_client_error)?;
    println!("{title}");
    match &auth.user {
        Some(user) => print_user("Пользователь", user),
        None => println!("Пользователь: {}", form.username()),
    }
    Ok(())
}

async fn show_feed(
    client: &mut LegalistClient<FileStorage>,
    scope: FeedScope,
    args: &FeedArgs,
) -> Result<()> {
    let dashboard = client.dashboard(scope).await.map_err(map_client_error)?;

    let mut view = ListView::new(dashboard.posts, DASHBOARD_PAGE_SIZE);
    view.set_query(&args.query);
    view.go_to(args.page.saturating_sub(1));

    let title = match scope {
        FeedScope::All => "Лента",
        FeedScope::Mine => "Мои посты",
    };
    println!(
        "{title} ({} {})",
        dashboard.user.first_name, dashboard.user.last_name
    );
    print_feed(&view);
    Ok(())
}

/// Флаг `--server` важнее окружения; проверяется только адрес, который будет использован.
fn resolve_server(flag: Option<String>, settings: &Settings) -> Result<String> {
    match flag {
        Some(server) => Ok(normalize_server(server)),
        None => Ok(settings.checked_api_url()?.to_string()),
    }
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn redirect_message(requested: View, target: View) -> String {
    match target {
        View::Login => format!(
            "{} требует входа: выполните `legalist-cli login ...` или `legalist-cli signup ...`",
            requested.path()
        ),
        _ => format!(
            "вы уже вошли, {} недоступен: перейдите в {} или выполните `legalist-cli logout`",
            requested.path(),
            target.path()
        ),
    }
}

fn parse_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "д" | "да")
}

fn confirm_deletion() -> io::Result<bool> {
    print!("Удалить аккаунт? Это действие необратимо. [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(parse_confirmation(&answer))
}

fn map_client_error(err: LegalistClientError) -> anyhow::Error {
    let message = match &err {
        LegalistClientError::Unauthorized { message } => {
            format!("{message}; сессия закрыта, выполните `legalist-cli login ...`")
        }
        LegalistClientError::NotAuthenticated => {
            "требуется авторизация: выполните `legalist-cli login ...` или `legalist-cli signup ...`"
                .to_string()
        }
        _ => err.message(),
    };
    anyhow!(message)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

fn or_not_available(value: &str) -> &str {
    if value.trim().is_empty() {
        "Not available"
    } else {
        value
    }
}

fn print_status(client: &LegalistClient<FileStorage>) {
    let session = client.session();
    println!("Сессия: {}", session.storage().path().display());
    println!("Сервер: {}", client.http().base_url());
    if !session.is_authenticated() {
        println!("Вход не выполнен");
        return;
    }
    match session.user() {
        Some(user) => println!("Вход выполнен: {}", user.username),
        None => println!("Вход выполнен (профиль ещё не загружен)"),
    }
}

fn print_user(title: &str, user: &User) {
    println!("{title}");
    println!("  first_name: {}", or_not_available(&user.first_name));
    println!("  last_name: {}", or_not_available(&user.last_name));
    println!("  username: {}", or_not_available(&user.username));
}

fn location(post: &Post) -> String {
    [post.city.as_deref(), post.state.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("username: {}", post.username);
    println!("location: {}", location(post));
    println!("date: {}", post.formatted_date());
    println!("description: {}", post.description);
}

fn print_feed(view: &ListView<Post>) {
    if !view.query().is_empty() {
        println!("Найдено {} по запросу \"{}\"", view.len(), view.query());
    }
    if view.is_empty() {
        println!("Постов пока нет");
        return;
    }

    for post in view.current_page() {
        println!(
            "- [{}] {} · {} · {}",
            post.id,
            post.username,
            location(post),
            post.formatted_date()
        );
        println!("  {}", truncate(&post.description, MAX_DESCRIPTION_LENGTH));
    }
    println!("Страница {} из {}", view.page() + 1, view.total_pages());
}

fn page_links(view: &ListView<NewsItem>) -> String {
    view.page_numbers(NEWS_PAGE_LINKS)
        .into_iter()
        .map(|page| {
            if page == view.page() {
                format!("[{}]", page + 1)
            } else {
                (page + 1).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_news(view: &ListView<NewsItem>, category: &str, query: &str, language: &str) {
    let topic = if query.trim().is_empty() { category } else { query.trim() };
    println!(
        "Новости: {topic} ({})",
        language_name(language).unwrap_or(language)
    );
    if view.is_empty() {
        println!("Новостей по этой категории или запросу нет");
        return;
    }

    for item in view.current_page() {
        println!(
            "- {} · {} · {}",
            item.title,
            item.publisher.as_deref().unwrap_or("Unknown Source"),
            item.formatted_date().unwrap_or_default()
        );
        if let Some(summary) = item.summary() {
            println!("  {}", truncate(summary, MAX_DESCRIPTION_LENGTH));
        }
        if let Some(url) = item.url() {
            println!("  {url}");
        }
    }
    if view.total_pages() > 1 {
        println!("Страницы: {}", page_links(view));
    }
}

fn print_rights(number: Option<usize>) {
    match number {
        Some(number) => {
            let right = right_at(number.saturating_sub(1));
            println!("{}", right.title);
            println!("  {}", right.description);
        }
        None => {
            println!("Know Your Rights");
            for (i, right) in FUNDAMENTAL_RIGHTS.iter().enumerate() {
                println!("{}. {}", i + 1, right.title);
                println!("   {}", right.description);
            }
        }
    }
}
