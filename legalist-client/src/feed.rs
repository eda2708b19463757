//! Поиск и постраничный вывод по загруженному списку.
//!
//! Исходный список не меняется: фильтр хранит индексы подходящих элементов,
//! а страница вычисляется по ним на лету.

use crate::models::Post;

/// Размер страницы ленты постов.
pub const DASHBOARD_PAGE_SIZE: usize = 3;
/// Размер страницы новостей.
pub const NEWS_PAGE_SIZE: usize = 9;
/// Сколько номеров страниц показывать в навигации новостей.
pub const NEWS_PAGE_LINKS: usize = 6;

/// Элемент, по которому можно искать подстрокой.
pub trait Searchable {
    /// `needle` уже приведён к нижнему регистру и не пуст.
    fn matches(&self, needle: &str) -> bool;
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Searchable for Post {
    fn matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.username, needle)
            || contains_ignore_case(&self.formatted_date(), needle)
            || contains_ignore_case(&self.description, needle)
            || self
                .city
                .as_deref()
                .is_some_and(|city| contains_ignore_case(city, needle))
            || self
                .state
                .as_deref()
                .is_some_and(|state| contains_ignore_case(state, needle))
    }
}

#[derive(Debug, Clone)]
/// Состояние списка: исходные элементы, поисковый запрос и текущая страница.
pub struct ListView<T> {
    source: Vec<T>,
    query: String,
    derived: Vec<usize>,
    page: usize,
    page_size: usize,
}

impl<T: Searchable> ListView<T> {
    /// Заменяет исходный список, сохраняя запрос. Страница остаётся прежней,
    /// если она ещё существует, иначе возвращается на первую.
    pub fn set_source(&mut self, source: Vec<T>) {
        self.source = source;
        self.derive();
        if self.page >= self.total_pages() {
            self.page = 0;
        }
    }

    /// Меняет поисковый запрос и возвращает на первую страницу.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.derive();
        self.page = 0;
    }

    fn derive(&mut self) {
        if self.query.is_empty() {
            self.derived = (0..self.source.len()).collect();
            return;
        }

        let needle = self.query.to_lowercase();
        self.derived = self
            .source
            .iter()
            .enumerate()
            .filter(|(_, item)| item.matches(&needle))
            .map(|(idx, _)| idx)
            .collect();
    }
}

impl<T> ListView<T> {
    /// Список без фильтра на первой странице. Нулевой размер страницы
    /// считается единичным. Поиск доступен, только если `T: Searchable`.
    pub fn new(source: Vec<T>, page_size: usize) -> Self {
        let derived = (0..source.len()).collect();
        Self {
            source,
            query: String::new(),
            derived,
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Текущий запрос без пробелов по краям.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Исходный список в порядке загрузки.
    pub fn source(&self) -> &[T] {
        &self.source
    }

    /// Отфильтрованный список.
    pub fn derived(&self) -> Vec<&T> {
        self.derived.iter().map(|&idx| &self.source[idx]).collect()
    }

    /// Сколько элементов прошло фильтр.
    pub fn len(&self) -> usize {
        self.derived.len()
    }

    /// `true`, если показывать нечего.
    pub fn is_empty(&self) -> bool {
        self.derived.is_empty()
    }

    /// Размер страницы.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Число страниц; ноль для пустого списка.
    pub fn total_pages(&self) -> usize {
        self.derived.len().div_ceil(self.page_size)
    }

    /// Текущая страница, с нуля.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Элементы текущей страницы.
    pub fn current_page(&self) -> Vec<&T> {
        let start = self.page * self.page_size;
        let end = (start + self.page_size).min(self.derived.len());
        if start >= end {
            return Vec::new();
        }
        self.derived[start..end]
            .iter()
            .map(|&idx| &self.source[idx])
            .collect()
    }

    /// Следующая страница; с последней переходит на первую.
    pub fn next_page(&mut self) {
        let total = self.total_pages();
        if total > 0 {
            self.page = (self.page + 1) % total;
        }
    }

    /// Предыдущая страница; с первой переходит на последнюю.
    pub fn previous_page(&mut self) {
        let total = self.total_pages();
        if total > 0 {
            self.page = (self.page + total - 1) % total;
        }
    }

    /// Переход на страницу `page` по модулю числа страниц.
    pub fn go_to(&mut self, page: usize) {
        let total = self.total_pages();
        self.page = if total > 0 { page % total } else { 0 };
    }

    /// Номера страниц для навигации: не больше `max_items` подряд, текущая
    /// по возможности в середине.
    pub fn page_numbers(&self, max_items: usize) -> Vec<usize> {
        let total = self.total_pages();
        if max_items == 0 || total == 0 {
            return Vec::new();
        }

        let mut start = self.page.saturating_sub(max_items / 2);
        let end = (start + max_items).min(total);
        if end - start < max_items {
            start = end.saturating_sub(max_items);
        }
        (start..end).collect()
    }
}
