//! List-view queries: filters, search, ordering, pagination
//!
//! These types describe what a list page asks for; the store turns them into
//! WHERE/ORDER BY fragments. Ordering keys are validated here so nothing
//! user-supplied is ever spliced into SQL.

use rusqlite::types::Value;
use serde::Serialize;

/// Pagination request. Pages are 1-based.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub(crate) fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

/// One page of list results with totals
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, page: Page, total: usize) -> Self {
        let per_page = page.per_page as usize;
        Self {
            items,
            page: page.page,
            per_page: page.per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sortable columns of the blog list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogOrder {
    Title,
    Created,
    Modified,
    /// The annotated comment count
    Comments,
}

impl BlogOrder {
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "created" => Some(Self::Created),
            "modified" => Some(Self::Modified),
            "comments" => Some(Self::Comments),
            _ => None,
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Self::Title => "lower(b.title)",
            Self::Created => "b.date_created",
            Self::Modified => "b.last_modified",
            Self::Comments => "comment_count",
        }
    }
}

/// Filters and ordering for the blog list view
#[derive(Debug, Clone, Default)]
pub struct BlogQuery {
    /// Case-insensitive title substring search
    pub search: Option<String>,
    pub is_draft: Option<bool>,
    /// Require membership in this category
    pub category_id: Option<i64>,
    /// Date-hierarchy drilldown on date_created
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub order: Option<BlogOrder>,
    pub dir: SortDir,
}

impl BlogQuery {
    pub(crate) fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(search) = &self.search {
            clauses.push("lower(b.title) LIKE ?".to_string());
            params.push(Value::Text(format!("%{}%", search.to_lowercase())));
        }

        if let Some(is_draft) = self.is_draft {
            clauses.push("b.is_draft = ?".to_string());
            params.push(Value::Integer(i64::from(is_draft)));
        }

        if let Some(category_id) = self.category_id {
            clauses.push(
                "EXISTS (SELECT 1 FROM blog_categories bc \
                 WHERE bc.blog_id = b.id AND bc.category_id = ?)"
                    .to_string(),
            );
            params.push(Value::Integer(category_id));
        }

        // Stored timestamps are RFC 3339, so date parts sit at fixed offsets
        if let Some(year) = self.year {
            clauses.push("substr(b.date_created, 1, 4) = ?".to_string());
            params.push(Value::Text(format!("{year:04}")));
        }
        if let Some(month) = self.month {
            clauses.push("substr(b.date_created, 6, 2) = ?".to_string());
            params.push(Value::Text(format!("{month:02}")));
        }
        if let Some(day) = self.day {
            clauses.push("substr(b.date_created, 9, 2) = ?".to_string());
            params.push(Value::Text(format!("{day:02}")));
        }

        if clauses.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", clauses.join(" AND ")), params)
        }
    }

    pub(crate) fn order_clause(&self) -> String {
        match self.order {
            Some(order) => format!("ORDER BY {} {}, b.id ASC", order.sql(), self.dir.sql()),
            // Title first, newest as tie-break
            None => "ORDER BY lower(b.title) ASC, b.date_created DESC".to_string(),
        }
    }
}

/// Sortable columns of the comment list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentOrder {
    #[default]
    Created,
    Modified,
}

impl CommentOrder {
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "created" => Some(Self::Created),
            "modified" => Some(Self::Modified),
            _ => None,
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Self::Created => "date_created",
            Self::Modified => "last_modified",
        }
    }
}

/// Filters and ordering for the comment list view
#[derive(Debug, Clone, Default)]
pub struct CommentQuery {
    pub blog_id: Option<i64>,
    pub is_active: Option<bool>,
    /// Case-insensitive comment text substring search
    pub search: Option<String>,
    pub order: CommentOrder,
    pub dir: SortDir,
}

impl CommentQuery {
    pub(crate) fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(blog_id) = self.blog_id {
            clauses.push("blog_id = ?".to_string());
            params.push(Value::Integer(blog_id));
        }

        if let Some(is_active) = self.is_active {
            clauses.push("is_active = ?".to_string());
            params.push(Value::Integer(i64::from(is_active)));
        }

        if let Some(search) = &self.search {
            clauses.push("lower(comment) LIKE ?".to_string());
            params.push(Value::Text(format!("%{}%", search.to_lowercase())));
        }

        if clauses.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", clauses.join(" AND ")), params)
        }
    }

    pub(crate) fn order_clause(&self) -> String {
        format!("ORDER BY {} {}, id ASC", self.order.sql(), self.dir.sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_normalizes_zero() {
        let page = Page::new(0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_offset() {
        let page = Page::new(3, 25);
        assert_eq!(page.offset(), 50);
        assert_eq!(page.limit(), 25);
    }

    #[test]
    fn test_paged_total_pages() {
        let page = Page::new(1, 10);
        assert_eq!(Paged::<i64>::new(vec![], page, 0).total_pages, 0);
        assert_eq!(Paged::<i64>::new(vec![], page, 10).total_pages, 1);
        assert_eq!(Paged::<i64>::new(vec![], page, 11).total_pages, 2);
    }

    #[test]
    fn test_blog_order_from_param() {
        assert_eq!(BlogOrder::from_param("title"), Some(BlogOrder::Title));
        assert_eq!(BlogOrder::from_param("comments"), Some(BlogOrder::Comments));
        assert_eq!(BlogOrder::from_param("slug"), None);
    }

    #[test]
    fn test_empty_query_has_no_where() {
        let (sql, params) = BlogQuery::default().where_clause();
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_where_clause_combines_filters() {
        let query = BlogQuery {
            search: Some("Rust".to_string()),
            is_draft: Some(false),
            year: Some(2026),
            month: Some(8),
            ..Default::default()
        };
        let (sql, params) = query.where_clause();
        assert!(sql.starts_with("WHERE "));
        assert_eq!(sql.matches(" AND ").count(), 3);
        assert_eq!(params.len(), 4);
        assert_eq!(params[0], Value::Text("%rust%".to_string()));
        assert_eq!(params[3], Value::Text("08".to_string()));
    }

    #[test]
    fn test_default_order_clause() {
        let clause = BlogQuery::default().order_clause();
        assert!(clause.contains("lower(b.title) ASC"));
        assert!(clause.contains("b.date_created DESC"));
    }

    #[test]
    fn test_explicit_order_clause() {
        let query = BlogQuery {
            order: Some(BlogOrder::Comments),
            dir: SortDir::Desc,
            ..Default::default()
        };
        assert_eq!(query.order_clause(), "ORDER BY comment_count DESC, b.id ASC");
    }
}
