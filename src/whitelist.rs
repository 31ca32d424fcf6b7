//! 标识符白名单：允许出现在 SQL 文本里的表名与列表达式。
//!
//! 这里只做精确字符串匹配，不解析 SQL。`"customers.name AS customer_name"`
//! 这样带别名的条目可以直接出现在 SELECT 列表里；别名左侧的表达式本身
//! 也可以作为 SELECT 列使用（见 [`Whitelist::assert_select_column_allowed`]）。

use crate::error::{BuildError, BuildResult};

const ALIAS_SEPARATOR: &str = " AS ";

/// 允许的表和列。保持插入顺序并去重，遍历结果是确定的。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    tables: Vec<String>,
    columns: Vec<String>,
}

impl Whitelist {
    pub fn new(
        tables: impl IntoIterator<Item = impl Into<String>>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut wl = Self::default();
        for t in tables {
            push_unique(&mut wl.tables, t.into());
        }
        for c in columns {
            push_unique(&mut wl.columns, c.into());
        }
        wl
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        push_unique(&mut self.tables, table.into());
        self
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        push_unique(&mut self.columns, column.into());
        self
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_table_allowed(&self, table: &str) -> bool {
        self.tables.iter().any(|t| t == table)
    }

    pub fn is_column_allowed(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// SELECT 列的宽松匹配：完全相等，或 `" AS "` 左侧与某个条目相等。
    pub fn is_select_column_allowed(&self, column: &str) -> bool {
        if self.is_column_allowed(column) {
            return true;
        }
        match column.split_once(ALIAS_SEPARATOR) {
            Some((expr, _alias)) => self.is_column_allowed(expr),
            None => false,
        }
    }

    pub fn assert_table_allowed(&self, table: &str) -> BuildResult<()> {
        if self.is_table_allowed(table) {
            return Ok(());
        }
        tracing::debug!(target: "halo_safe_query::whitelist", table, "rejected table");
        Err(BuildError::DisallowedTable(table.to_string()))
    }

    pub fn assert_column_allowed(&self, column: &str) -> BuildResult<()> {
        if self.is_column_allowed(column) {
            return Ok(());
        }
        tracing::debug!(target: "halo_safe_query::whitelist", column, "rejected column");
        Err(BuildError::DisallowedColumn(column.to_string()))
    }

    pub fn assert_select_column_allowed(&self, column: &str) -> BuildResult<()> {
        if self.is_select_column_allowed(column) {
            return Ok(());
        }
        tracing::debug!(target: "halo_safe_query::whitelist", column, "rejected select column");
        Err(BuildError::DisallowedColumn(column.to_string()))
    }

    /// 可用于全文搜索的表达式：每个条目取 `" AS "` 左侧，跳过聚合等带括号的表达式，去重。
    pub fn search_columns(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for c in &self.columns {
            let expr = alias_target(c);
            if !expr.contains('(') && !out.contains(&expr) {
                out.push(expr);
            }
        }
        out
    }

    /// 搜索组里的列：完全相等的条目，或某个带别名条目的左侧；聚合表达式不能进 WHERE。
    pub fn is_search_column_allowed(&self, column: &str) -> bool {
        !column.contains('(') && self.columns.iter().any(|c| alias_target(c) == column)
    }

    pub fn assert_search_column_allowed(&self, column: &str) -> BuildResult<()> {
        if self.is_search_column_allowed(column) {
            return Ok(());
        }
        tracing::debug!(target: "halo_safe_query::whitelist", column, "rejected search column");
        Err(BuildError::DisallowedColumn(column.to_string()))
    }
}

fn alias_target(entry: &str) -> &str {
    entry
        .split_once(ALIAS_SEPARATOR)
        .map_or(entry, |(expr, _alias)| expr)
}

fn push_unique(dst: &mut Vec<String>, v: String) {
    if !dst.contains(&v) {
        dst.push(v);
    }
}
