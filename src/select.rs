//! SELECT / COUNT：一次构造同时得到分页数据语句与计数语句。

use crate::clause::{
    JoinSpec, OrderBy, SortDirection, build_columns, build_group_by, build_having, build_joins,
    build_order_by, build_where,
};
use crate::error::BuildResult;
use crate::filter::Filters;
use crate::statement::{Fragment, Statement};
use crate::value::SqlValue;
use crate::whitelist::Whitelist;

pub const DEFAULT_LIMIT: u64 = 10;

/// SELECT 配置。
///
/// ```
/// use halo_safe_query::{Filters, SelectQuery, Whitelist};
///
/// let wl = Whitelist::new(["users"], ["id", "name", "status"]);
/// let stmts = SelectQuery::new("users")
///     .columns(["id", "name"])
///     .filters(Filters::new().equal("status", 1).like("name", "ann"))
///     .order_by_desc("id")
///     .limit(20)
///     .build(&wl)
///     .unwrap();
///
/// assert_eq!(
///     stmts.data.sql,
///     "SELECT id, name FROM users WHERE 1=1 AND status = ? AND name LIKE ? ORDER BY id DESC LIMIT ? OFFSET ?"
/// );
/// assert_eq!(
///     stmts.count.sql,
///     "SELECT COUNT(1) AS total FROM users WHERE 1=1 AND status = ? AND name LIKE ?"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: String,
    pub columns: Vec<String>,
    pub filters: Filters,
    pub joins: Vec<JoinSpec>,
    pub group_by: Vec<String>,
    pub having: Filters,
    pub order_by: Option<OrderBy>,
    pub limit: u64,
    pub offset: u64,
}

/// 数据语句与计数语句，两者参数各自独立对齐。
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatements {
    pub data: Statement,
    pub count: Statement,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filters: Filters::new(),
            joins: Vec::new(),
            group_by: Vec::new(),
            having: Filters::new(),
            order_by: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }

    pub fn joins(mut self, joins: impl IntoIterator<Item = JoinSpec>) -> Self {
        self.joins.extend(joins);
        self
    }

    pub fn group_by(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.group_by = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn having(mut self, having: Filters) -> Self {
        self.having = having;
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(OrderBy::new(column, direction));
        self
    }

    pub fn order_by_asc(self, column: impl Into<String>) -> Self {
        self.order_by(column, SortDirection::Asc)
    }

    pub fn order_by_desc(self, column: impl Into<String>) -> Self {
        self.order_by(column, SortDirection::Desc)
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// 按页码分页，页码从 1 开始（小于 1 按 1 处理）。
    pub fn page(self, page: u64, per_page: u64) -> Self {
        let offset = page.max(1).saturating_sub(1).saturating_mul(per_page);
        self.offset(offset).limit(per_page)
    }

    pub fn build(&self, wl: &Whitelist) -> BuildResult<SelectStatements> {
        build_select(wl, self)
    }
}

/// 构造 SELECT 数据语句和 COUNT 语句。
///
/// 没有 GROUP BY / HAVING 时计数语句是 `SELECT COUNT(1) AS total FROM ...`；
/// 否则需要先按组折叠成一行再计数：
/// `SELECT COUNT(*) AS total FROM (SELECT 1 FROM ... GROUP BY ... HAVING ...) AS sub`。
pub fn build_select(wl: &Whitelist, q: &SelectQuery) -> BuildResult<SelectStatements> {
    wl.assert_table_allowed(&q.table)?;
    let joins = build_joins(wl, &q.joins)?;
    let columns = build_columns(wl, &q.columns)?;
    let where_clause = build_where(wl, &q.filters)?;
    let group_by = build_group_by(wl, &q.group_by)?;
    let having = build_having(wl, &q.having)?;
    let order_by = build_order_by(wl, q.order_by.as_ref());

    let mut base = Fragment::new();
    base.push_sql(&format!("FROM {}", q.table));
    base.push_sql(&joins);
    base.append(&where_clause);

    let mut data = Fragment::new();
    data.push_sql(&format!("SELECT {columns}"));
    data.append(&base.clone().into_clause());
    data.push_sql(&group_by);
    data.append(&having);
    data.push_sql(&order_by);
    data.push(
        "LIMIT ? OFFSET ?",
        [SqlValue::U64(q.limit), SqlValue::U64(q.offset)],
    );

    let count = if group_by.is_empty() && having.sql.is_empty() {
        let mut count = Fragment::new();
        count.push_sql("SELECT COUNT(1) AS total");
        count.append(&base.into_clause());
        count
    } else {
        let mut inner = Fragment::new();
        inner.push_sql("SELECT 1");
        inner.append(&base.into_clause());
        inner.push_sql(&group_by);
        inner.append(&having);
        let inner = inner.into_clause();

        let mut count = Fragment::new();
        count.push(
            &format!("SELECT COUNT(*) AS total FROM ({}) AS sub", inner.sql),
            inner.args,
        );
        count
    };

    Ok(SelectStatements {
        data: data.into_statement(),
        count: count.into_statement(),
    })
}
