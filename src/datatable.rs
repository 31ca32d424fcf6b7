//! DataTables 服务端分页：总数、过滤后总数、当前页数据三条查询。
//!
//! 三条查询依次执行，彼此之间没有事务或快照保证；并发写入时
//! `recordsTotal` / `recordsFiltered` / `data` 可能互相不一致。

use crate::clause::{JoinSpec, SortDirection};
use crate::error::BuildError;
use crate::filter::{Filter, Filters, Operator};
use crate::select::SelectQuery;
use crate::statement::Statement;
use crate::value::SqlValue;
use crate::whitelist::Whitelist;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// 一行结果：列名到 JSON 值。
pub type Row = serde_json::Map<String, serde_json::Value>;

/// 能执行一条语句并返回所有行的数据访问句柄。
pub trait RowSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_rows(
        &self,
        sql: &str,
        args: &[SqlValue],
    ) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum DataTableError<E>
where
    E: std::error::Error + 'static,
{
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("datatable row source failed: {0}")]
    Source(#[source] E),
}

/// 前端 DataTables 发来的分页/搜索/排序参数。
///
/// `length` 为负数（DataTables 用 `-1` 表示"全部"）时不分页。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataTableRequest {
    pub draw: u64,
    pub start: u64,
    pub length: i64,
    pub search: String,
    pub order_column: Option<String>,
    pub order_dir: SortDirection,
}

impl Default for DataTableRequest {
    fn default() -> Self {
        Self {
            draw: 0,
            start: 0,
            length: crate::select::DEFAULT_LIMIT as i64,
            search: String::new(),
            order_column: None,
            order_dir: SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTableResponse {
    pub draw: u64,
    pub records_total: u64,
    pub records_filtered: u64,
    pub data: Vec<Row>,
}

/// 一次请求对应的三条语句。
#[derive(Debug, Clone, PartialEq)]
pub struct DataTablePlan {
    pub total: Statement,
    pub filtered: Statement,
    pub data: Statement,
}

/// 一张表的 DataTables 配置。
#[derive(Debug, Clone)]
pub struct DataTable {
    whitelist: Whitelist,
    table: String,
    columns: Vec<String>,
    joins: Vec<JoinSpec>,
    group_by: Option<String>,
    extra_filters: Filters,
    searchable: Option<Vec<String>>,
}

impl DataTable {
    pub fn new(whitelist: Whitelist, table: impl Into<String>) -> Self {
        Self {
            whitelist,
            table: table.into(),
            columns: Vec::new(),
            joins: Vec::new(),
            group_by: None,
            extra_filters: Filters::new(),
            searchable: None,
        }
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }

    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by = Some(column.into());
        self
    }

    /// 调用方预先构造好的附加条件，只作用于过滤后总数和数据查询。
    pub fn extra_filters(mut self, filters: Filters) -> Self {
        self.extra_filters = filters;
        self
    }

    /// 指定参与搜索的列，替换默认的 [`Whitelist::search_columns`]。
    pub fn searchable(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.searchable = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// 搜索条件：每个搜索列做 `LIKE`，整体用 OR 连接后接在附加条件之后。
    fn search_filters(&self, search: &str) -> Filters {
        let filters = self.extra_filters.clone();
        if search.is_empty() {
            return filters;
        }
        let like = |c: &str| Filter::new(c, Operator::Like, search.to_string());
        match &self.searchable {
            Some(cols) => filters.any_of(cols.iter().map(|c| like(c.as_str()))),
            None => filters.any_of(self.whitelist.search_columns().into_iter().map(like)),
        }
    }

    fn base_query(&self) -> SelectQuery {
        SelectQuery::new(self.table.as_str())
            .columns(self.columns.iter().cloned())
            .joins(self.joins.iter().cloned())
            .group_by(self.group_by.iter().cloned())
    }

    /// 只构造语句，不执行。
    pub fn plan(&self, req: &DataTableRequest) -> Result<DataTablePlan, BuildError> {
        let total = self.base_query().build(&self.whitelist)?.count;

        let mut query = self
            .base_query()
            .filters(self.search_filters(&req.search))
            .limit(page_length(req.length))
            .offset(req.start);
        if let Some(col) = &req.order_column {
            query = query.order_by(col.as_str(), req.order_dir);
        }
        let stmts = query.build(&self.whitelist)?;

        Ok(DataTablePlan {
            total,
            filtered: stmts.count,
            data: stmts.data,
        })
    }

    /// 依次执行总数、过滤后总数、当前页数据三条查询。
    pub async fn fetch<S: RowSource>(
        &self,
        source: &S,
        req: &DataTableRequest,
    ) -> Result<DataTableResponse, DataTableError<S::Error>> {
        let plan = self.plan(req)?;

        let records_total = read_total(&run(source, &plan.total).await?);
        let records_filtered = read_total(&run(source, &plan.filtered).await?);
        let data = run(source, &plan.data).await?;

        tracing::debug!(
            target: "halo_safe_query::datatable",
            table = %self.table,
            draw = req.draw,
            records_total,
            records_filtered,
            rows = data.len(),
            "datatable page fetched"
        );

        Ok(DataTableResponse {
            draw: req.draw,
            records_total,
            records_filtered,
            data,
        })
    }
}

/// 负数表示不分页；MySQL 没有 `LIMIT ALL`，用 u64 最大值代替。
fn page_length(length: i64) -> u64 {
    u64::try_from(length).unwrap_or(u64::MAX)
}

async fn run<S: RowSource>(
    source: &S,
    stmt: &Statement,
) -> Result<Vec<Row>, DataTableError<S::Error>> {
    tracing::debug!(
        target: "halo_safe_query::datatable",
        sql = %stmt.sql,
        param_count = stmt.args.len(),
        "executing"
    );
    source
        .fetch_rows(&stmt.sql, &stmt.args)
        .await
        .map_err(DataTableError::Source)
}

/// 取第一行的 `total` 字段；驱动可能把它返回成数字或数字字符串，取不到按 0 处理。
fn read_total(rows: &[Row]) -> u64 {
    let Some(v) = rows.first().and_then(|r| r.get("total")) else {
        return 0;
    };
    match v {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
