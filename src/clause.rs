//! 子句构造：WHERE / HAVING / JOIN / GROUP BY / ORDER BY / 列清单。
//!
//! 所有函数都是纯函数：先校验白名单，再产出文本；带参数的子句把文本和
//! 参数一起返回，顺序与 `?` 一一对应。

use crate::error::{BuildError, BuildResult};
use crate::filter::{Criterion, Filter, FilterValue, Filters, Operator};
use crate::statement::{Fragment, Statement};
use crate::string_builder::{StringBuilder, placeholders};
use crate::value::SqlValue;
use crate::whitelist::Whitelist;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// JOIN 类型，默认 `LEFT`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Left,
    Inner,
    Right,
    Full,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Inner => "INNER",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
        }
    }
}

/// JOIN 的 ON 条件。
///
/// `Raw` 原样写入 SQL，不做任何校验，只能来自可信代码，不能拼接用户输入。
/// `Columns` 渲染为 `left = right`，两侧列都要在白名单内。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOn {
    Raw(String),
    Columns { left: String, right: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub table: String,
    pub on: JoinOn,
    pub kind: JoinKind,
}

impl JoinSpec {
    /// 可信的原始 ON 谓词。
    pub fn new(table: impl Into<String>, on: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            on: JoinOn::Raw(on.into()),
            kind: JoinKind::default(),
        }
    }

    /// `ON left = right`，两侧列走白名单校验。
    pub fn on_columns(
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            on: JoinOn::Columns {
                left: left.into(),
                right: right.into(),
            },
            kind: JoinKind::default(),
        }
    }

    pub fn kind(mut self, kind: JoinKind) -> Self {
        self.kind = kind;
        self
    }
}

/// 排序方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ASC")]
    Asc,
    #[serde(alias = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.trim().eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(BuildError::UnsupportedSortDirection(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Desc)
    }
}

/// `WHERE 1=1 AND ...`。`filters` 为空时只有 `WHERE 1=1`。
pub fn build_where(wl: &Whitelist, filters: &Filters) -> BuildResult<Statement> {
    let mut out = Fragment::new();
    out.push_sql("WHERE 1=1");
    write_predicate(wl, filters, &mut out)?;
    Ok(out.into_clause())
}

/// `HAVING 1=1 AND ...`。`filters` 为空时返回空文本。
///
/// 与 WHERE 使用同一套运算符与同样严格的列白名单；聚合表达式需要原样
/// 出现在白名单里才能用于 HAVING。
pub fn build_having(wl: &Whitelist, filters: &Filters) -> BuildResult<Statement> {
    if filters.is_empty() {
        return Ok(Statement::default());
    }
    let mut out = Fragment::new();
    out.push_sql("HAVING 1=1");
    write_predicate(wl, filters, &mut out)?;
    Ok(out.into_clause())
}

/// `LEFT JOIN t ON ...`，多个 JOIN 以空格连接；JOIN 不产生参数。
pub fn build_joins(wl: &Whitelist, joins: &[JoinSpec]) -> BuildResult<String> {
    let mut buf = StringBuilder::new();
    for join in joins {
        wl.assert_table_allowed(&join.table)?;
        let on = match &join.on {
            JoinOn::Raw(expr) => expr.clone(),
            JoinOn::Columns { left, right } => {
                wl.assert_column_allowed(left)?;
                wl.assert_column_allowed(right)?;
                format!("{left} = {right}")
            }
        };
        buf.write_leading(&format!("{} JOIN {} ON {on}", join.kind.as_str(), join.table));
    }
    Ok(buf.into_string())
}

/// `GROUP BY a, b`。`columns` 为空时返回空文本。
pub fn build_group_by(wl: &Whitelist, columns: &[String]) -> BuildResult<String> {
    if columns.is_empty() {
        return Ok(String::new());
    }
    for c in columns {
        wl.assert_column_allowed(c)?;
    }
    let mut buf = StringBuilder::new();
    buf.write_str("GROUP BY ");
    buf.write_strings(columns, ", ");
    Ok(buf.into_string())
}

/// `ORDER BY col DIR`。列不在白名单内时整个子句省略。
pub fn build_order_by(wl: &Whitelist, order: Option<&OrderBy>) -> String {
    let Some(order) = order else {
        return String::new();
    };
    if !wl.is_column_allowed(&order.column) {
        tracing::debug!(
            target: "halo_safe_query::whitelist",
            column = %order.column,
            "order column not allowed, ORDER BY omitted"
        );
        return String::new();
    }
    format!("ORDER BY {} {}", order.column, order.direction)
}

/// SELECT 列清单；空清单渲染为 `*`。
pub fn build_columns(wl: &Whitelist, columns: &[String]) -> BuildResult<String> {
    if columns.is_empty() {
        return Ok("*".to_string());
    }
    for c in columns {
        wl.assert_select_column_allowed(c)?;
    }
    Ok(columns.join(", "))
}

fn write_predicate(wl: &Whitelist, filters: &Filters, out: &mut Fragment) -> BuildResult<()> {
    for criterion in filters.criteria() {
        match criterion {
            Criterion::Filter(f) => {
                wl.assert_column_allowed(&f.column)?;
                if let Some((expr, args)) = render_filter(f)? {
                    let conj = if f.operator == Operator::OrLike { "OR" } else { "AND" };
                    out.push(&format!("{conj} {expr}"), args);
                }
            }
            Criterion::AnyOf(group) => {
                let mut exprs = Vec::with_capacity(group.len());
                let mut args = Vec::new();
                // 搜索组允许别名条目的左侧表达式，但不允许聚合
                for f in group {
                    wl.assert_search_column_allowed(&f.column)?;
                    if let Some((expr, a)) = render_filter(f)? {
                        exprs.push(expr);
                        args.extend(a);
                    }
                }
                if exprs.is_empty() {
                    continue;
                }
                let mut buf = StringBuilder::new();
                buf.write_str("AND (");
                buf.write_strings(&exprs, " OR ");
                buf.write_str(")");
                out.push(buf.as_str(), args);
            }
        }
    }
    Ok(())
}

/// 渲染单个条件（不带 AND/OR 连接词）。值缺省时返回 `None`，不占参数位。
fn render_filter(f: &Filter) -> BuildResult<Option<(String, Vec<SqlValue>)>> {
    let key = f.column.as_str();

    let rendered = match (f.operator, &f.value) {
        (op, v) if !op.takes_list() && v.is_blank() => None,
        (Operator::Like | Operator::OrLike, FilterValue::Single(v)) => {
            Some((format!("{key} LIKE ?"), vec![v.like_pattern()]))
        }
        (
            op @ (Operator::Equal
            | Operator::GreaterEqualThan
            | Operator::LessEqualThan
            | Operator::GreaterThan
            | Operator::LessThan),
            FilterValue::Single(v),
        ) => Some((format!("{key} {op} ?"), vec![v.clone()])),
        (Operator::In, FilterValue::List(vs)) if vs.is_empty() => None,
        (Operator::In, FilterValue::List(vs)) => {
            Some((format!("{key} IN ({})", placeholders(vs.len())), vs.clone()))
        }
        (Operator::Between, FilterValue::List(vs)) => match vs.as_slice() {
            [min, max] => Some((
                format!("{key} BETWEEN ? AND ?"),
                vec![min.clone(), max.clone()],
            )),
            other => return Err(BuildError::InvalidBetweenRange(other.len())),
        },
        (Operator::Between, FilterValue::Single(_)) => {
            return Err(BuildError::InvalidBetweenRange(1));
        }
        (Operator::Between, FilterValue::Absent) => {
            return Err(BuildError::InvalidBetweenRange(0));
        }
        (op, _) => {
            return Err(BuildError::InvalidFilterValue {
                column: f.column.clone(),
                operator: op.to_string(),
            });
        }
    };
    Ok(rendered)
}
