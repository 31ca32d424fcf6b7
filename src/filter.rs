//! 过滤条件模型：WHERE 与 HAVING 共用的 `{column, operator, value}` 表示。
//!
//! 调用方可以用三种方式得到同一种 [`Filters`]：
//! - 链式构造：`Filters::new().equal("status", 1).like("name", "ann")`
//! - 条件记录列表：[`Filters::from_list`]
//! - 以列名为键的映射：[`Filters::from_map`]

use crate::error::{BuildError, BuildResult};
use crate::value::SqlValue;
use std::fmt;
use std::str::FromStr;

/// 条件运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    Like,
    /// 与前面的条件用 `OR` 连接，而不是 `AND`。
    OrLike,
    GreaterEqualThan,
    LessEqualThan,
    GreaterThan,
    LessThan,
    In,
    Between,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::Like => "LIKE",
            Self::OrLike => "OR LIKE",
            Self::GreaterEqualThan => ">=",
            Self::LessEqualThan => "<=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::In => "IN",
            Self::Between => "BETWEEN",
        }
    }

    /// IN/BETWEEN 接收列表值，其余运算符接收单值。
    pub fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::Between)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = BuildError;

    /// 关键字大小写不敏感，多余空白会被折叠（`"or  like"` 等价于 `"OR LIKE"`）。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        match normalized.as_str() {
            "=" => Ok(Self::Equal),
            "LIKE" => Ok(Self::Like),
            "OR LIKE" => Ok(Self::OrLike),
            ">=" => Ok(Self::GreaterEqualThan),
            "<=" => Ok(Self::LessEqualThan),
            ">" => Ok(Self::GreaterThan),
            "<" => Ok(Self::LessThan),
            "IN" => Ok(Self::In),
            "BETWEEN" => Ok(Self::Between),
            _ => Err(BuildError::UnsupportedOperator(s.to_string())),
        }
    }
}

/// 条件值：未提供、单值或列表值。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterValue {
    #[default]
    Absent,
    Single(SqlValue),
    List(Vec<SqlValue>),
}

impl FilterValue {
    pub fn list<T: Into<SqlValue>>(values: impl IntoIterator<Item = T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    pub fn range(min: impl Into<SqlValue>, max: impl Into<SqlValue>) -> Self {
        Self::List(vec![min.into(), max.into()])
    }

    /// 单值语义下的“没有值”：未提供、`NULL` 或空字符串。
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Single(v) => v.is_blank(),
            Self::List(_) => false,
        }
    }
}

impl<T: Into<SqlValue>> From<T> for FilterValue {
    fn from(v: T) -> Self {
        Self::Single(v.into())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Self::Single(v.into()),
            None => Self::Absent,
        }
    }
}

impl<T: Into<SqlValue>, const N: usize> From<[T; N]> for FilterValue {
    fn from(v: [T; N]) -> Self {
        Self::list(v)
    }
}

/// 单个过滤条件。
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub operator: Operator,
    pub value: FilterValue,
}

impl Filter {
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<FilterValue>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// 从运算符文本构造，未知运算符返回 [`BuildError::UnsupportedOperator`]。
    pub fn parse(
        column: impl Into<String>,
        operator: &str,
        value: impl Into<FilterValue>,
    ) -> BuildResult<Self> {
        Ok(Self::new(column, operator.parse()?, value))
    }
}

/// WHERE/HAVING 中的一项：单个条件，或一组用 `OR` 连接、整体加括号的条件。
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Filter(Filter),
    AnyOf(Vec<Filter>),
}

/// 有序的条件列表。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filters {
    criteria: Vec<Criterion>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// 条件记录列表。
    pub fn from_list(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self {
            criteria: filters.into_iter().map(Criterion::Filter).collect(),
        }
    }

    /// 以列名为键的映射，值为 `(运算符, 值)`；顺序即迭代顺序。
    pub fn from_map<K, V>(map: impl IntoIterator<Item = (K, (Operator, V))>) -> Self
    where
        K: Into<String>,
        V: Into<FilterValue>,
    {
        Self::from_list(
            map.into_iter()
                .map(|(column, (op, value))| Filter::new(column, op, value)),
        )
    }

    /// 以列名为键、纯相等比较的映射。
    pub fn from_equalities<K, V>(map: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<FilterValue>,
    {
        Self::from_list(
            map.into_iter()
                .map(|(column, value)| Filter::new(column, Operator::Equal, value)),
        )
    }

    pub fn push(&mut self, filter: Filter) {
        self.criteria.push(Criterion::Filter(filter));
    }

    pub fn add(mut self, filter: Filter) -> Self {
        self.push(filter);
        self
    }

    /// 追加一个 OR 组：`(a LIKE ? OR b LIKE ?)`。
    pub fn any_of(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        let group: Vec<Filter> = filters.into_iter().collect();
        if !group.is_empty() {
            self.criteria.push(Criterion::AnyOf(group));
        }
        self
    }

    pub fn extend(mut self, other: Filters) -> Self {
        self.criteria.extend(other.criteria);
        self
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    fn chain(self, column: impl Into<String>, op: Operator, value: impl Into<FilterValue>) -> Self {
        self.add(Filter::new(column, op, value))
    }

    pub fn equal(self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.chain(column, Operator::Equal, value)
    }

    pub fn like(self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.chain(column, Operator::Like, value)
    }

    pub fn or_like(self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.chain(column, Operator::OrLike, value)
    }

    pub fn greater_than(self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.chain(column, Operator::GreaterThan, value)
    }

    pub fn less_than(self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.chain(column, Operator::LessThan, value)
    }

    pub fn greater_equal_than(
        self,
        column: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.chain(column, Operator::GreaterEqualThan, value)
    }

    pub fn less_equal_than(
        self,
        column: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.chain(column, Operator::LessEqualThan, value)
    }

    pub fn in_(self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.chain(column, Operator::In, value)
    }

    pub fn between(
        self,
        column: impl Into<String>,
        min: impl Into<SqlValue>,
        max: impl Into<SqlValue>,
    ) -> Self {
        self.chain(column, Operator::Between, FilterValue::range(min, max))
    }
}

impl FromIterator<Filter> for Filters {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self::from_list(iter)
    }
}
