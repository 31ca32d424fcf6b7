//! 构造语句时的错误类型：全部是调用方输入校验失败，不可重试。

/// 语句构造错误。
///
/// 任何一种错误都会在发现点立即返回，不会产出部分 SQL。
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("builder table `{0}` is not in the allowed tables")]
    DisallowedTable(String),
    #[error("builder column `{0}` is not in the allowed columns")]
    DisallowedColumn(String),
    #[error("builder no insertable columns left after whitelist filtering")]
    NoInsertableColumns,
    #[error("builder no fields to update")]
    NoUpdatableFields,
    #[error("builder BETWEEN expects exactly 2 values, got {0}")]
    InvalidBetweenRange(usize),
    #[error("builder unsupported operator `{0}`")]
    UnsupportedOperator(String),
    #[error("builder refusing to build DELETE without WHERE conditions")]
    MissingWhereClause,
    #[error("builder row {row} has a different column set than the first row")]
    InconsistentRowSchema { row: usize },
    #[error("builder unsupported sort direction `{0}`")]
    UnsupportedSortDirection(String),
    #[error("builder value shape does not fit operator {operator} on column `{column}`")]
    InvalidFilterValue { column: String, operator: String },
}

pub type BuildResult<T> = Result<T, BuildError>;
