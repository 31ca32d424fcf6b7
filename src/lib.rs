//! halo-safe-query：基于白名单的参数化 SQL 语句构造库。
//!
//! 所有表名、列名都必须出现在调用方提供的 [`Whitelist`] 中，值一律通过 `?`
//! 占位符绑定。构造函数都是无状态的纯函数，同样的输入总是得到同样的输出。

pub mod clause;
pub mod datatable;
pub mod delete;
pub mod error;
pub mod filter;
pub mod insert;
pub mod macros;
pub mod row;
pub mod select;
#[cfg(test)]
mod select_tests;
pub mod statement;
mod string_builder;
pub mod update;
pub mod value;
pub mod whitelist;

pub use crate::clause::{
    JoinKind, JoinOn, JoinSpec, OrderBy, SortDirection, build_columns, build_group_by,
    build_having, build_joins, build_order_by, build_where,
};
pub use crate::datatable::{
    DataTable, DataTableError, DataTablePlan, DataTableRequest, DataTableResponse, Row,
    RowSource,
};
pub use crate::delete::build_delete;
pub use crate::error::{BuildError, BuildResult};
pub use crate::filter::{Criterion, Filter, FilterValue, Filters, Operator};
pub use crate::insert::{build_insert, build_insert_many};
pub use crate::row::Record;
pub use crate::select::{DEFAULT_LIMIT, SelectQuery, SelectStatements, build_select};
pub use crate::statement::Statement;
pub use crate::update::build_update;
pub use crate::value::SqlValue;
pub use crate::whitelist::Whitelist;
