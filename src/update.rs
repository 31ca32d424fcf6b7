//! UPDATE：`UPDATE t SET a = ?, b = ? WHERE 1=1 AND id = ?`。

use crate::error::{BuildError, BuildResult};
use crate::row::Record;
use crate::statement::{Fragment, Statement};
use crate::string_builder::StringBuilder;
use crate::value::SqlValue;
use crate::whitelist::Whitelist;

/// 构造 UPDATE。
///
/// `data` 与 `where_` 中的每个列都必须在白名单内（不会静默丢弃）。
/// `where_` 为空时会更新整表：这是允许的，但会记一条 warn 日志。
pub fn build_update(
    wl: &Whitelist,
    table: &str,
    data: &Record,
    where_: &Record,
) -> BuildResult<Statement> {
    wl.assert_table_allowed(table)?;
    if data.is_empty() {
        return Err(BuildError::NoUpdatableFields);
    }

    let mut sets = Vec::with_capacity(data.len());
    let mut args = Vec::with_capacity(data.len() + where_.len());
    for (col, v) in data.iter() {
        wl.assert_column_allowed(col)?;
        sets.push(format!("{col} = ?"));
        args.push(v.clone());
    }
    let (where_sql, where_args) = equality_where(wl, where_)?;
    if where_.is_empty() {
        tracing::warn!(target: "halo_safe_query::sql", table, "UPDATE without WHERE conditions");
    }

    let mut buf = StringBuilder::new();
    buf.write_str("UPDATE ");
    buf.write_str(table);
    buf.write_str(" SET ");
    buf.write_strings(&sets, ", ");

    let mut out = Fragment::new();
    out.push(buf.as_str(), args);
    out.push(&where_sql, where_args);
    Ok(out.into_statement())
}

/// `WHERE 1=1 AND a = ? AND b = ?`，UPDATE 与 DELETE 共用。
pub(crate) fn equality_where(
    wl: &Whitelist,
    where_: &Record,
) -> BuildResult<(String, Vec<SqlValue>)> {
    let mut buf = StringBuilder::new();
    buf.write_str("WHERE 1=1");
    let mut args = Vec::with_capacity(where_.len());
    for (col, v) in where_.iter() {
        wl.assert_column_allowed(col)?;
        buf.write_str(" AND ");
        buf.write_str(col);
        buf.write_str(" = ?");
        args.push(v.clone());
    }
    Ok((buf.into_string(), args))
}
