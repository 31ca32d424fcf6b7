//! DELETE：必须带 WHERE 条件。

use crate::error::{BuildError, BuildResult};
use crate::row::Record;
use crate::statement::{Fragment, Statement};
use crate::update::equality_where;
use crate::whitelist::Whitelist;

/// `DELETE FROM t WHERE 1=1 AND id = ?`。`where_` 为空时拒绝构造，避免误删整表。
pub fn build_delete(wl: &Whitelist, table: &str, where_: &Record) -> BuildResult<Statement> {
    wl.assert_table_allowed(table)?;
    if where_.is_empty() {
        return Err(BuildError::MissingWhereClause);
    }
    let (where_sql, args) = equality_where(wl, where_)?;

    let mut out = Fragment::new();
    out.push_sql(&format!("DELETE FROM {table}"));
    out.push(&where_sql, args);
    Ok(out.into_statement())
}
