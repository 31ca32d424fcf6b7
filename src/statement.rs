//! Statement：最终产出的 SQL 文本与按顺序排列的绑定参数。

use crate::string_builder::StringBuilder;
use crate::value::SqlValue;
use std::fmt;

/// 一条可直接交给 prepared statement 执行的语句。
///
/// `sql` 中 `?` 的个数与顺序始终与 `args` 一致。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, args: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    /// SQL 文本里 `?` 的个数。
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.args)
    }

    pub(crate) fn traced(self) -> Self {
        tracing::trace!(
            target: "halo_safe_query::sql",
            sql = %self.sql,
            param_count = self.args.len(),
            "statement built"
        );
        self
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// 子句片段：文本与参数总是一起追加，保证占位符对齐。
#[derive(Debug, Default, Clone)]
pub(crate) struct Fragment {
    buf: StringBuilder,
    args: Vec<SqlValue>,
}

impl Fragment {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 以空格分隔追加一段文本及其参数。
    pub(crate) fn push(&mut self, sql: &str, args: impl IntoIterator<Item = SqlValue>) {
        self.buf.write_leading(sql);
        self.args.extend(args);
    }

    pub(crate) fn push_sql(&mut self, sql: &str) {
        self.buf.write_leading(sql);
    }

    /// 追加一个已构造好的子句。
    pub(crate) fn append(&mut self, clause: &Statement) {
        self.buf.write_leading(&clause.sql);
        self.args.extend(clause.args.iter().cloned());
    }

    /// 子句片段本身不是完整语句，不记日志。
    pub(crate) fn into_clause(self) -> Statement {
        Statement::new(self.buf.into_string(), self.args)
    }

    pub(crate) fn into_statement(self) -> Statement {
        Statement::new(self.buf.into_string(), self.args).traced()
    }
}

#[cfg(test)]
mod tests {
    use super::{Fragment, Statement};
    use crate::value::SqlValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn fragments_keep_text_and_args_aligned() {
        let mut head = Fragment::new();
        head.push_sql("SELECT * FROM t WHERE 1=1");
        let mut tail = Fragment::new();
        tail.push("AND a = ?", [SqlValue::from(1_i64)]);
        tail.push("AND b = ?", [SqlValue::from("x")]);
        head.append(&tail.into_clause());

        let stmt = head.into_statement();
        assert_eq!(stmt.sql, "SELECT * FROM t WHERE 1=1 AND a = ? AND b = ?");
        assert_eq!(stmt.args, vec![SqlValue::from(1_i64), SqlValue::from("x")]);
        assert_eq!(stmt.placeholder_count(), 2);
    }

    #[test]
    fn display_is_sql_text() {
        let stmt = Statement::new("DELETE FROM t WHERE 1=1 AND id = ?", vec![5_i64.into()]);
        assert_eq!(stmt.to_string(), "DELETE FROM t WHERE 1=1 AND id = ?");
    }
}
