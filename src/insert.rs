//! INSERT：单行与批量插入，可选 `ON DUPLICATE KEY UPDATE`。

use crate::error::{BuildError, BuildResult};
use crate::row::Record;
use crate::statement::{Fragment, Statement};
use crate::string_builder::{StringBuilder, placeholders};
use crate::whitelist::Whitelist;

/// 单行 INSERT。
///
/// 不在白名单内的列会被静默丢弃；列、占位符、参数都按 `data` 的顺序排列。
/// `on_duplicate` 里的列只有同时在白名单内且是本次插入的列时才会生效，
/// 一个都不剩就不输出 `ON DUPLICATE KEY UPDATE`。
pub fn build_insert(
    wl: &Whitelist,
    table: &str,
    data: &Record,
    on_duplicate: &[&str],
) -> BuildResult<Statement> {
    build_insert_many(wl, table, std::slice::from_ref(data), on_duplicate)
}

/// 批量 INSERT：`VALUES (?, ?), (?, ?)`。
///
/// 列顺序取自第一行（经白名单过滤）。其余每行过滤后的列集合必须与之相同，
/// 顺序可以不同，但值总是按第一行的列顺序输出。
pub fn build_insert_many(
    wl: &Whitelist,
    table: &str,
    rows: &[Record],
    on_duplicate: &[&str],
) -> BuildResult<Statement> {
    wl.assert_table_allowed(table)?;
    let Some(first) = rows.first() else {
        return Err(BuildError::NoInsertableColumns);
    };

    let cols = insertable_columns(wl, first);
    if cols.is_empty() {
        return Err(BuildError::NoInsertableColumns);
    }

    let mut args = Vec::with_capacity(cols.len() * rows.len());
    let mut groups = Vec::with_capacity(rows.len());
    let group = format!("({})", placeholders(cols.len()));
    for (i, row) in rows.iter().enumerate() {
        let row_cols = insertable_columns(wl, row);
        if row_cols.len() != cols.len() || !row_cols.iter().all(|c| cols.contains(c)) {
            return Err(BuildError::InconsistentRowSchema { row: i });
        }
        for c in &cols {
            // 上面已确认 `c` 在本行中存在
            if let Some(v) = row.get(c) {
                args.push(v.clone());
            }
        }
        groups.push(group.as_str());
    }

    let mut buf = StringBuilder::new();
    buf.write_str("INSERT INTO ");
    buf.write_str(table);
    buf.write_str(" (");
    buf.write_strings(&cols, ", ");
    buf.write_str(") VALUES ");
    buf.write_strings(&groups, ", ");

    let updates: Vec<String> = on_duplicate
        .iter()
        .filter(|c| wl.is_column_allowed(c) && cols.contains(*c))
        .map(|c| format!("{c} = VALUES({c})"))
        .collect();
    if !updates.is_empty() {
        buf.write_str(" ON DUPLICATE KEY UPDATE ");
        buf.write_strings(&updates, ", ");
    }

    let mut out = Fragment::new();
    out.push(buf.as_str(), args);
    Ok(out.into_statement())
}

fn insertable_columns<'a>(wl: &Whitelist, row: &'a Record) -> Vec<&'a str> {
    row.keys().filter(|k| wl.is_column_allowed(k)).collect()
}
