//! Record：按插入顺序保存的 `列名 -> 值` 映射，用于 INSERT 行、UPDATE 的
//! SET 与 WHERE、DELETE 的 WHERE。

use crate::value::SqlValue;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, SqlValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一列；列已存在时原位替换值，顺序不变。
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, v)) => *v = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut r = Self::new();
        for (k, v) in iter {
            r.insert(k, v);
        }
        r
    }
}
