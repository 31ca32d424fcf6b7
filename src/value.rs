//! SQL 参数值类型。

use std::borrow::Cow;
use time::format_description::well_known::Rfc3339;

/// 绑定到 `?` 占位符上的参数值。
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(Cow<'static, str>),
    Bytes(Vec<u8>),
    DateTime(time::OffsetDateTime),
}

impl SqlValue {
    /// 将 `Option<T>` 映射为 `SqlValue`：`None => Null`，`Some(v) => v.into()`。
    pub fn from_option<T: Into<SqlValue>>(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }

    /// “未提供值”：`Null` 或空字符串。过滤条件遇到这种值会被整体跳过。
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 值的文本形式，用于拼 LIKE 模式；`Null`/`Bytes` 没有文本形式。
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null | Self::Bytes(_) => None,
            Self::Bool(v) => Some(v.to_string()),
            Self::I64(v) => Some(v.to_string()),
            Self::U64(v) => Some(v.to_string()),
            Self::F64(v) => Some(v.to_string()),
            Self::String(s) => Some(s.to_string()),
            Self::DateTime(dt) => dt.format(&Rfc3339).ok(),
        }
    }

    /// `%value%`：LIKE 两侧自动加通配符。
    pub fn like_pattern(&self) -> SqlValue {
        let text = self.to_text().unwrap_or_default();
        SqlValue::String(Cow::Owned(format!("%{text}%")))
    }
}

impl From<()> for SqlValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i8> for SqlValue {
    fn from(v: i8) -> Self {
        Self::I64(v as i64)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        Self::I64(v as i64)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::I64(v as i64)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u8> for SqlValue {
    fn from(v: u8) -> Self {
        Self::U64(v as u64)
    }
}

impl From<u16> for SqlValue {
    fn from(v: u16) -> Self {
        Self::U64(v as u64)
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        Self::U64(v as u64)
    }
}

impl From<u64> for SqlValue {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        Self::F64(v as f64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::String(Cow::Owned(v))
    }
}

impl From<&'static str> for SqlValue {
    fn from(v: &'static str) -> Self {
        Self::String(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<time::OffsetDateTime> for SqlValue {
    fn from(v: time::OffsetDateTime) -> Self {
        Self::DateTime(v)
    }
}

#[cfg(test)]
mod tests {
    use super::SqlValue;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    #[test]
    fn from_option_some() {
        assert_eq!(SqlValue::from_option(Some(123_i64)), SqlValue::I64(123));
    }

    #[test]
    fn from_option_none() {
        assert_eq!(SqlValue::from_option::<i64>(None), SqlValue::Null);
    }

    #[test]
    fn blank_values() {
        assert!(SqlValue::Null.is_blank());
        assert!(SqlValue::from("").is_blank());
        assert!(!SqlValue::from(0_i64).is_blank());
        assert!(!SqlValue::from(false).is_blank());
    }

    #[test]
    fn like_pattern_wraps_text() {
        assert_eq!(SqlValue::from("ann").like_pattern(), SqlValue::from("%ann%"));
        assert_eq!(SqlValue::from(42_i64).like_pattern(), SqlValue::from("%42%"));
    }

    #[test]
    fn datetime_text_is_rfc3339() {
        let v = SqlValue::from(datetime!(2025-01-31 08:00 UTC));
        assert_eq!(v.to_text().as_deref(), Some("2025-01-31T08:00:00Z"));
    }
}
