//! 字符串拼接工具：语句文本按空格分隔的片段依次写入。

#[derive(Debug, Default, Clone)]
pub(crate) struct StringBuilder {
    buf: String,
}

impl StringBuilder {
    pub(crate) fn new() -> Self {
        Self { buf: String::new() }
    }

    /// 写入 `s`；如果不是首次写入，会先写入一个空格。空片段会被忽略。
    pub(crate) fn write_leading(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        if !self.buf.is_empty() {
            self.buf.push(' ');
        }
        self.buf.push_str(s);
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// 用 `sep` 连接 `items`，跳过空串。
    pub(crate) fn write_strings<S: AsRef<str>>(&mut self, items: &[S], sep: &str) {
        let mut first_added = false;
        for s in items {
            let s = s.as_ref();
            if s.is_empty() {
                continue;
            }
            if first_added {
                self.buf.push_str(sep);
            }
            self.buf.push_str(s);
            first_added = true;
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.buf
    }

    pub(crate) fn into_string(self) -> String {
        self.buf
    }
}

/// `n` 个 `?`，用 `, ` 连接。
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[cfg(test)]
mod tests {
    use super::{StringBuilder, placeholders};
    use pretty_assertions::assert_eq;

    #[test]
    fn write_leading_inserts_single_spaces() {
        let mut buf = StringBuilder::new();
        buf.write_leading("SELECT *");
        buf.write_leading("");
        buf.write_leading("FROM t");
        assert_eq!(buf.into_string(), "SELECT * FROM t");
    }

    #[test]
    fn write_strings_skips_empty() {
        let mut buf = StringBuilder::new();
        buf.write_strings(&["a", "", "b"], ", ");
        assert_eq!(buf.into_string(), "a, b");
    }

    #[test]
    fn placeholder_lists() {
        assert_eq!(placeholders(0), "");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
