//! 宏集合：少写一点样板代码。

/// 按书写顺序构造 [`Record`](crate::Record)。
///
/// ```
/// use halo_safe_query::record;
///
/// let row = record! { "name" => "ann", "age" => 30_i64 };
/// assert_eq!(row.keys().collect::<Vec<_>>(), ["name", "age"]);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut r = $crate::Record::new();
        $(
            r.insert($column, $value);
        )+
        r
    }};
}
