#[cfg(test)]
mod tests {
    use crate::clause::{JoinKind, JoinSpec, SortDirection};
    use crate::error::BuildError;
    use crate::filter::{Filter, Filters, Operator};
    use crate::select::{SelectQuery, build_select};
    use crate::statement::Statement;
    use crate::value::SqlValue;
    use crate::whitelist::Whitelist;
    use pretty_assertions::assert_eq;

    fn wl() -> Whitelist {
        Whitelist::new(
            ["orders", "customers"],
            [
                "orders.id",
                "orders.status",
                "orders.total",
                "orders.customer_id",
                "customers.name",
                "customers.name AS customer_name",
                "COUNT(orders.id)",
            ],
        )
    }

    fn assert_aligned(stmt: &Statement) {
        assert_eq!(stmt.placeholder_count(), stmt.args.len(), "{}", stmt.sql);
    }

    #[test]
    fn select_defaults() {
        let stmts = SelectQuery::new("orders").build(&wl()).unwrap();
        assert_eq!(
            stmts.data.sql,
            "SELECT * FROM orders WHERE 1=1 LIMIT ? OFFSET ?"
        );
        assert_eq!(stmts.data.args, vec![SqlValue::U64(10), SqlValue::U64(0)]);
        assert_eq!(stmts.count.sql, "SELECT COUNT(1) AS total FROM orders WHERE 1=1");
        assert!(stmts.count.args.is_empty());
    }

    #[test]
    fn select_full_without_grouping() {
        let q = SelectQuery::new("orders")
            .columns(["orders.id", "customers.name AS customer_name"])
            .join(JoinSpec::new("customers", "customers.id = orders.customer_id"))
            .filters(
                Filters::new()
                    .equal("orders.status", "paid")
                    .in_("orders.id", [1_i64, 2, 3]),
            )
            .order_by("orders.id", SortDirection::Desc)
            .limit(25)
            .offset(50);
        let stmts = build_select(&wl(), &q).unwrap();

        assert_eq!(
            stmts.data.sql,
            "SELECT orders.id, customers.name AS customer_name FROM orders \
             LEFT JOIN customers ON customers.id = orders.customer_id \
             WHERE 1=1 AND orders.status = ? AND orders.id IN (?, ?, ?) \
             ORDER BY orders.id DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            stmts.data.args,
            vec![
                SqlValue::from("paid"),
                SqlValue::I64(1),
                SqlValue::I64(2),
                SqlValue::I64(3),
                SqlValue::U64(25),
                SqlValue::U64(50),
            ]
        );
        assert_eq!(
            stmts.count.sql,
            "SELECT COUNT(1) AS total FROM orders \
             LEFT JOIN customers ON customers.id = orders.customer_id \
             WHERE 1=1 AND orders.status = ? AND orders.id IN (?, ?, ?)"
        );
        assert_eq!(stmts.count.args, stmts.data.args[..4].to_vec());
        assert_aligned(&stmts.data);
        assert_aligned(&stmts.count);
    }

    #[test]
    fn grouped_count_wraps_subquery() {
        let q = SelectQuery::new("orders")
            .columns(["orders.customer_id", "COUNT(orders.id)"])
            .filters(Filters::new().equal("orders.status", "paid"))
            .group_by(["orders.customer_id"])
            .having(Filters::new().greater_equal_than("COUNT(orders.id)", 2_i64))
            .order_by_desc("COUNT(orders.id)");
        let stmts = q.build(&wl()).unwrap();

        assert_eq!(
            stmts.data.sql,
            "SELECT orders.customer_id, COUNT(orders.id) FROM orders \
             WHERE 1=1 AND orders.status = ? GROUP BY orders.customer_id \
             HAVING 1=1 AND COUNT(orders.id) >= ? ORDER BY COUNT(orders.id) DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            stmts.count.sql,
            "SELECT COUNT(*) AS total FROM (SELECT 1 FROM orders \
             WHERE 1=1 AND orders.status = ? GROUP BY orders.customer_id \
             HAVING 1=1 AND COUNT(orders.id) >= ?) AS sub"
        );
        assert_eq!(
            stmts.count.args,
            vec![SqlValue::from("paid"), SqlValue::I64(2)]
        );
        assert_aligned(&stmts.data);
        assert_aligned(&stmts.count);
    }

    #[test]
    fn group_by_alone_also_wraps() {
        let stmts = SelectQuery::new("orders")
            .group_by(["orders.status"])
            .build(&wl())
            .unwrap();
        assert_eq!(
            stmts.count.sql,
            "SELECT COUNT(*) AS total FROM (SELECT 1 FROM orders WHERE 1=1 GROUP BY orders.status) AS sub"
        );
    }

    #[test]
    fn disallowed_table_produces_nothing() {
        assert_eq!(
            SelectQuery::new("users").build(&wl()),
            Err(BuildError::DisallowedTable("users".into()))
        );
        let q = SelectQuery::new("orders")
            .join(JoinSpec::new("users", "users.id = orders.user_id").kind(JoinKind::Inner));
        assert_eq!(
            q.build(&wl()),
            Err(BuildError::DisallowedTable("users".into()))
        );
    }

    #[test]
    fn disallowed_order_column_is_omitted() {
        let stmts = SelectQuery::new("orders")
            .order_by_asc("orders.secret")
            .build(&wl())
            .unwrap();
        assert_eq!(stmts.data.sql, "SELECT * FROM orders WHERE 1=1 LIMIT ? OFFSET ?");
        assert_eq!(stmts.data.args, vec![SqlValue::U64(10), SqlValue::U64(0)]);
    }

    #[test]
    fn map_and_list_filters_build_same_statements() {
        let by_map = SelectQuery::new("orders")
            .filters(Filters::from_map([
                ("orders.status", (Operator::Equal, "paid")),
                ("customers.name", (Operator::Like, "ann")),
            ]))
            .build(&wl())
            .unwrap();
        let by_list = SelectQuery::new("orders")
            .filters(Filters::from_list([
                Filter::new("orders.status", Operator::Equal, "paid"),
                Filter::new("customers.name", Operator::Like, "ann"),
            ]))
            .build(&wl())
            .unwrap();
        assert_eq!(by_map, by_list);
    }

    #[test]
    fn page_computes_offset() {
        let q = SelectQuery::new("orders").page(3, 20);
        assert_eq!((q.limit, q.offset), (20, 40));
        let q = SelectQuery::new("orders").page(0, 20);
        assert_eq!((q.limit, q.offset), (20, 0));
    }

    #[test]
    fn building_twice_is_identical() {
        let q = SelectQuery::new("orders")
            .columns(["orders.id"])
            .filters(Filters::new().like("customers.name", "x"))
            .group_by(["orders.id"]);
        assert_eq!(q.build(&wl()).unwrap(), q.build(&wl()).unwrap());
    }
}
