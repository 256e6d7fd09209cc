//! End-to-end tests driving the crate through its public API only, the way
//! an embedding application would: build a `Select` with `SelectBuilder`,
//! call `split`, inspect the rendered SQL.

use pretty_assertions::assert_eq;
use sql_splitter::{
    factories, AggKind, BinaryOpKind, NullsOrder, SelectBuilder, SortDirection, SortSpec, Table,
};

mod common;
use common::init_test_env;

#[test]
fn mixed_aggregate_and_pass_through_with_group_by() {
    init_test_env();
    let (b, _region) = SelectBuilder::from(Table::bare("orders")).project(factories::column("region"));
    let (b, _count) = b.project(factories::count_star());
    let (b, _min) = b.project(factories::aggregate(
        AggKind::Min,
        false,
        Some(factories::column("price")),
    ));
    let (b, _max) = b.project(factories::aggregate(
        AggKind::Max,
        false,
        Some(factories::column("price")),
    ));
    let select = b.group_by(vec![0]).build();

    let artifact = sql_splitter::split(&select, Vec::<()>::new()).unwrap();

    let map_sql = &artifact.map_entry().map_sql;
    assert!(map_sql.contains("region AS region"));
    assert!(map_sql.contains("COUNT(*) AS __C1"));
    assert!(map_sql.contains("MIN(price) AS __C2"));
    assert!(map_sql.contains("MAX(price) AS __C3"));
    assert!(map_sql.contains("GROUP BY region"));
    assert!(!map_sql.to_uppercase().contains("ORDER BY"));

    assert!(artifact.reduce_sql.contains("SUM(__C1)"));
    assert!(artifact.reduce_sql.contains("MIN(__C2)"));
    assert!(artifact.reduce_sql.contains("MAX(__C3)"));
    assert!(artifact.reduce_sql.contains("GROUP BY region"));
}

#[test]
fn avg_with_user_alias_is_preserved_through_the_split() {
    init_test_env();
    let (b, _avg) = SelectBuilder::from(Table::bare("orders"))
        .project(factories::alias(
            "avg_price",
            factories::aggregate(AggKind::Avg, false, Some(factories::column("price"))),
        ));
    let select = b.build();

    let artifact = sql_splitter::split(&select, Vec::<()>::new()).unwrap();
    assert!(artifact.reduce_sql.contains("AS avg_price"));
    assert!(!artifact.map_entry().map_sql.to_uppercase().contains("AVG(PRICE)"));
}

#[test]
fn having_without_matching_projection_appends_synthetic_slot() {
    init_test_env();
    let (b, _region) = SelectBuilder::from(Table::bare("orders")).project(factories::column("region"));
    let having_operand = factories::aggregate(AggKind::Count, false, Some(factories::column("id")));
    let select = b
        .group_by(vec![0])
        .having(
            factories::binary_op(BinaryOpKind::Gt, having_operand.clone(), factories::number("3")),
            having_operand,
        )
        .build();

    assert_eq!(select.select_size(), 1);
    assert_eq!(select.extra.len(), 1);

    let artifact = sql_splitter::split(&select, Vec::<()>::new()).unwrap();
    // The HAVING aggregate still ends up as a map-side column even though
    // it is never a user-visible reduce projection.
    assert!(artifact.map_entry().map_sql.contains("COUNT(id)"));
    assert!(artifact.reduce_sql.contains("WHERE CAST(SUM("));
    assert!(artifact.reduce_sql.contains(") AS BIGINT) > 3"));
    // The synthetic helper column never leaks into the reduce projection list.
    assert!(artifact.reduce_sql.starts_with("SELECT region FROM __T0"));
}

#[test]
fn order_by_direction_and_nulls_survive_the_split() {
    init_test_env();
    let (b, region) = SelectBuilder::from(Table::bare("orders")).project(factories::column("region"));
    let select = b
        .order_by(
            region,
            SortSpec {
                direction: SortDirection::Desc,
                nulls: NullsOrder::Last,
            },
        )
        .build();

    let artifact = sql_splitter::split(&select, Vec::<()>::new()).unwrap();
    assert!(artifact.reduce_sql.contains("ORDER BY region DESC NULLS LAST"));
}

#[test]
fn params_pass_through_untouched() {
    init_test_env();
    let (b, _id) = SelectBuilder::from(Table::bare("orders")).project(factories::column("id"));
    let select = b.build();

    let artifact = sql_splitter::split(&select, vec!["bound-value".to_string()]).unwrap();
    assert_eq!(artifact.map_entry().params, vec!["bound-value".to_string()]);
}
