//! INSERT/UPDATE/DELETE, RETURNING and routine invocation.

mod common;
use common::*;

use oxide_sql_core::builder::{Delete, Insert, Update, col};
use oxide_sql_core::{Operation, RoutineCall, SqlValue};
use oxide_sql_firebird::{Error, Grammar, VersionTag};

fn text(s: &str) -> SqlValue {
    SqlValue::Text(s.to_string())
}

fn returning_operations() -> Vec<Operation> {
    vec![
        Insert::new()
            .into_table("users")
            .columns(&["name"])
            .values(vec!["alice"])
            .returning(&["id"])
            .build()
            .into(),
        Update::new()
            .table("users")
            .set("name", "bob")
            .where_clause(col("id").eq(1))
            .returning(&["id", "name"])
            .build()
            .into(),
        Delete::new()
            .from("users")
            .where_clause(col("id").eq(1))
            .returning(&["id"])
            .build()
            .into(),
    ]
}

#[test]
fn test_returning_is_rejected_before_v2() {
    let g = grammar(VersionTag::V1);
    for op in returning_operations() {
        assert!(matches!(
            g.compile(&op),
            Err(Error::UnsupportedFeatureForVersion {
                feature: "RETURNING",
                version: VersionTag::V1
            })
        ));
    }
}

#[test]
fn test_returning_is_appended_from_v2() {
    let expected = [
        "INSERT INTO users (name) VALUES (?) RETURNING id",
        "UPDATE users SET name = ? WHERE id = ? RETURNING id, name",
        "DELETE FROM users WHERE id = ? RETURNING id",
    ];
    for version in [VersionTag::V2, VersionTag::V3, VersionTag::V4, VersionTag::V5] {
        let g = grammar(version);
        for (op, sql) in returning_operations().iter().zip(expected) {
            let stmt = g.compile(op).unwrap();
            assert_eq!(stmt.sql(), sql);
            assert_eq!(stmt.placeholder_count(), stmt.params().len());
        }
    }
}

#[test]
fn test_multi_row_insert_uses_union_of_selects() {
    let q = Insert::new()
        .into_table("tags")
        .columns(&["name", "weight"])
        .values(vec![text("rust"), SqlValue::Int(3)])
        .and_values(vec![text("sql"), SqlValue::Int(2)])
        .build();
    let stmt = grammar(VersionTag::V3).compile(&q.into()).unwrap();
    assert_eq!(
        stmt.sql(),
        "INSERT INTO tags (name, weight) SELECT ?, ? FROM RDB$DATABASE \
         UNION ALL SELECT ?, ? FROM RDB$DATABASE"
    );
    assert_eq!(
        stmt.params(),
        &[
            text("rust"),
            SqlValue::Int(3),
            text("sql"),
            SqlValue::Int(2),
        ]
    );
}

#[test]
fn test_multi_row_insert_cannot_return() {
    let q = Insert::new()
        .into_table("tags")
        .columns(&["name"])
        .values(vec!["a"])
        .and_values(vec!["b"])
        .returning(&["id"])
        .build();
    assert!(matches!(
        grammar(VersionTag::V3).compile(&q.into()),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn test_insert_row_width_must_match_columns() {
    let q = Insert::new()
        .into_table("users")
        .columns(&["name", "email"])
        .values(vec!["alice"])
        .build();
    assert!(matches!(
        grammar(VersionTag::V3).compile(&q.into()),
        Err(Error::InvalidOperation(_))
    ));
}

#[test]
fn test_prefix_applies_to_write_targets() {
    let g = Grammar::new(VersionTag::V3, "app_", false);
    let q = Update::new()
        .table("users")
        .set("name", "bob")
        .where_clause(col("id").eq(1))
        .build();
    assert_eq!(sql_of(&g, q), "UPDATE app_users SET name = ? WHERE id = ?");
    let q = Insert::new()
        .into_table("users")
        .columns(&["name"])
        .values(vec!["alice"])
        .build();
    assert_eq!(sql_of(&g, q), "INSERT INTO app_users (name) VALUES (?)");
}

#[test]
fn test_execute_procedure_binds_arguments_in_order() {
    let op = RoutineCall::new("ADD_USER").arg("alice").arg(30).procedure();
    for version in VersionTag::ALL {
        let stmt = grammar(version).compile(&op).unwrap();
        assert_eq!(stmt.sql(), "EXECUTE PROCEDURE ADD_USER(?, ?)");
        assert_eq!(
            stmt.params(),
            &[text("alice"), SqlValue::Int(30)]
        );
    }
}

#[test]
fn test_selectable_procedure_and_function() {
    let g = grammar(VersionTag::V3);
    let stmt = g
        .compile(&RoutineCall::new("ORDERS_FOR").arg(7).selectable())
        .unwrap();
    assert_eq!(stmt.sql(), "SELECT * FROM ORDERS_FOR(?)");

    let stmt = g
        .compile(&RoutineCall::new("TAX").arg(100.0).arg("FR").function())
        .unwrap();
    assert_eq!(stmt.sql(), "SELECT TAX(?, ?) AS VAL FROM RDB$DATABASE");
    assert_eq!(
        stmt.params(),
        &[SqlValue::Float(100.0), text("FR")]
    );
}

#[test]
fn test_delete_without_where() {
    let q = Delete::new().from("sessions").build();
    assert_eq!(sql_of(&grammar(VersionTag::V1), q), "DELETE FROM sessions");
}
