//! Builders produce engine-agnostic operations with values kept out of the
//! statement text.

use oxide_sql_core::operation::{Direction, JoinKind, SelectItem, TableRef};
use oxide_sql_core::schema::{
    CreateTableBuilder, DefaultValue, ForeignKeyAction, SchemaOperation, TableConstraint, bigint,
    boolean, integer, varchar,
};
use oxide_sql_core::{Delete, Expr, Insert, Operation, RoutineCall, Select, SqlValue, Update, col};

#[test]
fn test_select_collects_params_from_joins_where_and_having() {
    let q = Select::new()
        .columns(&["u.country", "COUNT(*) AS n"])
        .from("users u")
        .join("orders o", col("o.user_id").eq_col("u.id").and(col("o.paid").eq(true)))
        .where_clause(col("u.age").gt(17))
        .group_by(&["u.country"])
        .having(Expr::raw_with_params("COUNT(*) > ?", vec![SqlValue::Int(5)]))
        .order_by_desc(&["u.country"])
        .build();

    assert_eq!(
        q.params(),
        vec![&SqlValue::Bool(true), &SqlValue::Int(17), &SqlValue::Int(5)]
    );
    assert_eq!(q.from, TableRef::parse("users AS u"));
    assert_eq!(q.joins[0].kind, JoinKind::Inner);
    assert_eq!(q.columns[1], SelectItem::Raw(String::from("COUNT(*) AS n")));
    assert_eq!(q.order_by[0].direction, Direction::Desc);
    assert_eq!(q.limit, None);
}

#[test]
fn test_hostile_input_stays_a_parameter() {
    let input = "x'; DROP TABLE users; --";
    let q = Update::new()
        .table("users")
        .set("name", input)
        .where_clause(col("id").eq(1))
        .build();
    assert_eq!(q.assignments[0], (String::from("name"), SqlValue::Text(input.into())));
}

#[test]
fn test_writes_convert_into_operations() {
    let insert: Operation = Insert::new()
        .into_table("users")
        .columns(&["name"])
        .values(vec!["a"])
        .and_values(vec!["b"])
        .build()
        .into();
    assert!(!insert.has_returning());

    let delete: Operation = Delete::new()
        .from("users")
        .where_clause(col("id").in_list(vec![1, 2, 3]))
        .returning(&["id"])
        .build()
        .into();
    assert!(delete.has_returning());

    let Operation::Insert(q) = insert else {
        panic!("expected an insert");
    };
    assert_eq!(q.rows.len(), 2);
}

#[test]
fn test_routine_calls_keep_argument_order() {
    let call = RoutineCall::new("ADD_USER").arg("alice").arg(30).arg(None::<i64>);
    assert_eq!(
        call.args,
        vec![
            SqlValue::Text(String::from("alice")),
            SqlValue::Int(30),
            SqlValue::Null
        ]
    );
    assert!(matches!(call.clone().procedure(), Operation::Procedure(_)));
    assert!(matches!(call.clone().selectable(), Operation::SelectProcedure(_)));
    assert!(matches!(call.function(), Operation::Function(_)));
}

#[test]
fn test_create_table_collects_columns_and_constraints() {
    let op: SchemaOperation = CreateTableBuilder::new()
        .name("order_lines")
        .column(bigint("order_id").not_null().build())
        .column(integer("line").not_null().build())
        .column(
            bigint("product_id")
                .references("products", "id")
                .on_delete(ForeignKeyAction::Cascade)
                .build(),
        )
        .column(boolean("gift").default_value(false).build())
        .column(varchar("note", 200).collation("UNICODE_CI").build())
        .primary_key(&["order_id", "line"])
        .check_constraint("line > 0")
        .build()
        .into();

    let SchemaOperation::CreateTable(table) = op else {
        panic!("expected create table");
    };
    assert_eq!(table.columns.len(), 5);
    assert_eq!(
        table.columns[3].default,
        Some(DefaultValue::Value(SqlValue::Bool(false)))
    );
    assert_eq!(
        table.constraints[0],
        TableConstraint::PrimaryKey {
            name: None,
            columns: vec![String::from("order_id"), String::from("line")],
        }
    );
    assert!(matches!(table.constraints[1], TableConstraint::Check { .. }));
}
