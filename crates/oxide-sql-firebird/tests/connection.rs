//! End-to-end behavior of the connection facade over a mock session.

mod common;
use common::*;

use chrono::NaiveDate;
use oxide_sql_core::builder::{Delete, Insert, Select, Update, col};
use oxide_sql_core::SqlValue;
use oxide_sql_core::schema::{CreateTableBuilder, SchemaOperation, bigint, date, varchar};
use oxide_sql_firebird::{Connection, Error, FirebirdConfig, RawResult, Row};

fn text(s: &str) -> SqlValue {
    SqlValue::Text(s.to_string())
}

#[tokio::test]
async fn test_select_returns_rows_with_case_insensitive_columns() {
    let mut session = MockSession::new();
    session.push_rows(vec![
        Row::from_pairs([("ID", SqlValue::Int(1)), ("NAME", text("alice"))]),
        Row::from_pairs([("ID", SqlValue::Int(2)), ("NAME", text("bob"))]),
    ]);
    let mut conn = connection_over(session, "3");

    let rows = conn
        .select(
            Select::new()
                .columns(&["id", "name"])
                .from("users")
                .order_by(&["id"])
                .limit(2)
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].get("name"), Some(&text("bob")));
    assert_eq!(
        conn.session().executed(),
        vec!["SELECT FIRST 2 id, name FROM users ORDER BY id ASC"]
    );
}

#[tokio::test]
async fn test_insert_get_id_appends_returning_and_normalizes_the_id() {
    let mut session = MockSession::new();
    session.push_rows(vec![Row::from_pairs([("ID", text("42"))])]);
    let mut conn = connection_over(session, "2.5");
    let born = NaiveDate::from_ymd_opt(1990, 4, 1).unwrap();

    let id = conn
        .insert_get_id(
            Insert::new()
                .into_table("users")
                .columns(&["name", "born"])
                .values(vec![
                    text("alice"),
                    SqlValue::Date(born),
                ])
                .build(),
            "id",
        )
        .await
        .unwrap();
    assert_eq!(id, SqlValue::Int(42));

    let Event::Execute(sql, params) = &conn.session().events[0] else {
        panic!("expected an executed statement");
    };
    assert_eq!(sql, "INSERT INTO users (name, born) VALUES (?, ?) RETURNING id");
    assert_eq!(params, &vec![text("alice"), SqlValue::Date(born)]);
}

#[tokio::test]
async fn test_insert_get_id_needs_returning() {
    let mut conn = connection("1");
    let query = Insert::new()
        .into_table("users")
        .columns(&["name"])
        .values(vec!["alice"])
        .build();
    assert!(matches!(
        conn.insert_get_id(query, "id").await,
        Err(Error::UnsupportedFeatureForVersion {
            feature: "RETURNING",
            ..
        })
    ));
    assert!(conn.session().executed().is_empty());
}

#[tokio::test]
async fn test_writes_report_affected_rows() {
    let mut session = MockSession::new();
    session.push_result(RawResult::Affected(1));
    session.push_result(RawResult::Affected(3));
    session.push_result(RawResult::Affected(0));
    let mut conn = connection_over(session, "3");

    let inserted = conn
        .insert(
            Insert::new()
                .into_table("users")
                .columns(&["name"])
                .values(vec!["carol"])
                .build(),
        )
        .await
        .unwrap();
    let updated = conn
        .update(
            Update::new()
                .table("users")
                .set("active", false)
                .where_clause(col("last_login").is_null())
                .build(),
        )
        .await
        .unwrap();
    let deleted = conn
        .delete(
            Delete::new()
                .from("users")
                .where_clause(col("id").eq(99))
                .build(),
        )
        .await
        .unwrap();
    assert_eq!((inserted, updated, deleted), (1, 3, 0));
}

#[tokio::test]
async fn test_stored_procedures_and_functions() {
    let mut session = MockSession::new();
    session.push_result(RawResult::Affected(0));
    session.push_rows(vec![
        Row::from_pairs([("ORDER_ID", SqlValue::Int(10))]),
        Row::from_pairs([("ORDER_ID", SqlValue::Int(11))]),
    ]);
    session.push_rows(vec![Row::from_pairs([("VAL", SqlValue::Float(19.6))])]);
    let mut conn = connection_over(session, "3");

    let out = conn
        .execute_procedure("ADD_USER", vec![text("alice"), SqlValue::Int(30)])
        .await
        .unwrap();
    assert!(out.is_empty());

    let orders = conn
        .select_procedure("ORDERS_FOR", vec![SqlValue::Int(7)])
        .await
        .unwrap();
    assert_eq!(orders.len(), 2);

    let tax = conn
        .execute_function("TAX", vec![SqlValue::Float(98.0)])
        .await
        .unwrap();
    assert_eq!(tax, SqlValue::Float(19.6));

    assert_eq!(
        conn.session().events[0],
        Event::Execute(
            String::from("EXECUTE PROCEDURE ADD_USER(?, ?)"),
            vec![text("alice"), SqlValue::Int(30)]
        )
    );
    assert_eq!(
        conn.session().executed()[1..],
        [
            "SELECT * FROM ORDERS_FOR(?)",
            "SELECT TAX(?) AS VAL FROM RDB$DATABASE"
        ]
    );
}

#[tokio::test]
async fn test_next_sequence_value_by_version() {
    let mut session = MockSession::new();
    session.push_rows(vec![Row::from_pairs([("GEN_ID", SqlValue::Int(8))])]);
    let mut conn = connection_over(session, "1");
    assert_eq!(conn.next_sequence_value("users_id_seq").await.unwrap(), 8);
    assert_eq!(
        conn.session().executed(),
        vec!["SELECT GEN_ID(users_id_seq, 1) FROM RDB$DATABASE"]
    );

    let mut session = MockSession::new();
    session.push_rows(vec![Row::from_pairs([("NEXT_VALUE", text("9"))])]);
    let mut conn = connection_over(session, "4");
    assert_eq!(conn.next_sequence_value("users_id_seq").await.unwrap(), 9);
    assert_eq!(
        conn.session().executed(),
        vec!["SELECT NEXT VALUE FOR users_id_seq FROM RDB$DATABASE"]
    );
}

#[tokio::test]
async fn test_schema_runs_every_statement_in_order() {
    init_tracing();
    let config = FirebirdConfig::default().with_version("2").with_prefix("app_");
    let mut conn = Connection::new(MockSession::new(), config).unwrap();
    let op: SchemaOperation = CreateTableBuilder::new()
        .name("users")
        .column(bigint("id").primary_key().autoincrement().build())
        .column(varchar("email", 255).not_null().build())
        .column(date("born").build())
        .build()
        .into();
    conn.schema(&op).await.unwrap();

    let executed = conn.session().executed();
    assert_eq!(executed.len(), 3);
    assert!(executed[0].starts_with("CREATE TABLE app_users ("));
    assert_eq!(executed[1], "CREATE SEQUENCE app_users_id_seq");
    assert!(executed[2].starts_with("CREATE TRIGGER app_users_id_bi FOR app_users"));
}

#[tokio::test]
async fn test_schema_stops_at_the_first_failure() {
    let mut session = MockSession::new();
    session.fail_execute = true;
    let mut conn = connection_over(session, "2");
    let op: SchemaOperation = CreateTableBuilder::new()
        .name("users")
        .column(bigint("id").primary_key().autoincrement().build())
        .build()
        .into();
    assert!(matches!(conn.schema(&op).await, Err(Error::Session(_))));
    assert_eq!(conn.session().executed().len(), 1);
}

#[tokio::test]
async fn test_catalog_lookups() {
    let mut session = MockSession::new();
    session.push_rows(vec![Row::from_pairs([("COUNT", SqlValue::Int(1))])]);
    session.push_rows(vec![Row::from_pairs([("COUNT", SqlValue::Int(0))])]);
    session.push_rows(vec![
        Row::from_pairs([("COLUMN_NAME", text("ID                             "))]),
        Row::from_pairs([("COLUMN_NAME", text("EMAIL                          "))]),
    ]);
    let mut conn = connection_over(session, "1");

    assert!(conn.has_table("users").await.unwrap());
    assert!(!conn.has_table("ghosts").await.unwrap());
    // Firebird 1 has no TRIM; padding is stripped after the fact.
    assert_eq!(
        conn.column_listing("users").await.unwrap(),
        vec!["ID", "EMAIL"]
    );

    let Event::Execute(_, params) = &conn.session().events[0] else {
        panic!("expected an executed statement");
    };
    assert_eq!(params, &vec![text("USERS")]);
}

#[tokio::test]
async fn test_config_from_json_drives_the_connection() {
    init_tracing();
    let config = FirebirdConfig::from_json(
        r#"{"version": "3.0", "prefix": "crm_", "quote_identifiers": true}"#,
    )
    .unwrap();
    let mut conn = Connection::new(MockSession::new(), config).unwrap();
    let stmt = conn
        .compile(
            &Select::new()
                .columns(&["id"])
                .from("contacts")
                .build()
                .into(),
        )
        .await
        .unwrap();
    assert_eq!(stmt.sql(), "SELECT \"id\" FROM \"crm_contacts\"");
    assert!(conn.session().events.is_empty());

    assert!(matches!(
        FirebirdConfig::from_json(r#"{"version": 3}"#),
        Err(Error::Config(_))
    ));
}

#[tokio::test]
async fn test_wrong_result_shape_is_reported() {
    let mut session = MockSession::new();
    session.push_result(RawResult::Affected(0));
    let mut conn = connection_over(session, "3");
    let query = Select::new().all().from("users").build();
    assert!(matches!(
        conn.select(query).await,
        Err(Error::UnexpectedResult(_))
    ));
}
