//! Transaction nesting, savepoints and autocommit switching.

mod common;
use common::*;

use oxide_sql_firebird::Error;

#[tokio::test]
async fn test_nested_begin_and_commit_round_trip() {
    let mut conn = connection("3");
    conn.begin().await.unwrap();
    conn.begin().await.unwrap();
    assert_eq!(conn.transaction_level(), 2);
    conn.commit().await.unwrap();
    assert_eq!(conn.transaction_level(), 1);
    conn.commit().await.unwrap();

    let state = conn.transaction_state();
    assert!(state.is_idle());
    assert!(state.autocommit());

    let session = conn.session();
    assert_eq!(session.autocommit_switches(), vec![false, true]);
    assert_eq!(
        session.executed(),
        vec!["SAVEPOINT TRANS2", "RELEASE SAVEPOINT TRANS2 ONLY"]
    );
    assert_eq!(
        session.events,
        vec![
            Event::SetAutocommit(false),
            Event::Begin,
            Event::Execute(String::from("SAVEPOINT TRANS2"), vec![]),
            Event::Execute(String::from("RELEASE SAVEPOINT TRANS2 ONLY"), vec![]),
            Event::Commit,
            Event::SetAutocommit(true),
        ]
    );
    assert!(session.autocommit);
}

#[tokio::test]
async fn test_partial_rollback_targets_the_savepoint_above() {
    let mut conn = connection("3");
    for _ in 0..3 {
        conn.begin().await.unwrap();
    }
    assert_eq!(conn.transaction_level(), 3);

    conn.rollback(Some(1)).await.unwrap();
    assert_eq!(conn.transaction_level(), 1);
    assert!(!conn.transaction_state().autocommit());

    let session = conn.session();
    assert_eq!(
        session.executed(),
        vec!["SAVEPOINT TRANS2", "SAVEPOINT TRANS3", "ROLLBACK TO SAVEPOINT TRANS2"]
    );
    assert_eq!(session.autocommit_switches(), vec![false]);
}

#[tokio::test]
async fn test_default_rollback_unwinds_one_level() {
    let mut conn = connection("2");
    conn.begin().await.unwrap();
    conn.begin().await.unwrap();
    conn.rollback(None).await.unwrap();
    assert_eq!(conn.transaction_level(), 1);
    assert_eq!(
        conn.session().executed().last().map(String::as_str),
        Some("ROLLBACK TO SAVEPOINT TRANS2")
    );

    conn.rollback(None).await.unwrap();
    assert!(conn.transaction_state().is_idle());
    assert!(conn.session().events.contains(&Event::Rollback));
    assert_eq!(conn.session().autocommit_switches(), vec![false, true]);
}

#[tokio::test]
async fn test_full_rollback_from_any_depth() {
    let mut conn = connection("3");
    conn.begin().await.unwrap();
    conn.begin().await.unwrap();
    conn.rollback(Some(0)).await.unwrap();

    let state = conn.transaction_state();
    assert!(state.is_idle());
    assert!(state.autocommit());
    assert_eq!(
        conn.session().events[3..],
        [Event::Rollback, Event::SetAutocommit(true)]
    );
}

#[tokio::test]
async fn test_failed_begin_restores_autocommit() {
    let mut session = MockSession::new();
    session.fail_begin = true;
    let mut conn = connection_over(session, "3");

    let err = conn.begin().await.unwrap_err();
    assert!(matches!(err, Error::Session(_)));
    assert_eq!(conn.transaction_level(), 0);
    assert!(conn.transaction_state().autocommit());
    assert_eq!(conn.session().autocommit_switches(), vec![false, true]);
    assert!(conn.session().autocommit);
}

#[tokio::test]
async fn test_failed_commit_keeps_the_transaction_open() {
    let mut session = MockSession::new();
    session.fail_commit = true;
    let mut conn = connection_over(session, "3");
    conn.begin().await.unwrap();

    assert!(matches!(conn.commit().await, Err(Error::Session(_))));
    assert_eq!(conn.transaction_level(), 1);
    assert!(!conn.transaction_state().autocommit());
    assert_eq!(conn.session().autocommit_switches(), vec![false]);
}

#[tokio::test]
async fn test_failed_savepoint_leaves_depth_unchanged() {
    let mut session = MockSession::new();
    session.fail_execute = true;
    let mut conn = connection_over(session, "3");
    conn.begin().await.unwrap();

    assert!(conn.begin().await.is_err());
    assert_eq!(conn.transaction_level(), 1);
}

#[tokio::test]
async fn test_failed_rollback_keeps_the_transaction_open() {
    let mut session = MockSession::new();
    session.fail_rollback = true;
    let mut conn = connection_over(session, "3");
    conn.begin().await.unwrap();

    assert!(conn.rollback(None).await.is_err());
    assert_eq!(conn.transaction_level(), 1);
    assert_eq!(conn.session().autocommit_switches(), vec![false]);
}

#[tokio::test]
async fn test_commit_without_transaction_fails() {
    let mut conn = connection("3");
    assert!(matches!(conn.commit().await, Err(Error::NoActiveTransaction)));
    assert!(conn.session().events.is_empty());
}

#[tokio::test]
async fn test_rollback_outside_or_above_current_level_is_a_no_op() {
    let mut conn = connection("3");
    conn.rollback(None).await.unwrap();
    conn.rollback(Some(0)).await.unwrap();
    assert!(conn.session().events.is_empty());

    conn.begin().await.unwrap();
    let before = conn.session().events.len();
    conn.rollback(Some(1)).await.unwrap();
    conn.rollback(Some(5)).await.unwrap();
    assert_eq!(conn.session().events.len(), before);
    assert_eq!(conn.transaction_level(), 1);
}

#[tokio::test]
async fn test_autocommit_already_off_is_left_alone_on_begin() {
    let mut session = MockSession::new();
    session.autocommit = false;
    let mut conn = connection_over(session, "3");
    conn.begin().await.unwrap();
    assert_eq!(conn.session().events, vec![Event::Begin]);
}
