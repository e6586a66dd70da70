//! The facade against a driver that records instead of executing.

use pretty_assertions::assert_eq;
use tabula_core::{
    driver::null::{LoggedOp, NullDriver},
    stmt::Query,
};
use tests::*;

fn facade(driver: NullDriver) -> Db {
    Db::builder()
        .schema(guestbook())
        .dsn(Dsn::new("null"))
        .driver(driver)
        .build()
        .unwrap()
}

#[tokio::test]
async fn commit_sends_one_transaction() {
    let driver = NullDriver::new();
    let log = driver.log();
    let mut db = facade(driver);

    db.insert("guestbook.*", entry("Ann", "Hi"))
        .unwrap()
        .update("guestbook.1.guestbook_message", "Changed")
        .unwrap()
        .remove("guestbook.2")
        .unwrap();
    assert!(log.is_empty());

    db.commit().await.unwrap();

    let ops = log.ops();
    assert_eq!(ops.first(), Some(&LoggedOp::Begin));
    assert_eq!(ops.last(), Some(&LoggedOp::Commit));

    let kinds: Vec<_> = log.writes().iter().map(Query::kind).collect();
    assert_eq!(kinds, ["insert", "update", "remove"]);
}

#[tokio::test]
async fn failing_write_stops_the_commit() {
    let driver = NullDriver::new().fail_on(2);
    let log = driver.log();
    let mut db = facade(driver);

    db.insert("guestbook.*", entry("Ann", "Hi"))
        .unwrap()
        .insert("guestbook.*", entry("Bob", "Yo"))
        .unwrap()
        .insert("guestbook.*", entry("Cid", "Hey"))
        .unwrap();

    let err = db.commit().await.unwrap_err();
    assert!(err.is_commit_failed());
    assert!(err.cause().unwrap().is_not_created());
    assert!(err.root().is_driver());

    // The third write never reached the driver
    assert_eq!(log.writes().len(), 2);
    assert_eq!(log.ops().last(), Some(&LoggedOp::Rollback));
    assert_eq!(db.queued(), 0);
    assert_eq!(db.state(), State::RolledBack);
}

#[tokio::test]
async fn reads_bypass_the_queue() {
    let driver = NullDriver::new();
    let log = driver.log();
    let mut db = facade(driver);

    db.insert("guestbook.*", entry("Ann", "Hi")).unwrap();
    assert_eq!(db.select("guestbook.1").await.unwrap(), Value::Array(Array::new()));

    let ops = log.ops();
    assert_eq!(ops.len(), 1);
    assert!(matches!(&ops[0], LoggedOp::Query(Query::Select(_))));
    assert_eq!(db.queued(), 1);
}

#[tokio::test]
async fn raw_sql_reaches_the_driver() {
    let driver = NullDriver::new();
    let log = driver.log();
    let mut db = facade(driver);

    db.execute_sql("SELECT 1", Some(10), None).await.unwrap();
    assert_eq!(log.ops(), [LoggedOp::Sql("SELECT 1".to_string())]);
}

#[tokio::test]
async fn driver_commit_failure_is_a_commit_failure() {
    let mut db = facade(NullDriver::new().fail_commit());

    db.insert("guestbook.*", entry("Ann", "Hi")).unwrap();
    let err = db.commit().await.unwrap_err();

    assert!(err.is_commit_failed());
    assert!(err.root().is_driver());
    assert_eq!(db.queued(), 0);
    assert_eq!(db.last_insert_id("guestbook"), None);
}
