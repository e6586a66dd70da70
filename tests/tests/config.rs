//! Facades configured from a DSN instead of a ready-made driver.

use pretty_assertions::assert_eq;
use std::sync::Arc;
use tests::*;

fn facade(schema: &Arc<Schema>, dsn: Dsn) -> Db {
    Db::builder().schema(schema.clone()).dsn(dsn).build().unwrap()
}

#[tokio::test]
async fn file_dsn_persists_across_facades() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guestbook.json");
    let schema = Arc::new(guestbook());
    let dsn = Dsn::new("FILE").database(path.display().to_string());

    let mut db = facade(&schema, dsn.clone());
    db.push_schema().await.unwrap();
    db.insert("guestbook.1", entry("Ann", "Hi")).unwrap();
    db.commit().await.unwrap();
    drop(db);

    assert!(path.exists());

    let mut db = facade(&schema, dsn);
    assert_eq!(db.select("guestbook.1.guestbook_name").await.unwrap(), "Ann");
}

#[tokio::test]
async fn file_dsn_in_memory() {
    let schema = Arc::new(guestbook());
    let mut db = facade(&schema, Dsn::from_url("file::memory:").unwrap());

    db.push_schema().await.unwrap();
    db.insert("guestbook.*", entry("Ann", "Hi")).unwrap();
    db.commit().await.unwrap();
    assert_eq!(db.length("guestbook", None).await.unwrap(), 1);
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn sqlite_dsn_in_memory() {
    let schema = Arc::new(guestbook());
    let mut db = facade(&schema, Dsn::new("sqlite3"));

    db.push_schema().await.unwrap();
    db.insert("guestbook.*", entry("Ann", "Hi")).unwrap();
    db.commit().await.unwrap();

    let tables = db.list_tables().await.unwrap();
    assert!(tables.contains(&"guestbook".to_string()));
    assert_eq!(db.length("guestbook", None).await.unwrap(), 1);
}

#[cfg(not(feature = "mysql"))]
#[tokio::test]
async fn mysql_dsn_without_driver_fails_on_first_use() {
    let schema = Arc::new(guestbook());
    let mut db = facade(&schema, Dsn::new("mysql").host("localhost").database("app"));

    // Building the facade never connects
    assert_eq!(db.quote_identifier("order"), "`order`");

    let err = db.select("guestbook").await.unwrap_err();
    assert!(err.is_connection());
}

#[tokio::test]
async fn unknown_dbms_fails_on_commit_and_discards_the_queue() {
    let schema = Arc::new(guestbook());
    let mut db = facade(&schema, Dsn::new("frontbase"));

    db.insert("guestbook.*", entry("Ann", "Hi")).unwrap();
    let err = db.commit().await.unwrap_err();
    assert!(err.is_connection());
    assert_eq!(db.queued(), 0);
}

#[tokio::test]
async fn quoting_follows_the_configured_dbms() {
    let schema = Arc::new(guestbook());

    let cases = [
        ("db2", "User", "\"User\""),
        ("db2", "guestbook", "guestbook"),
        ("generic", "User", "User"),
        ("mssql", "a]b", "[a]]b]"),
        ("oracle", "a\"b", "\"a\"\"b\""),
        ("mariadb", "user", "`user`"),
        ("pgsql", "user", "\"user\""),
    ];

    for (dbms, name, quoted) in cases {
        let db = facade(&schema, Dsn::new(dbms));
        assert_eq!(db.quote_identifier(name), quoted, "{dbms}");
    }
}

#[test]
fn facade_requires_a_schema() {
    let err = Db::builder().dsn(Dsn::new("file")).build().unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn defaults_fill_missing_keys() {
    let schema = Arc::new(guestbook());
    let db = Db::builder()
        .schema(schema)
        .dsn(Dsn::new("mysql").database("app"))
        .defaults(Dsn::new("sqlite").host("db.internal").port(3306))
        .build()
        .unwrap();

    assert_eq!(db.dsn().dbms(), "mysql");
    assert_eq!(db.dsn().host.as_deref(), Some("db.internal"));
    assert_eq!(db.dsn().port, Some(3306));
    assert_eq!(db.dsn().database.as_deref(), Some("app"));
}
