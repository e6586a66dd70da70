use pretty_assertions::{assert_eq, assert_ne};
use tests::*;

async fn update_visible_after_commit(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("guestbook.1", entry("Ann", "Hi")).unwrap();
    db.commit().await.unwrap();

    db.update("guestbook.1.guestbook_message", "Changed").unwrap();
    db.commit().await.unwrap();
    assert_eq!(db.select("guestbook.1.guestbook_message").await.unwrap(), "Changed");

    db.update("guestbook.1", entry("Ann B.", "Again")).unwrap();
    db.commit().await.unwrap();

    let row = Row::try_from(db.select("guestbook.1").await.unwrap()).unwrap();
    assert_eq!(row.get("guestbook_name"), Some(&Value::from("Ann B.")));
    assert_eq!(row.get("guestbook_message"), Some(&Value::from("Again")));
}

async fn uncommitted_writes_are_private(s: impl Setup) {
    let mut writer = s.setup().await;
    let mut reader = s.connect();

    writer.insert("guestbook.1", entry("Ann", "Hi")).unwrap();
    writer.commit().await.unwrap();

    writer.update("guestbook.1.guestbook_message", "Changed").unwrap();
    writer.insert("guestbook.*", entry("Bob", "Yo")).unwrap();

    assert_eq!(reader.select("guestbook.1.guestbook_message").await.unwrap(), "Hi");
    assert_eq!(reader.length("guestbook", None).await.unwrap(), 1);
    assert_eq!(reader.queued(), 0);

    writer.commit().await.unwrap();

    assert_eq!(reader.select("guestbook.1.guestbook_message").await.unwrap(), "Changed");
    assert_eq!(reader.length("guestbook", None).await.unwrap(), 2);
}

async fn facades_compare_by_schema_and_dsn(s: impl Setup) {
    let mut a = s.connect();
    let b = s.connect();

    // Equal, yet each owns its queue
    assert_eq!(a, b);
    a.insert("guestbook.*", entry("Ann", "Hi")).unwrap();
    assert_eq!(a.queued(), 1);
    assert_eq!(b.queued(), 0);

    let other_schema = Db::builder()
        .schema(guestbook())
        .dsn(s.dsn())
        .shared_driver(s.driver())
        .build()
        .unwrap();
    assert_ne!(a, other_schema);

    let other_dsn = Db::builder()
        .schema(s.schema())
        .dsn(s.dsn().database("elsewhere"))
        .shared_driver(s.driver())
        .build()
        .unwrap();
    assert_ne!(a, other_dsn);
}

tests!(
    update_visible_after_commit,
    uncommitted_writes_are_private,
    facades_compare_by_schema_and_dsn,
);
