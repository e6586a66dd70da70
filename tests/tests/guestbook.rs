use pretty_assertions::assert_eq;
use tests::*;

async fn insert_then_select_by_generated_key(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("guestbook.*", entry("Ann", "Hi")).unwrap();
    assert_eq!(db.queued(), 1);
    assert_eq!(db.state(), State::Pending);

    db.commit().await.unwrap();
    assert_eq!(db.queued(), 0);
    assert_eq!(db.state(), State::Committed);

    let id = db.last_insert_id("guestbook").cloned().unwrap();
    let key = id.to_key().unwrap();

    let row = Row::try_from(db.select(&format!("guestbook.{key}")).await.unwrap()).unwrap();
    assert_eq!(row.get("guestbook_id"), Some(&id));
    assert_eq!(row.get("guestbook_name"), Some(&Value::from("Ann")));
    assert_eq!(row.get("guestbook_message"), Some(&Value::from("Hi")));
    assert_eq!(row.get("guestbook_hits"), Some(&Value::I64(0)));

    let message = db
        .select(&format!("guestbook.{key}.guestbook_message"))
        .await
        .unwrap();
    assert_eq!(message, "Hi");
}

async fn round_trip_applies_type_coercion(s: impl Setup) {
    let mut db = s.setup().await;

    let values = entry("Bob", "Yo").set("guestbook_hits", "12");
    db.insert("guestbook.7", values).unwrap();
    db.commit().await.unwrap();

    let row = Row::try_from(db.select("guestbook.7").await.unwrap()).unwrap();
    assert_eq!(row.get("guestbook_id"), Some(&Value::I64(7)));
    assert_eq!(row.get("guestbook_name"), Some(&Value::from("Bob")));
    assert_eq!(row.get("guestbook_hits"), Some(&Value::I64(12)));

    // Keys in addresses are coerced too
    assert_eq!(db.select("guestbook.007.guestbook_name").await.unwrap(), "Bob");
}

async fn delete_then_read(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("guestbook.3", entry("Ann", "Hi")).unwrap();
    db.commit().await.unwrap();
    assert!(db.exists("guestbook.3").await.unwrap());
    assert!(db.exists("guestbook.3.guestbook_message").await.unwrap());
    assert!(!db.exists("guestbook.3.guestbook_opt").await.unwrap());

    db.remove("guestbook.3").unwrap();
    db.commit().await.unwrap();

    assert!(!db.exists("guestbook.3").await.unwrap());
    assert_eq!(db.select("guestbook.3").await.unwrap(), Value::Array(Array::new()));
    assert_eq!(db.select("guestbook.3.guestbook_name").await.unwrap(), Value::Null);
}

async fn get_reports_missing_rows(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("guestbook.4", entry("Ann", "Hi")).unwrap();
    db.commit().await.unwrap();

    let row = db.get("guestbook.4").await.unwrap();
    assert_eq!(row.get("guestbook_name"), Some(&Value::from("Ann")));

    let err = db.get("guestbook.5").await.unwrap_err();
    assert!(err.is_record_not_found());

    let err = db.get("guestbook.4.guestbook_name").await.unwrap_err();
    assert!(err.is_invalid_argument());
}

async fn insert_or_update_picks_the_write(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert_or_update("tag.rust", Row::new().set("tag_count", 1))
        .await
        .unwrap();
    db.commit().await.unwrap();
    assert_eq!(db.select("tag.rust.tag_count").await.unwrap(), Value::I64(1));

    db.insert_or_update("tag.rust", Row::new().set("tag_count", 2))
        .await
        .unwrap();
    db.insert_or_update("tag.sql.tag_count", 5).await.unwrap();
    db.commit().await.unwrap();

    assert_eq!(db.select("tag.rust.tag_count").await.unwrap(), Value::I64(2));
    assert_eq!(db.select("tag.sql.tag_count").await.unwrap(), Value::I64(5));
    assert_eq!(db.length("tag", None).await.unwrap(), 2);
}

async fn malformed_calls_never_reach_the_queue(s: impl Setup) {
    let mut db = s.setup().await;

    let err = db.insert("nope.*", entry("Ann", "Hi")).unwrap_err();
    assert!(err.is_table_not_found());

    let err = db.update("guestbook.1.nope", "x").unwrap_err();
    assert!(err.is_column_not_found());

    let err = db.insert("", entry("Ann", "Hi")).unwrap_err();
    assert!(err.is_invalid_argument());

    let err = db
        .insert("guestbook.*", Row::new().set("guestbook_name", Value::Null))
        .unwrap_err();
    assert!(err.is_validation());

    let err = db
        .insert("audit.*", Row::new().set("audit_line", "x"))
        .unwrap_err();
    assert!(err.is_not_writeable());

    let err = db.remove("guestbook").unwrap_err();
    assert!(err.is_invalid_argument());

    assert_eq!(db.queued(), 0);
    assert_eq!(db.state(), State::Empty);
}

tests!(
    insert_then_select_by_generated_key,
    round_trip_applies_type_coercion,
    delete_then_read,
    get_reports_missing_rows,
    insert_or_update_picks_the_write,
    malformed_calls_never_reach_the_queue,
);
