use pretty_assertions::assert_eq;
use tests::*;

async fn seed(db: &mut Db) {
    for (id, name, hits) in [(1, "Ann", 3), (2, "Bob", 1), (3, "Cid", 2), (4, "Dee", 5)] {
        let row = entry(name, "Hi").set("guestbook_hits", hits);
        db.insert(&format!("guestbook.{id}"), row).unwrap();
    }
    db.commit().await.unwrap();
}

fn names(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .values()
        .map(|row| {
            let name = row.get_path(&["guestbook_name"]).unwrap();
            name.as_str().unwrap().to_string()
        })
        .collect()
}

async fn table_select_is_keyed_by_primary_key(s: impl Setup) {
    let mut db = s.setup().await;
    seed(&mut db).await;

    let all = db.select("guestbook").await.unwrap();
    let keys: Vec<_> = all.as_array().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["1", "2", "3", "4"]);
    assert_eq!(all.get_path(&["2", "guestbook_name"]).unwrap(), "Bob");

    // A column of the filtered rows, still keyed by primary key
    let busy = Options::from(Condition::gt("guestbook_hits", 2));
    let hits = db
        .select_with("guestbook.?.guestbook_hits", busy)
        .await
        .unwrap();
    let hits: Vec<_> = hits.as_array().unwrap().iter().collect();
    assert_eq!(
        hits,
        [
            (&"1".to_string(), &Value::I64(3)),
            (&"4".to_string(), &Value::I64(5))
        ]
    );
}

async fn sort_and_page(s: impl Setup) {
    let mut db = s.setup().await;
    seed(&mut db).await;

    let by_hits = Options::new().sort("guestbook_hits");
    let value = db.select_with("guestbook", by_hits.clone()).await.unwrap();
    assert_eq!(names(&value), ["Bob", "Cid", "Ann", "Dee"]);

    let value = db
        .select_with("guestbook", by_hits.clone().descending().page(1, 3))
        .await
        .unwrap();
    assert_eq!(names(&value), ["Bob"]);

    let value = db
        .select_with("guestbook", by_hits.offset(1).limit(2))
        .await
        .unwrap();
    assert_eq!(names(&value), ["Cid", "Ann"]);

    let err = db
        .select_with("guestbook", Options::new().sort("nope"))
        .await
        .unwrap_err();
    assert!(err.is_column_not_found());
}

async fn filter_and_length(s: impl Setup) {
    let mut db = s.setup().await;
    seed(&mut db).await;

    let busy = Condition::ge("guestbook_hits", 2);
    let value = db
        .select_with("guestbook", Options::from(busy.clone()).sort("guestbook_name"))
        .await
        .unwrap();
    assert_eq!(names(&value), ["Ann", "Cid", "Dee"]);

    assert_eq!(db.length("guestbook", None).await.unwrap(), 4);
    assert_eq!(db.length("guestbook", Some(busy)).await.unwrap(), 3);

    // Filter values are coerced to the column type
    let five = Condition::eq("guestbook_hits", "5");
    assert_eq!(db.length("guestbook", Some(five)).await.unwrap(), 1);

    let rows = db
        .select_rows("guestbook.?", Options::from(Condition::like("guestbook_name", "%e%")))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("guestbook_name"), Some(&Value::from("Dee")));

    let err = db.select("guestbook.?").await.unwrap_err();
    assert!(err.is_invalid_argument());
}

async fn filtered_writes(s: impl Setup) {
    let mut db = s.setup().await;
    seed(&mut db).await;

    db.update_where(
        "guestbook",
        Condition::lt("guestbook_hits", 3),
        Row::new().set("guestbook_message", "Quiet"),
    )
    .unwrap();
    db.commit().await.unwrap();

    let quiet = Condition::eq("guestbook_message", "Quiet");
    assert_eq!(db.length("guestbook", Some(quiet.clone())).await.unwrap(), 2);

    db.remove_where("guestbook", quiet.clone(), Some(1)).unwrap();
    db.commit().await.unwrap();
    assert_eq!(db.length("guestbook", Some(quiet.clone())).await.unwrap(), 1);

    db.remove_where("guestbook.?", quiet.clone(), None).unwrap();
    db.commit().await.unwrap();
    assert_eq!(db.length("guestbook", Some(quiet)).await.unwrap(), 0);
    assert_eq!(db.length("guestbook", None).await.unwrap(), 2);
}

tests!(
    table_select_is_keyed_by_primary_key,
    sort_and_page,
    filter_and_length,
    filtered_writes,
);
