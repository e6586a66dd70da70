use pretty_assertions::assert_eq;
use tests::*;

fn opt() -> Value {
    let mut size = Array::new();
    size.insert("w".to_string(), Value::I64(1));
    size.insert("h".to_string(), Value::I64(4));

    let mut opt = Array::new();
    opt.insert("color".to_string(), Value::from("red"));
    opt.insert("size".to_string(), Value::Array(size));
    Value::Array(opt)
}

async fn sub_path_reads_and_writes(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("guestbook.1", entry("Ann", "Hi").set("guestbook_opt", opt()))
        .unwrap();
    db.commit().await.unwrap();

    assert_eq!(db.select("guestbook.1.guestbook_opt").await.unwrap(), opt());
    assert_eq!(
        db.select("guestbook.1.guestbook_opt.size.h").await.unwrap(),
        Value::I64(4)
    );
    assert_eq!(
        db.select("guestbook.1.guestbook_opt.missing").await.unwrap(),
        Value::Null
    );

    db.update("guestbook.1.guestbook_opt.size.w", 2).unwrap();
    db.commit().await.unwrap();

    let stored = db.select("guestbook.1.guestbook_opt").await.unwrap();
    assert_eq!(stored.get_path(&["size", "w"]), Some(&Value::I64(2)));
    assert_eq!(stored.get_path(&["size", "h"]), Some(&Value::I64(4)));
    assert_eq!(stored.get_path(&["color"]).unwrap(), "red");

    // Other columns are untouched by a patch
    assert_eq!(
        db.select("guestbook.1.guestbook_message").await.unwrap(),
        "Hi"
    );
}

async fn patch_creates_missing_array(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("guestbook.1", entry("Ann", "Hi")).unwrap();
    db.commit().await.unwrap();
    assert_eq!(db.select("guestbook.1.guestbook_opt").await.unwrap(), Value::Null);

    db.update("guestbook.1.guestbook_opt.theme", "dark").unwrap();
    db.commit().await.unwrap();

    let mut expected = Array::new();
    expected.insert("theme".to_string(), Value::from("dark"));
    assert_eq!(
        db.select("guestbook.1.guestbook_opt").await.unwrap(),
        Value::Array(expected)
    );
}

async fn patch_every_filtered_row(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("guestbook.1", entry("Ann", "Hi").set("guestbook_opt", opt()))
        .unwrap()
        .insert("guestbook.2", entry("Bob", "Hi"))
        .unwrap()
        .insert("guestbook.3", entry("Cid", "Bye"))
        .unwrap();
    db.commit().await.unwrap();

    db.update_where(
        "guestbook.?.guestbook_opt.seen",
        Condition::eq("guestbook_message", "Hi"),
        true,
    )
    .unwrap();
    db.commit().await.unwrap();

    for (key, seen) in [("1", Value::Bool(true)), ("2", Value::Bool(true)), ("3", Value::Null)] {
        let address = format!("guestbook.{key}.guestbook_opt.seen");
        assert_eq!(db.select(&address).await.unwrap(), seen);
    }

    // The patch kept the rest of the existing array
    assert_eq!(
        db.select("guestbook.1.guestbook_opt.color").await.unwrap(),
        "red"
    );
}

fn pref(owner: &str, color: &str) -> Row {
    let mut opt = Array::new();
    opt.insert("color".to_string(), Value::from(color));
    Row::new()
        .set("pref_owner", owner)
        .set("pref_opt", Value::Array(opt))
}

async fn patch_rows_without_primary_key(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("pref.*", pref("ann", "red"))
        .unwrap()
        .insert("pref.*", pref("bob", "blue"))
        .unwrap();
    db.commit().await.unwrap();

    db.update_where("pref.?.pref_opt.size", Condition::is_not_null("pref_owner"), "m")
        .unwrap();
    db.commit().await.unwrap();

    let rows = db
        .select_rows("pref", Options::new().sort("pref_owner"))
        .await
        .unwrap();
    let opts: Vec<_> = rows
        .iter()
        .map(|row| {
            let opt = row.get("pref_opt").unwrap();
            (
                opt.get_path(&["color"]).cloned().unwrap(),
                opt.get_path(&["size"]).cloned().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        opts,
        [
            (Value::from("red"), Value::from("m")),
            (Value::from("blue"), Value::from("m")),
        ]
    );
}

async fn patch_rejects_indistinguishable_rows(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("pref.*", pref("cid", "red"))
        .unwrap()
        .insert("pref.*", pref("cid", "blue"))
        .unwrap();
    db.commit().await.unwrap();

    db.update_where("pref.?.pref_opt.size", Condition::eq("pref_owner", "cid"), "m")
        .unwrap();
    let err = db.commit().await.unwrap_err();
    assert!(err.is_commit_failed());
    assert!(err.root().is_invalid_argument());

    // Neither row was rewritten
    let rows = db.select_rows("pref", Options::new()).await.unwrap();
    assert!(rows
        .iter()
        .all(|row| row.get("pref_opt").unwrap().get_path(&["size"]).is_none()));
}

async fn sub_path_needs_an_array_column(s: impl Setup) {
    let mut db = s.setup().await;

    let err = db.update("guestbook.1.guestbook_name.first", "Ann").unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(db.queued(), 0);
}

tests!(
    sub_path_reads_and_writes,
    patch_creates_missing_array,
    patch_every_filtered_row,
    patch_rows_without_primary_key,
    patch_rejects_indistinguishable_rows,
    sub_path_needs_an_array_column,
);
