use pretty_assertions::assert_eq;
use std::time::Duration;
use tabula::EditWindow;
use tests::*;

async fn writes_apply_in_enqueue_order(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("guestbook.5", entry("Ann", "Hi"))
        .unwrap()
        .update("guestbook.5.guestbook_message", "Changed")
        .unwrap()
        .remove("guestbook.5")
        .unwrap();
    assert_eq!(db.queued(), 3);

    db.commit().await.unwrap();
    assert!(!db.exists("guestbook.5").await.unwrap());

    db.remove("guestbook.6")
        .unwrap()
        .insert("guestbook.6", entry("Bob", "First"))
        .unwrap()
        .update("guestbook.6.guestbook_message", "Second")
        .unwrap();
    db.commit().await.unwrap();
    assert_eq!(db.select("guestbook.6.guestbook_message").await.unwrap(), "Second");
}

async fn failed_write_aborts_the_commit(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("guestbook.1", entry("Ann", "Hi")).unwrap();
    db.commit().await.unwrap();

    db.insert("guestbook.2", entry("Bob", "Yo"))
        .unwrap()
        .insert("guestbook.1", entry("Dup", "Clash"))
        .unwrap()
        .insert("guestbook.3", entry("Cid", "Hey"))
        .unwrap();

    let err = db.commit().await.unwrap_err();
    assert!(err.is_commit_failed());
    assert!(err.cause().unwrap().is_not_created());

    assert_eq!(db.queued(), 0);
    assert_eq!(db.state(), State::RolledBack);

    // Nothing from the failed commit is visible
    assert!(!db.exists("guestbook.2").await.unwrap());
    assert!(!db.exists("guestbook.3").await.unwrap());
    assert_eq!(db.select("guestbook.1.guestbook_name").await.unwrap(), "Ann");

    // The facade stays usable
    db.insert("guestbook.2", entry("Bob", "Yo")).unwrap();
    db.commit().await.unwrap();
    assert!(db.exists("guestbook.2").await.unwrap());
}

async fn failed_commit_forgets_generated_keys(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("guestbook.*", entry("Ann", "Hi")).unwrap();
    db.commit().await.unwrap();
    let id = db.last_insert_id("guestbook").cloned().unwrap();

    db.insert("guestbook.*", entry("Bob", "Yo"))
        .unwrap()
        .insert(&format!("guestbook.{}", id.to_key().unwrap()), entry("Dup", "Clash"))
        .unwrap();
    assert!(db.commit().await.unwrap_err().is_commit_failed());

    assert_eq!(db.last_insert_id("guestbook"), None);
}

async fn rollback_is_idempotent(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("guestbook.*", entry("Ann", "Hi")).unwrap();
    db.rollback();
    assert_eq!(db.queued(), 0);
    assert_eq!(db.state(), State::Empty);

    db.rollback();
    assert_eq!(db.queued(), 0);
    assert_eq!(db.state(), State::Empty);

    db.reset().commit().await.unwrap();
    assert_eq!(db.state(), State::Empty);
    assert_eq!(db.length("guestbook", None).await.unwrap(), 0);
}

async fn expired_edit_window_discards_the_queue(s: impl Setup) {
    let mut db = s.setup().await;

    db.insert("guestbook.*", entry("Ann", "Hi")).unwrap();
    let stale = EditWindow::resume(0, Duration::from_secs(60));
    let err = db.commit_within(&stale).await.unwrap_err();
    assert!(err.is_transaction_timeout());
    assert_eq!(db.queued(), 0);

    db.insert("guestbook.*", entry("Ann", "Hi")).unwrap();
    let fresh = EditWindow::open(Duration::from_secs(60));
    db.commit_within(&fresh).await.unwrap();
    assert_eq!(db.length("guestbook", None).await.unwrap(), 1);
}

tests!(
    writes_apply_in_enqueue_order,
    failed_write_aborts_the_commit,
    failed_commit_forgets_generated_keys,
    rollback_is_idempotent,
    expired_edit_window_discards_the_queue,
);
