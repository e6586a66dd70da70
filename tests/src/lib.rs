#[macro_use]
mod macros;

pub mod db;

pub use tabula::{
    schema::{Column, TableBuilder, Type},
    stmt::{Array, Condition, Row, Value},
    Db, Dsn, Error, Options, Schema, State,
};

use std::sync::Arc;
use tabula::Driver;

#[async_trait::async_trait]
pub trait Setup: Send + Sync + 'static {
    fn driver(&self) -> Arc<dyn Driver>;

    fn schema(&self) -> Arc<Schema>;

    fn dsn(&self) -> Dsn;

    /// A facade over the shared driver. Does not touch the database.
    fn connect(&self) -> Db {
        Db::builder()
            .schema(self.schema())
            .dsn(self.dsn())
            .shared_driver(self.driver())
            .build()
            .unwrap()
    }

    /// A facade over a database holding the schema's tables.
    async fn setup(&self) -> Db {
        let mut db = self.connect();
        db.push_schema().await.unwrap();
        db
    }
}

/// The guestbook every scenario runs against.
pub fn guestbook() -> Schema {
    Schema::builder("app")
        .table(
            TableBuilder::new("guestbook")
                .column(Column::new("guestbook_id", Type::Integer).auto_increment())
                .column(Column::new("guestbook_name", Type::String(Some(64))).not_null())
                .column(Column::new("guestbook_message", Type::Text))
                .column(Column::new("guestbook_opt", Type::Array))
                .column(Column::new("guestbook_hits", Type::Integer).default(0))
                .primary_key("guestbook_id"),
        )
        .table(
            TableBuilder::new("tag")
                .column(Column::new("tag_name", Type::String(Some(32))))
                .column(Column::new("tag_count", Type::Integer).default(0))
                .primary_key("tag_name"),
        )
        .table(
            TableBuilder::new("pref")
                .column(Column::new("pref_owner", Type::String(Some(32))))
                .column(Column::new("pref_opt", Type::Array)),
        )
        .table(
            TableBuilder::new("audit")
                .column(Column::new("audit_line", Type::Text))
                .readonly(true),
        )
        .build()
        .unwrap()
}

/// A guestbook entry as passed to `insert`.
pub fn entry(name: &str, message: &str) -> Row {
    Row::new()
        .set("guestbook_name", name)
        .set("guestbook_message", message)
}
