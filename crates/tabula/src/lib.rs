mod apply_update;

pub mod config;
pub use config::Dsn;

pub mod db;
pub use db::Db;

mod edit_window;
pub use edit_window::EditWindow;

pub mod query;
pub use query::{Options, QueryBuilder};

pub mod transaction;
pub use transaction::State;

pub use tabula_core::{
    address, driver, schema, stmt, Address, Connection, Driver, Error, Result, Schema,
};
