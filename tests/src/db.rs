pub mod file;

#[cfg(feature = "sqlite")]
pub mod sqlite;
