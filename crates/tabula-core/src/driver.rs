mod capability;
pub use capability::Capability;

mod dialect;
pub use dialect::Dialect;

mod introspect;
pub use introspect::{TableField, TableIndex};

pub mod null;

mod response;
pub use response::{Response, Rows};

mod result_set;
pub use result_set::{Cursor, ResultSet};

use crate::{async_trait, schema::Schema, stmt::Query, Error, Result};

use std::{borrow::Cow, fmt::Debug};

/// A database driver: knows how to open connections to one DBMS.
///
/// Drivers are cheap to clone behind an `Arc` and are shared by every
/// connection facade using the same configuration.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// SQL dialect spoken by the database.
    fn dialect(&self) -> Dialect;

    /// Describes the driver's capability.
    fn capability(&self) -> &'static Capability;

    /// Opens a new connection handle.
    async fn connect(&self) -> Result<Box<dyn Connection>>;
}

/// An open connection to the database.
///
/// Every vendor error is converted to a [`crate::Error`] before it leaves an
/// implementation. Capabilities a driver does not have are reported with an
/// unsupported-feature error; the default method bodies do exactly that.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    fn dialect(&self) -> Dialect;

    /// Executes a query object built against `schema`.
    async fn send_query_object(&mut self, schema: &Schema, query: &Query) -> Result<Response>;

    /// Executes raw SQL, optionally paged.
    async fn send_query_string(
        &mut self,
        sql: &str,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Response> {
        let _ = (sql, limit, offset);
        Err(Error::unsupported_feature("raw SQL statements"))
    }

    async fn begin_transaction(&mut self) -> Result<()> {
        Err(Error::unsupported_feature("transactions"))
    }

    async fn commit(&mut self) -> Result<()> {
        Err(Error::unsupported_feature("transactions"))
    }

    async fn rollback(&mut self) -> Result<()> {
        Err(Error::unsupported_feature("transactions"))
    }

    /// Escapes an identifier for the connection's dialect.
    fn quote_identifier<'a>(&self, name: &'a str) -> Cow<'a, str> {
        self.dialect().quote_identifier(name)
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        Err(Error::unsupported_feature("listing tables"))
    }

    async fn list_table_fields(&mut self, table: &str) -> Result<Vec<TableField>> {
        let _ = table;
        Err(Error::unsupported_feature("listing table fields"))
    }

    async fn list_table_indexes(&mut self, table: &str) -> Result<Vec<TableIndex>> {
        let _ = table;
        Err(Error::unsupported_feature("listing table indexes"))
    }

    /// Creates the schema's tables (and views, where supported) in the
    /// database.
    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        let _ = schema;
        Err(Error::unsupported_feature("creating tables"))
    }
}
