use crate::Dsn;

use std::sync::Arc;
use tabula_core::{
    driver::{null::NullDriver, Dialect},
    Driver, Error, Result,
};
use tabula_driver_file::File;

/// Resolves the driver named by the DSN's `DBMS` key.
///
/// Families without a driver compiled in fail with a connection error.
pub fn driver(dsn: &Dsn) -> Result<Arc<dyn Driver>> {
    let dbms = dsn.dbms();

    match dbms.as_str() {
        "file" => connect_file(dsn),
        "null" => Ok(Arc::new(NullDriver::new())),
        "" => Err(Error::connection("DSN does not name a DBMS")),
        _ => match Dialect::from_name(&dbms) {
            Dialect::Sqlite => connect_sqlite(dsn),
            Dialect::Mysql => connect_mysql(dsn),
            _ => Err(Error::connection(format!(
                "no driver compiled in for `{dbms}`"
            ))),
        },
    }
}

fn connect_file(dsn: &Dsn) -> Result<Arc<dyn Driver>> {
    Ok(match dsn.database.as_deref() {
        None | Some(":memory:") => Arc::new(File::in_memory()),
        Some(path) => Arc::new(File::open(path)?),
    })
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(dsn: &Dsn) -> Result<Arc<dyn Driver>> {
    use tabula_driver_sqlite::Sqlite;

    Ok(match dsn.database.as_deref() {
        None | Some(":memory:") => Arc::new(Sqlite::in_memory()?),
        Some(path) => Arc::new(Sqlite::open(path)),
    })
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_dsn: &Dsn) -> Result<Arc<dyn Driver>> {
    Err(Error::connection("`sqlite` feature not enabled"))
}

#[cfg(feature = "mysql")]
fn connect_mysql(dsn: &Dsn) -> Result<Arc<dyn Driver>> {
    // `mariadb` and `mysqli` are spelled `mysql` in connection URLs. The
    // client negotiates utf8mb4 and takes no charset parameter.
    let url = Dsn {
        dbms: Some("mysql".to_string()),
        charset: None,
        ..dsn.clone()
    }
    .to_url()?;
    Ok(Arc::new(tabula_driver_mysql::MySQL::new(url.as_str())?))
}

#[cfg(not(feature = "mysql"))]
fn connect_mysql(_dsn: &Dsn) -> Result<Arc<dyn Driver>> {
    Err(Error::connection("`mysql` feature not enabled"))
}
