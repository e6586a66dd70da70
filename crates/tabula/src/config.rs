//! Connection configuration.

use serde::{Deserialize, Serialize};
use tabula_core::{driver::Dialect, Error, Result};
use url::Url;

/// Prefix of the environment variables read by [`Dsn::from_env`].
pub const ENV_PREFIX: &str = "TABULA_";

/// Data source name: which DBMS to talk to and how to reach it.
///
/// Keys are upper-case when (de)serialized, matching the framework's
/// configuration files:
///
/// ```json
/// { "DBMS": "mysql", "HOST": "localhost", "DATABASE": "app", "USERNAME": "root" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
pub struct Dsn {
    pub dbms: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,

    /// Database name. For the file and SQLite drivers, the path of the
    /// database file; absent for an in-memory store.
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub charset: Option<String>,
}

impl Dsn {
    pub fn new(dbms: impl Into<String>) -> Self {
        Self {
            dbms: Some(dbms.into()),
            ..Default::default()
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn from_json(src: &str) -> Result<Dsn> {
        serde_json::from_str(src).map_err(|err| Error::invalid_argument(format!("invalid DSN: {err}")))
    }

    /// Parses a connection URL such as `mysql://user:pw@localhost:3306/app`
    /// or `file:///var/lib/app.json`.
    pub fn from_url(src: &str) -> Result<Dsn> {
        let url = Url::parse(src).map_err(|err| Error::invalid_argument(format!("invalid DSN URL `{src}`: {err}")))?;

        let mut dsn = Dsn::new(url.scheme());
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        dsn.host = url.host_str().and_then(non_empty);
        dsn.port = url.port();
        dsn.username = non_empty(url.username());
        dsn.password = url.password().and_then(non_empty);

        dsn.database = match dsn.dbms.as_deref() {
            // Paths are kept whole for file based databases
            Some("file" | "sqlite") => match url.path() {
                "" | "/" | ":memory:" | "/:memory:" => None,
                path => Some(path.to_string()),
            },
            _ => non_empty(url.path().trim_start_matches('/')),
        };

        dsn.charset = url
            .query_pairs()
            .find(|(key, _)| key.eq_ignore_ascii_case("charset"))
            .map(|(_, value)| value.into_owned());

        Ok(dsn)
    }

    /// Reads `TABULA_DBMS`, `TABULA_HOST`, `TABULA_PORT`, `TABULA_DATABASE`,
    /// `TABULA_USERNAME`, `TABULA_PASSWORD` and `TABULA_CHARSET`.
    pub fn from_env() -> Result<Dsn> {
        Dsn::from_vars(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Dsn> {
        let port = match var("PORT") {
            Some(port) => Some(port.parse().map_err(|_| {
                Error::invalid_argument(format!("{ENV_PREFIX}PORT is not a port number: {port}"))
            })?),
            None => None,
        };

        Ok(Dsn {
            dbms: var("DBMS"),
            host: var("HOST"),
            port,
            database: var("DATABASE"),
            username: var("USERNAME"),
            password: var("PASSWORD"),
            charset: var("CHARSET"),
        })
    }

    /// Fills every key absent from `self` with the value from `defaults`.
    pub fn with_defaults(self, defaults: &Dsn) -> Dsn {
        Dsn {
            dbms: self.dbms.or_else(|| defaults.dbms.clone()),
            host: self.host.or_else(|| defaults.host.clone()),
            port: self.port.or(defaults.port),
            database: self.database.or_else(|| defaults.database.clone()),
            username: self.username.or_else(|| defaults.username.clone()),
            password: self.password.or_else(|| defaults.password.clone()),
            charset: self.charset.or_else(|| defaults.charset.clone()),
        }
    }

    /// The DBMS name, lower-cased. Empty when not configured.
    pub fn dbms(&self) -> String {
        self.dbms.as_deref().unwrap_or_default().to_lowercase()
    }

    pub fn dialect(&self) -> Dialect {
        Dialect::from_name(&self.dbms())
    }

    /// Renders a URL for network drivers. The password is included.
    pub fn to_url(&self) -> Result<Url> {
        let dbms = self.dbms();
        if dbms.is_empty() {
            return Err(Error::invalid_argument("DSN does not name a DBMS"));
        }

        let host = self.host.as_deref().unwrap_or("localhost");
        let mut url = Url::parse(&format!("{dbms}://{host}"))
            .map_err(|err| Error::invalid_argument(format!("invalid DSN: {err}")))?;

        let invalid = |_| Error::invalid_argument("DSN credentials cannot be used in a URL");
        if let Some(username) = &self.username {
            url.set_username(username).map_err(invalid)?;
        }
        if let Some(password) = &self.password {
            url.set_password(Some(password)).map_err(invalid)?;
        }
        url.set_port(self.port).map_err(invalid)?;
        url.set_path(self.database.as_deref().unwrap_or_default());

        if let Some(charset) = &self.charset {
            url.query_pairs_mut().append_pair("charset", charset);
        }

        Ok(url)
    }
}
