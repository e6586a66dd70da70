use std::{borrow::Cow, fmt, str::FromStr};

/// DBMS family, as named by the `DBMS` key of a connection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    Mysql,
    Mssql,
    Oracle,
    Db2,
    Postgresql,
    Sqlite,
    #[default]
    Generic,
}

/// Words DB2 refuses as bare identifiers.
const DB2_RESERVED: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
    "COMMIT", "CONSTRAINT", "CREATE", "CURRENT", "CURRENT_DATE", "CURRENT_TIME",
    "CURRENT_TIMESTAMP", "CURRENT_USER", "DATE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP",
    "ELSE", "END", "EXISTS", "FETCH", "FOR", "FOREIGN", "FROM", "FULL", "GRANT", "GROUP",
    "HAVING", "IN", "INDEX", "INNER", "INSERT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE",
    "NOT", "NULL", "OF", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RIGHT",
    "ROLLBACK", "ROW", "ROWS", "SELECT", "SESSION_USER", "SET", "SYSTEM_USER", "TABLE", "THEN",
    "TIME", "TIMESTAMP", "TO", "UNION", "UNIQUE", "UPDATE", "USER", "USING", "VALUES", "VIEW",
    "WHEN", "WHERE", "WITH", "YEAR",
];

impl Dialect {
    /// Resolves a DBMS name. Unknown names fall back to the generic dialect.
    pub fn from_name(name: &str) -> Dialect {
        match name.trim().to_lowercase().as_str() {
            "mysql" | "mysqli" | "mariadb" => Dialect::Mysql,
            "mssql" | "sqlserver" | "sqlsrv" => Dialect::Mssql,
            "oracle" | "oci" | "oci8" => Dialect::Oracle,
            "db2" | "ibm_db2" => Dialect::Db2,
            "postgresql" | "postgres" | "pgsql" => Dialect::Postgresql,
            "sqlite" | "sqlite3" => Dialect::Sqlite,
            _ => Dialect::Generic,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Mysql => "mysql",
            Dialect::Mssql => "mssql",
            Dialect::Oracle => "oracle",
            Dialect::Db2 => "db2",
            Dialect::Postgresql => "postgresql",
            Dialect::Sqlite => "sqlite",
            Dialect::Generic => "generic",
        }
    }

    /// Escapes an identifier.
    ///
    /// | Dialect | Rule |
    /// |---|---|
    /// | MySQL | wrap in backticks |
    /// | MSSQL | wrap in `[ ]`, `]` doubled |
    /// | Oracle, PostgreSQL, SQLite | wrap in `"`, `"` doubled |
    /// | DB2 | wrap in `"` only when the identifier is a reserved word |
    /// | generic | unchanged |
    pub fn quote_identifier<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self {
            Dialect::Mysql => Cow::Owned(format!("`{name}`")),
            Dialect::Mssql => Cow::Owned(format!("[{}]", name.replace(']', "]]"))),
            Dialect::Oracle | Dialect::Postgresql | Dialect::Sqlite => {
                Cow::Owned(format!("\"{}\"", name.replace('"', "\"\"")))
            }
            Dialect::Db2 if is_db2_reserved(name) => Cow::Owned(format!("\"{name}\"")),
            Dialect::Db2 | Dialect::Generic => Cow::Borrowed(name),
        }
    }
}

fn is_db2_reserved(name: &str) -> bool {
    let upper = name.to_uppercase();
    DB2_RESERVED.contains(&upper.as_str())
}

impl FromStr for Dialect {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Dialect::from_name(s))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
