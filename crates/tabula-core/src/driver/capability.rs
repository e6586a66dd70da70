#[derive(Debug)]
pub struct Capability {
    /// When true, the database uses a SQL-based query language.
    pub sql: bool,

    /// Supports `begin_transaction`/`commit`/`rollback`. Without it, writes
    /// applied before a failure during commit stay applied.
    pub transactions: bool,

    /// SQL: `DELETE ... LIMIT n` is accepted.
    pub delete_limit: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        sql: true,
        transactions: true,
        delete_limit: false,
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        delete_limit: true,
        ..Self::SQLITE
    };

    /// File-simulation driver capabilities
    pub const FILE: Self = Self {
        sql: false,
        transactions: true,
        delete_limit: true,
    };

    /// Null driver capabilities
    pub const NULL: Self = Self {
        sql: false,
        transactions: true,
        delete_limit: true,
    };
}
