/// A column as reported by the database, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableField {
    pub name: String,

    /// Vendor type name
    pub ty: String,

    pub nullable: bool,

    pub primary_key: bool,
}

/// An index as reported by the database, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIndex {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}
