/// A stored, named query over one or more tables.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Canonical (lower-case) name of the view
    pub name: String,

    /// Underlying tables. Never empty.
    pub tables: Vec<String>,

    /// Selected columns. Empty selects every column of every table.
    pub fields: Vec<Field>,

    /// Where-clause, kept verbatim for `CREATE VIEW`
    pub where_clause: Option<String>,

    pub order_by: Vec<String>,

    pub descending: bool,

    pub readonly: bool,

    pub check_option: CheckOption,
}

/// One selected column of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub table: String,
    pub column: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckOption {
    #[default]
    None,
    Local,
    Cascaded,
}

impl View {
    pub fn new<S: Into<String>>(name: impl Into<String>, tables: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            tables: tables.into_iter().map(Into::into).collect(),
            fields: vec![],
            where_clause: None,
            order_by: vec![],
            descending: false,
            readonly: true,
            check_option: CheckOption::None,
        }
    }

    pub fn field(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.fields.push(Field {
            table: table.into(),
            column: column.into(),
            alias: None,
        });
        self
    }

    pub fn field_as(
        mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        self.fields.push(Field {
            table: table.into(),
            column: column.into(),
            alias: Some(alias.into()),
        });
        self
    }

    pub fn where_clause(mut self, clause: impl Into<String>) -> Self {
        self.where_clause = Some(clause.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by.push(column.into());
        self
    }

    pub fn check_option(mut self, check_option: CheckOption) -> Self {
        self.check_option = check_option;
        self
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }
}
