//! Turns resolved addresses into dialect-independent queries.
//!
//! Everything here is synchronous and validates against the schema, so a
//! malformed call fails before anything reaches the transaction queue.

use tabula_core::{
    address::RowRef,
    schema::{Column, Schema, Table, Type},
    stmt::{Condition, Insert, Limit, OrderBy, Remove, Row, Select, Update, Value},
    Address, Error, Result,
};

/// Where-clause, sorting and paging for a read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub filter: Option<Condition>,

    /// Sort columns, most significant first
    pub sort: Vec<String>,

    /// Sort every column in descending order
    pub descending: bool,

    /// Number of rows to skip
    pub offset: u64,

    /// Page size. `None` returns every remaining row.
    pub limit: Option<u64>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a where-clause, and-ed with any existing one.
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn sort(mut self, column: impl Into<String>) -> Self {
        self.sort.push(column.into());
        self
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Zero-based page of `size` rows.
    pub fn page(self, page: u64, size: u64) -> Self {
        self.offset(page.saturating_mul(size)).limit(size)
    }
}

impl From<Condition> for Options {
    fn from(condition: Condition) -> Self {
        Options::new().filter(condition)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    schema: &'a Schema,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    pub fn build_select(&self, address: &Address, options: &Options) -> Result<Select> {
        let table = self.schema.get_table(&address.table)?;
        let mut select = Select::new(&table.name);

        match &address.row {
            None => {}
            Some(RowRef::Key(key)) => select = select.filter(self.key_filter(table, key)?),
            Some(RowRef::Current) => {
                if options.filter.is_none() {
                    return Err(current_row_without_filter(address));
                }
            }
            Some(RowRef::New) => {
                return Err(Error::invalid_argument(format!(
                    "cannot read `{address}`: `*` addresses a row that does not exist yet"
                )))
            }
        }

        if let Some(filter) = &options.filter {
            select = select.filter(self.condition(table, filter.clone())?);
        }

        if let Some(column) = &address.column {
            let mut columns = vec![];
            if let Some(pk) = &table.primary_key {
                if pk != column {
                    columns.push(pk.clone());
                }
            }
            columns.push(column.clone());
            select = select.columns(columns);
        }

        for column in &options.sort {
            let column = table.get_column(column)?.name.clone();
            select = select.order_by(if options.descending {
                OrderBy::desc(column)
            } else {
                OrderBy::asc(column)
            });
        }

        let limit = Limit::new(options.limit, options.offset);
        if !limit.is_unbounded() {
            select = select.limit(limit);
        }

        Ok(select)
    }

    /// `COUNT(*)` over the rows of `address` matching `filter`.
    pub fn build_count(&self, address: &Address, filter: Option<&Condition>) -> Result<Select> {
        let options = Options {
            filter: filter.cloned(),
            ..Options::default()
        };
        let mut select = self.build_select(address, &options)?.count();
        select.columns.clear();
        Ok(select)
    }

    /// Builds an insert for a table address, a `*` row, or an explicit key.
    ///
    /// A column address inserts a row holding only that column (and the
    /// key, if one was given); a sub-path nests the value inside an
    /// array-typed column.
    pub fn build_insert(&self, address: &Address, values: Value) -> Result<Insert> {
        let table = self.schema.check_writeable(&address.table)?;

        let mut row = match &address.column {
            Some(column) => {
                let mut value = Value::Null;
                value.set_path(address.path.as_slice(), values)?;
                Row::new().set(column, value)
            }
            None => Row::try_from(values)?,
        };

        match &address.row {
            None | Some(RowRef::New) => {}
            Some(RowRef::Key(key)) => {
                let (pk, value) = self.key(table, key)?;
                row.insert(&pk.name, value);
            }
            Some(RowRef::Current) => {
                return Err(Error::invalid_argument(format!(
                    "cannot insert into `{address}`: use `*` or an explicit key"
                )))
            }
        }

        let row = self.row(table, row)?;

        for column in table.columns() {
            let missing = row.get(&column.name).is_none_or(Value::is_null);
            if missing && !column.nullable && column.default.is_none() && !column.auto_increment {
                return Err(Error::validation(&table.name, &column.name, "a value is required"));
            }
        }

        Ok(Insert::new(&table.name, row))
    }

    /// Builds an update for a keyed row, or for the rows matching `filter`
    /// on a table or `?` address.
    pub fn build_update(
        &self,
        address: &Address,
        values: Value,
        filter: Option<&Condition>,
    ) -> Result<Update> {
        let table = self.schema.check_writeable(&address.table)?;
        let filter = self.write_filter(table, address, filter, "update")?;
        let mut update = Update::new(&table.name, filter);

        match &address.column {
            Some(name) => {
                let column = table.get_column(name)?.check_writeable(&table.name)?;

                if address.path.is_empty() {
                    update = update.set(&column.name, column.coerce(&table.name, values)?);
                } else if column.ty == Type::Array {
                    update = update.patch(&column.name, address.path.clone(), values);
                } else {
                    return Err(Error::invalid_argument(format!(
                        "cannot update `{address}`: {} is not an array column",
                        column.name
                    )));
                }
            }
            None => {
                for (name, value) in self.row(table, Row::try_from(values)?)? {
                    update = update.set(name, value);
                }
            }
        }

        if update.assignments.is_empty() {
            return Err(Error::invalid_argument(format!(
                "update of `{address}` does not assign any column"
            )));
        }

        Ok(update)
    }

    pub fn build_remove(
        &self,
        address: &Address,
        filter: Option<&Condition>,
        limit: Option<u64>,
    ) -> Result<Remove> {
        let table = self.schema.check_writeable(&address.table)?;

        if address.column.is_some() {
            return Err(Error::invalid_argument(format!(
                "cannot remove `{address}`: only rows can be removed"
            )));
        }

        let filter = self.write_filter(table, address, filter, "remove")?;
        let remove = Remove::new(&table.name, filter);

        Ok(match limit {
            Some(limit) => remove.limit(limit),
            None => remove,
        })
    }

    /// Filter selecting the row with primary key `key`.
    pub fn key_filter(&self, table: &Table, key: &str) -> Result<Condition> {
        let (pk, value) = self.key(table, key)?;
        Ok(Condition::eq(&pk.name, value))
    }

    fn key<'t>(&self, table: &'t Table, key: &str) -> Result<(&'t Column, Value)> {
        if key.is_empty() {
            return Err(Error::invalid_argument(format!(
                "empty row key for table `{}`",
                table.name
            )));
        }

        let Some(pk) = table.primary_key_column() else {
            return Err(Error::invalid_argument(format!(
                "table `{}` has no primary key; rows cannot be addressed by key",
                table.name
            )));
        };

        let value = pk
            .ty
            .coerce(Value::from(key))
            .map_err(|message| Error::validation(&table.name, &pk.name, message))?;

        Ok((pk, value))
    }

    fn write_filter(
        &self,
        table: &Table,
        address: &Address,
        filter: Option<&Condition>,
        action: &str,
    ) -> Result<Condition> {
        let filter = match filter {
            Some(filter) => Some(self.condition(table, filter.clone())?),
            None => None,
        };

        match (&address.row, filter) {
            (Some(RowRef::Key(key)), None) => self.key_filter(table, key),
            (Some(RowRef::Key(key)), Some(filter)) => Ok(self.key_filter(table, key)?.and(filter)),
            (None | Some(RowRef::Current), Some(filter)) => Ok(filter),
            (Some(RowRef::Current), None) => Err(current_row_without_filter(address)),
            (None, None) => Err(Error::invalid_argument(format!(
                "cannot {action} `{address}`: a key or a where-clause is required"
            ))),
            (Some(RowRef::New), _) => Err(Error::invalid_argument(format!(
                "cannot {action} `{address}`: `*` addresses a row that does not exist yet"
            ))),
        }
    }

    /// Checks every column of `row` against the table and coerces its value
    /// to the declared type.
    fn row(&self, table: &Table, row: Row) -> Result<Row> {
        row.into_iter()
            .map(|(name, value)| {
                let column = table.get_column(&name)?.check_writeable(&table.name)?;
                Ok((column.name.clone(), column.coerce(&table.name, value)?))
            })
            .collect()
    }

    /// Resolves the columns a condition names and coerces the values it
    /// compares them against.
    fn condition(&self, table: &Table, mut condition: Condition) -> Result<Condition> {
        condition.try_visit_columns_mut(&mut |name, values| {
            let column = table.get_column(name)?;

            for value in values.iter_mut() {
                if value.is_null() {
                    continue;
                }
                *value = column
                    .ty
                    .coerce(std::mem::take(value))
                    .map_err(|message| Error::validation(&table.name, &column.name, message))?;
            }

            *name = column.name.clone();
            Ok(())
        })?;

        Ok(condition)
    }
}

fn current_row_without_filter(address: &Address) -> Error {
    Error::invalid_argument(format!(
        "`{address}` addresses the current row and needs a where-clause"
    ))
}
