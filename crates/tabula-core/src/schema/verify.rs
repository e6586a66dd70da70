use super::{Schema, Type, View};
use crate::{Error, Result};

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        self.verify_primary_keys()?;
        self.verify_auto_increment()?;

        for view in self.schema.views() {
            self.verify_view(view)?;
        }

        Ok(())
    }

    fn verify_primary_keys(&self) -> Result<()> {
        for table in self.schema.tables() {
            if let Some(pk) = &table.primary_key {
                if !table.columns.contains_key(pk) {
                    return Err(Error::invalid_schema(format!(
                        "primary key `{pk}` of table `{}` is not one of its columns",
                        table.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn verify_auto_increment(&self) -> Result<()> {
        for table in self.schema.tables() {
            for column in table.columns() {
                if !column.auto_increment {
                    continue;
                }

                if table.primary_key.as_deref() != Some(column.name.as_str())
                    || column.ty != Type::Integer
                {
                    return Err(Error::invalid_schema(format!(
                        "auto-increment column `{}.{}` must be the integer primary key",
                        table.name, column.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn verify_view(&self, view: &View) -> Result<()> {
        if view.tables.is_empty() {
            return Err(Error::invalid_schema(format!(
                "view `{}` does not list any tables",
                view.name
            )));
        }

        if self.schema.is_table(&view.name) {
            return Err(Error::invalid_schema(format!(
                "view `{}` has the same name as a table",
                view.name
            )));
        }

        for table in &view.tables {
            if !self.schema.is_table(table) {
                return Err(Error::invalid_schema(format!(
                    "view `{}` references unknown table `{table}`",
                    view.name
                )));
            }
        }

        for field in &view.fields {
            if !view.tables.contains(&field.table) {
                return Err(Error::invalid_schema(format!(
                    "field `{}.{}` of view `{}` is not from one of the view's tables",
                    field.table, field.column, view.name
                )));
            }

            let table = self.schema.get_table(&field.table)?;
            if !table.is_column(&field.column) {
                return Err(Error::invalid_schema(format!(
                    "view `{}` selects unknown column `{}.{}`",
                    view.name, field.table, field.column
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{Column, Schema, TableBuilder, Type, View};

    fn guestbook() -> TableBuilder {
        TableBuilder::new("Guestbook")
            .column(Column::new("Guestbook_Id", Type::Integer).auto_increment())
            .column(Column::new("guestbook_name", Type::String(Some(64))))
            .primary_key("guestbook_id")
    }

    #[test]
    fn names_are_canonicalized() {
        let schema = Schema::builder("db").table(guestbook()).build().unwrap();
        let table = schema.get_table("GUESTBOOK").unwrap();

        assert_eq!(table.name, "guestbook");
        assert_eq!(schema.primary_key("guestbook"), Some("guestbook_id"));
        assert!(table.is_column("GUESTBOOK_NAME"));
    }

    #[test]
    fn primary_key_must_exist() {
        let err = Schema::builder("db")
            .table(TableBuilder::new("t").primary_key("missing"))
            .build()
            .unwrap_err();
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn auto_increment_only_on_primary_key() {
        let err = Schema::builder("db")
            .table(TableBuilder::new("t").column(Column::new("n", Type::Integer).auto_increment()))
            .build()
            .unwrap_err();
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn view_requires_tables() {
        let err = Schema::builder("db")
            .table(guestbook())
            .view(View::new("v", Vec::<String>::new()))
            .build()
            .unwrap_err();
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn view_field_table_must_be_listed() {
        let err = Schema::builder("db")
            .table(guestbook())
            .table(TableBuilder::new("other").column(Column::new("x", Type::Text)))
            .view(View::new("v", ["guestbook"]).field("other", "x"))
            .build()
            .unwrap_err();
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn view_field_column_must_exist() {
        let err = Schema::builder("db")
            .table(guestbook())
            .view(View::new("v", ["guestbook"]).field("guestbook", "nope"))
            .build()
            .unwrap_err();
        assert!(err.is_invalid_schema());

        let schema = Schema::builder("db")
            .table(guestbook())
            .view(View::new("v", ["guestbook"]).field("guestbook", "guestbook_name"))
            .build()
            .unwrap();
        assert!(schema.is_view("V"));
    }

    #[test]
    fn primary_key_is_not_null() {
        let schema = Schema::builder("db")
            .table(
                TableBuilder::new("t")
                    .column(Column::new("id", Type::String(None)))
                    .primary_key("id"),
            )
            .build()
            .unwrap();
        assert!(!schema.get_table("t").unwrap().get_column("id").unwrap().nullable);
    }

    #[test]
    fn readonly_checks() {
        let schema = Schema::builder("db")
            .table(guestbook().readonly(true))
            .build()
            .unwrap();
        assert!(schema.check_writeable("guestbook").unwrap_err().is_not_writeable());

        let schema = Schema::builder("db")
            .readonly(true)
            .table(guestbook())
            .build()
            .unwrap();
        assert!(schema.is_readonly());
        assert!(schema.check_writeable("guestbook").unwrap_err().is_not_writeable());
    }
}
