use tabula_core::{
    schema::{Table, Type},
    stmt::{Assignment, Condition, Row, Select, Update, Value},
    Connection, Error, Result, Schema,
};

use indexmap::IndexMap;

/// Rewrites an update carrying array patches into plain column updates.
///
/// The stored arrays are read through `connection`, which must already be
/// inside the transaction the rewritten updates are sent on. One update is
/// produced per matched row so rows holding different arrays each get their
/// own patched value.
pub(crate) async fn resolve_patches(
    connection: &mut dyn Connection,
    schema: &Schema,
    update: &Update,
) -> Result<Vec<Update>> {
    if !update.has_patches() {
        return Ok(vec![update.clone()]);
    }

    let table = schema.get_table(&update.table)?;

    // Without a primary key every column is read so each row can be told
    // apart by its stored values.
    let mut select = Select::new(&table.name).filter(update.filter.clone());
    if let Some(pk) = &table.primary_key {
        let mut columns = vec![pk.as_str()];
        for assignment in &update.assignments {
            if assignment.is_patch() && !columns.contains(&assignment.column()) {
                columns.push(assignment.column());
            }
        }
        select = select.columns(columns);
    }

    let rows = connection
        .send_query_object(schema, &select.into())
        .await?
        .into_values()?
        .into_rows()?;

    let mut updates = Vec::with_capacity(rows.len());
    for row in rows {
        let filter = row_filter(table, update, &row);
        if table.primary_key.is_none() && updates.iter().any(|u: &Update| u.filter == filter) {
            return Err(Error::invalid_argument(format!(
                "cannot patch `{}`: matched rows differ only in array columns",
                table.name
            )));
        }
        updates.push(patch_row(update, filter, row)?);
    }
    Ok(updates)
}

/// Condition matching exactly the stored `row`: its primary key, or else
/// every scalar column it holds.
fn row_filter(table: &Table, update: &Update, row: &Row) -> Condition {
    if let Some(pk) = &table.primary_key {
        return Condition::eq(pk, row.get(pk).cloned().unwrap_or_default());
    }

    table
        .columns()
        .filter(|column| column.ty != Type::Array)
        .map(|column| match row.get(&column.name) {
            None | Some(Value::Null) => Condition::is_null(&column.name),
            Some(value) => Condition::eq(&column.name, value.clone()),
        })
        .fold(update.filter.clone(), Condition::and)
}

fn patch_row(update: &Update, filter: Condition, mut row: Row) -> Result<Update> {
    let mut assigned: IndexMap<&str, Value> = IndexMap::new();

    for assignment in &update.assignments {
        match assignment {
            Assignment::Set { column, value } => {
                assigned.insert(column, value.clone());
            }
            Assignment::Patch { column, path, value } => {
                let current = assigned
                    .entry(column)
                    .or_insert_with(|| row.remove(column).unwrap_or_default());

                if !current.is_array() {
                    *current = Value::Array(Default::default());
                }
                current.set_path(path.as_slice(), value.clone())?;
            }
        }
    }

    Ok(assigned
        .into_iter()
        .fold(Update::new(&update.table, filter), |update, (column, value)| {
            update.set(column, value)
        }))
}
