use super::{Delimited, Formatter, Ident, Params, ToSql};

use tabula_core::stmt::{Condition, Value};

impl ToSql for &Condition {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Condition::Eq(column, value) => fmt!(f, Ident(column), " = ", value),
            Condition::Ne(column, value) => fmt!(f, Ident(column), " <> ", value),
            Condition::Lt(column, value) => fmt!(f, Ident(column), " < ", value),
            Condition::Le(column, value) => fmt!(f, Ident(column), " <= ", value),
            Condition::Gt(column, value) => fmt!(f, Ident(column), " > ", value),
            Condition::Ge(column, value) => fmt!(f, Ident(column), " >= ", value),
            Condition::Like(column, pattern) => {
                let pattern = Value::from(pattern.as_str());
                fmt!(f, Ident(column), " LIKE ", &pattern)
            }
            Condition::IsNull(column) => fmt!(f, Ident(column), " IS NULL"),
            Condition::IsNotNull(column) => fmt!(f, Ident(column), " IS NOT NULL"),
            Condition::In(_, values) if values.is_empty() => fmt!(f, "1 = 0"),
            Condition::In(column, values) => {
                fmt!(f, Ident(column), " IN (", Delimited(values, ", "), ")")
            }
            Condition::And(items) => junction(f, items, " AND ", "1 = 1"),
            Condition::Or(items) => junction(f, items, " OR ", "1 = 0"),
            Condition::Not(inner) => fmt!(f, "NOT (", &**inner, ")"),
        }
    }
}

fn junction<P: Params>(
    f: &mut Formatter<'_, P>,
    items: &[Condition],
    operator: &'static str,
    identity: &'static str,
) {
    match items {
        [] => fmt!(f, identity),
        [item] => fmt!(f, item),
        items => fmt!(f, "(", Delimited(items, operator), ")"),
    }
}
