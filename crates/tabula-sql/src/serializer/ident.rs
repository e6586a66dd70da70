use super::{Formatter, Params, ToSql};

/// An identifier, quoted for the serializer's dialect.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let quoted = f.serializer.dialect.quote_identifier(self.0.as_ref());
        f.dst.push_str(&quoted);
    }
}
