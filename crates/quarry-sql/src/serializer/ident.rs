use super::{Formatter, ToSql};

use quarry_core::driver::Flavor;

pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = self.0.as_ref();

        // Embedded closing quotes are doubled
        let (open, close) = match f.serializer.flavor {
            Flavor::Sqlite | Flavor::Postgresql => ('"', '"'),
            Flavor::Mysql => ('`', '`'),
            Flavor::Mssql => ('[', ']'),
        };

        f.dst.push(open);
        for c in name.chars() {
            if c == close {
                f.dst.push(close);
            }
            f.dst.push(c);
        }
        f.dst.push(close);
    }
}

impl<S: AsRef<str>> ToSql for &Ident<S> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        Ident(self.0.as_ref()).to_sql(f)
    }
}
