#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::Comma;

mod flavor;

mod ident;
use ident::Ident;

// Fragment serializers
mod column_def;
mod statement;
mod ty;

use crate::stmt::Statement;

use quarry_core::driver::Flavor;

/// Serialize a statement to a SQL string
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,
}

impl Serializer {
    pub fn serialize(&self, stmt: &Statement) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Quotes an identifier for this flavor.
    pub fn ident(&self, name: &str) -> String {
        let mut ret = String::new();
        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
        };
        Ident(name).to_sql(&mut fmt);
        ret
    }

    fn is_sqlite(&self) -> bool {
        self.flavor == Flavor::Sqlite
    }
}
