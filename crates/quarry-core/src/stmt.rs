mod command;
pub use command::{Command, CommandKind};

mod parameter;
pub use parameter::{Direction, Op, Param, Parameter};

mod record;
pub use record::Record;

mod row;
pub use row::Row;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
