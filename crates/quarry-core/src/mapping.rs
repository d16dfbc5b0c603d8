mod builder;
pub use builder::Builder;

mod definition;
pub use definition::MappingDefinition;

mod join_table;
pub use join_table::{JoinSide, JoinTable};

mod property;
pub use property::{DefaultValue, Mode, PropertyMapping, Relation};

mod registry;
pub use registry::MappingRegistry;
