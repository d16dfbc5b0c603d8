//! Mapping definitions shared by the integration tests.

use quarry::{mapping::PropertyMapping, MappingDefinition, Type, Value};

pub fn user() -> MappingDefinition {
    MappingDefinition::builder("User")
        .table("Users")
        .id(PropertyMapping::new("ID", Type::I64).auto_increment())
        .unwrap()
        .map(PropertyMapping::new("Name", Type::String).max_length(100).not_null())
        .unwrap()
        .map(PropertyMapping::new("Email", Type::String).max_length(200).unique())
        .unwrap()
        .map(PropertyMapping::new("Active", Type::Bool).default_value(|| Value::Bool(true)))
        .unwrap()
        .build()
        .unwrap()
}

/// Posts cascade from their author and relate to many tags.
pub fn post() -> MappingDefinition {
    MappingDefinition::builder("Post")
        .id(PropertyMapping::new("ID", Type::I64).auto_increment())
        .unwrap()
        .property("Title", Type::String)
        .unwrap()
        .map(PropertyMapping::many_to_one("Author", "User").cascade())
        .unwrap()
        .many_to_many("Tags", "Tag")
        .unwrap()
        .build()
        .unwrap()
}

pub fn tag() -> MappingDefinition {
    MappingDefinition::builder("Tag")
        .id(PropertyMapping::new("ID", Type::I64).auto_increment())
        .unwrap()
        .map(PropertyMapping::new("Name", Type::String).max_length(50))
        .unwrap()
        .build()
        .unwrap()
}
