use pretty_assertions::assert_eq;
use quarry::{mapping::PropertyMapping, stmt::Row, Db, MappingDefinition, Type, Value};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};
use tests::models;

#[test]
fn two_properties_on_one_column() {
    let err = MappingDefinition::builder("User")
        .id(PropertyMapping::new("ID", Type::I64))
        .unwrap()
        .property("Email", Type::String)
        .unwrap()
        .map(PropertyMapping::new("Contact", Type::String).column("Email"))
        .unwrap_err();

    assert!(err.is_duplicate_mapping());
}

#[tokio::test]
async fn relation_columns_are_derived_at_build() {
    let db = Db::builder()
        .register(models::user())
        .unwrap()
        .register(models::post())
        .unwrap()
        .register(models::tag())
        .unwrap()
        .build()
        .await
        .unwrap();

    let post = db.mappings().mapping("Post").unwrap();
    let author = post.property("Author").unwrap();

    assert_eq!(author.column_name(), "Author_ID");
    assert_eq!(author.ty(), Type::I64);
}

#[tokio::test]
async fn derived_column_clashing_with_a_property() {
    let post = MappingDefinition::builder("Post")
        .id(PropertyMapping::new("ID", Type::I64))
        .unwrap()
        .property("Author_ID", Type::I64)
        .unwrap()
        .many_to_one("Author", "User")
        .unwrap()
        .build()
        .unwrap();

    let err = Db::builder()
        .register(models::user())
        .unwrap()
        .register(post)
        .unwrap()
        .build()
        .await
        .unwrap_err();

    assert!(err.is_duplicate_mapping());
}

#[test]
fn defaults_are_evaluated_per_record() {
    let counter = Arc::new(AtomicI64::new(0));
    let sequence = counter.clone();

    let ticket = MappingDefinition::builder("Ticket")
        .id(PropertyMapping::new("ID", Type::I64).auto_increment())
        .unwrap()
        .map(
            PropertyMapping::new("Sequence", Type::I64)
                .default_value(move || Value::I64(sequence.fetch_add(1, Ordering::SeqCst))),
        )
        .unwrap()
        .build()
        .unwrap();

    // Building the mapping evaluates nothing
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    assert_eq!(ticket.new_record().value("Sequence"), &Value::I64(0));
    assert_eq!(ticket.new_record().value("Sequence"), &Value::I64(1));
}

#[test]
fn hydration_fills_missing_columns_with_defaults() {
    let user = models::user();
    let row = Row::new(
        Arc::from(vec!["ID".to_string(), "Name".to_string()]),
        vec![Value::I64(7), Value::from("Alice")],
    );

    let record = user.hydrate(&row).unwrap();

    assert_eq!(record.class(), "User");
    assert_eq!(record.value("ID"), &Value::I64(7));
    assert_eq!(record.value("Name"), &Value::from("Alice"));
    assert_eq!(record.value("Active"), &Value::Bool(true));
    assert!(record.value("Email").is_null());
}

#[test]
fn hydration_converts_storage_values() {
    let user = models::user();
    let row = Row::new(
        Arc::from(vec!["ID".to_string(), "Active".to_string()]),
        vec![Value::I64(1), Value::I64(0)],
    );

    let record = user.hydrate(&row).unwrap();

    assert_eq!(record.value("Active"), &Value::Bool(false));
}
