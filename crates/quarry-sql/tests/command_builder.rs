use pretty_assertions::assert_eq;
use quarry_core::{
    driver::Capability,
    mapping::PropertyMapping,
    stmt::{Parameter, Record, Type, Value},
    MappingDefinition, MappingRegistry, Result,
};
use quarry_sql::{bind, CommandBuilder, Flavor};

fn blog() -> Result<MappingRegistry> {
    let mut registry = MappingRegistry::new();

    registry.register(
        MappingDefinition::builder("User")
            .id(PropertyMapping::new("ID", Type::I64).auto_increment())?
            .property("Name", Type::String)?
            .property("Age", Type::I32)?
            .build()?,
    )?;

    registry.register(
        MappingDefinition::builder("Post")
            .id(PropertyMapping::new("ID", Type::I64).auto_increment())?
            .property("Title", Type::String)?
            .map(PropertyMapping::many_to_one("Author", "User").cascade())?
            .many_to_many("Tags", "Tag")?
            .build()?,
    )?;

    registry.register(
        MappingDefinition::builder("Comment")
            .id(PropertyMapping::new("ID", Type::I64).auto_increment())?
            .map(PropertyMapping::many_to_one("Post", "Post").cascade())?
            .build()?,
    )?;

    registry.register(
        MappingDefinition::builder("Tag")
            .id(PropertyMapping::new("ID", Type::I64).auto_increment())?
            .property("Name", Type::String)?
            .build()?,
    )?;

    registry.verify()?;
    Ok(registry)
}

fn texts(commands: &[quarry_core::stmt::Command]) -> Vec<&str> {
    commands.iter().map(|command| command.text.as_str()).collect()
}

#[test]
fn select_by_id() {
    let registry = blog().unwrap();
    let builder = CommandBuilder::new(&registry, &Capability::SQLITE, "@");
    let user = registry.mapping("User").unwrap();

    let command = builder.select_by_id(user, 1i64);
    assert_eq!(
        command.text,
        "SELECT \"ID\", \"Name\", \"Age\" FROM \"User\" WHERE \"ID\" = @ID"
    );
    assert_eq!(command.parameters.len(), 1);
}

#[test]
fn select_where_renames_repeated_properties() {
    let registry = blog().unwrap();
    let builder = CommandBuilder::new(&registry, &Capability::SQLITE, "@");
    let user = registry.mapping("User").unwrap();

    let command = builder.select_where(
        user,
        Parameter::and([Parameter::ge("Age", 18i32), Parameter::lt("Age", 65i32)]),
    );

    assert_eq!(
        command.text,
        "SELECT \"ID\", \"Name\", \"Age\" FROM \"User\" WHERE (\"Age\" >= @Age AND \"Age\" < @Age_2)"
    );

    let names: Vec<_> = command.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Age", "Age_2"]);
}

#[test]
fn count_uses_mapped_columns() {
    let registry = blog().unwrap();
    let builder = CommandBuilder::new(&registry, &Capability::MSSQL, "@");
    let post = registry.mapping("Post").unwrap();

    let command = builder.count(post, Some(Parameter::eq("Author", 3i64)));
    assert_eq!(
        command.text,
        "SELECT COUNT(*) AS [Count] FROM [Post] WHERE [Author_ID] = @Author"
    );
}

#[test]
fn insert_reports_identity_per_engine() {
    let registry = blog().unwrap();
    let post = registry.mapping("Post").unwrap();
    let record = Record::new("Post").with("Title", "Hello").with("Author", 1i64);

    let sqlite = CommandBuilder::new(&registry, &Capability::SQLITE, "@").insert(post, &record);
    assert_eq!(
        texts(&sqlite),
        ["INSERT INTO \"Post\" (\"Title\", \"Author_ID\") VALUES (@Title, @Author) RETURNING \"ID\""]
    );

    let mssql = CommandBuilder::new(&registry, &Capability::MSSQL, "@").insert(post, &record);
    assert_eq!(
        texts(&mssql),
        ["INSERT INTO [Post] ([Title], [Author_ID]) OUTPUT INSERTED.[ID] VALUES (@Title, @Author)"]
    );

    let mysql = CommandBuilder::new(&registry, &Capability::MYSQL, "@").insert(post, &record);
    assert_eq!(
        texts(&mysql),
        [
            "INSERT INTO `Post` (`Title`, `Author_ID`) VALUES (@Title, @Author)",
            "SELECT LAST_INSERT_ID() AS `ID`",
        ]
    );
}

#[test]
fn insert_with_explicit_identity_returns_nothing() {
    let registry = blog().unwrap();
    let tag = registry.mapping("Tag").unwrap();
    let record = Record::new("Tag").with("ID", 9i64).with("Name", "rust");

    let commands = CommandBuilder::new(&registry, &Capability::POSTGRESQL, "@").insert(tag, &record);
    assert_eq!(
        texts(&commands),
        ["INSERT INTO \"Tag\" (\"ID\", \"Name\") VALUES (@ID, @Name)"]
    );
}

#[test]
fn properties_sharing_a_parameter_name_keep_their_values() {
    let mut registry = MappingRegistry::new();
    registry
        .register(
            MappingDefinition::builder("Person")
                .id(PropertyMapping::new("ID", Type::I64))
                .unwrap()
                .map(PropertyMapping::new("First Name", Type::String).column("FirstName"))
                .unwrap()
                .property("First_Name", Type::String)
                .unwrap()
                .build()
                .unwrap(),
        )
        .unwrap();

    let person = registry.mapping("Person").unwrap();
    let record = Record::new("Person")
        .with("ID", 1i64)
        .with("First Name", "ann")
        .with("First_Name", "bea");

    let builder = CommandBuilder::new(&registry, &Capability::SQLITE, "@");
    let commands = builder.insert(person, &record);
    assert_eq!(
        texts(&commands),
        ["INSERT INTO \"Person\" (\"ID\", \"FirstName\", \"First_Name\") VALUES (@ID, @First_Name, @First_Name_2)"]
    );

    let bound = bind(&commands[0], Flavor::Sqlite).unwrap();
    let values: Vec<_> = bound.params.iter().map(|param| param.value.clone()).collect();
    assert_eq!(
        values,
        [Value::I64(1), Value::from("ann"), Value::from("bea")]
    );

    let update = builder.update(person, &record).unwrap().unwrap();
    assert_eq!(
        update.text,
        "UPDATE \"Person\" SET \"FirstName\" = @First_Name, \"First_Name\" = @First_Name_2 WHERE \"ID\" = @ID"
    );
}

#[test]
fn update_sets_present_properties() {
    let registry = blog().unwrap();
    let builder = CommandBuilder::new(&registry, &Capability::SQLITE, "@");
    let user = registry.mapping("User").unwrap();

    let record = Record::new("User").with("ID", 1i64).with("Name", "ann");
    let command = builder.update(user, &record).unwrap().unwrap();
    assert_eq!(
        command.text,
        "UPDATE \"User\" SET \"Name\" = @Name WHERE \"ID\" = @ID"
    );

    let id_only = Record::new("User").with("ID", 1i64);
    assert!(builder.update(user, &id_only).unwrap().is_none());

    let no_id = Record::new("User").with("Name", "ann");
    assert!(builder.update(user, &no_id).is_err());
}

#[test]
fn delete_cascades_dependents_first() {
    let registry = blog().unwrap();
    let builder = CommandBuilder::new(&registry, &Capability::SQLITE, "@");
    let user = registry.mapping("User").unwrap();

    let commands = builder.delete(user, 1i64).unwrap();
    assert_eq!(
        texts(&commands),
        [
            "DELETE FROM \"Post_Tag\" WHERE \"Post_ID\" IN (SELECT \"ID\" FROM \"Post\" WHERE \"Author_ID\" = @ID)",
            "DELETE FROM \"Comment\" WHERE \"Post_ID\" IN (SELECT \"ID\" FROM \"Post\" WHERE \"Author_ID\" = @ID)",
            "DELETE FROM \"Post\" WHERE \"Author_ID\" = @ID",
            "DELETE FROM \"User\" WHERE \"ID\" = @ID",
        ]
    );
    assert!(commands.iter().all(|command| command.parameter("ID").is_some()));
}

#[test]
fn delete_removes_join_rows_of_the_target_side() {
    let registry = blog().unwrap();
    let builder = CommandBuilder::new(&registry, &Capability::SQLITE, "@");
    let tag = registry.mapping("Tag").unwrap();

    let commands = builder.delete(tag, 3i64).unwrap();
    assert_eq!(
        texts(&commands),
        [
            "DELETE FROM \"Post_Tag\" WHERE \"Tag_ID\" = @ID",
            "DELETE FROM \"Tag\" WHERE \"ID\" = @ID",
        ]
    );
}

#[test]
fn link_and_unlink() {
    let registry = blog().unwrap();
    let builder = CommandBuilder::new(&registry, &Capability::POSTGRESQL, "@");
    let post = registry.mapping("Post").unwrap();

    let link = builder.link(post, "Tags", 1i64, 2i64).unwrap();
    assert_eq!(
        link.text,
        "INSERT INTO \"Post_Tag\" (\"Post_ID\", \"Tag_ID\") VALUES (@Post_ID, @Tag_ID)"
    );

    let unlink = builder.unlink(post, "Tags", 1i64, 2i64).unwrap();
    assert_eq!(
        unlink.text,
        "DELETE FROM \"Post_Tag\" WHERE \"Post_ID\" = @Post_ID AND \"Tag_ID\" = @Tag_ID"
    );

    assert!(builder.link(post, "Title", 1i64, 2i64).is_err());
}
