use pretty_assertions::assert_eq;
use quarry::{
    driver::Sqlite, mapping::PropertyMapping, schema::State, Db, MappingDefinition,
    QueryProvider, Record, SourceInfo, Type, Value,
};
use tests::{models, DbTest, LoggingDriver};

fn created_tables(ddl: &[String]) -> Vec<&str> {
    ddl.iter()
        .filter_map(|sql| sql.strip_prefix("CREATE TABLE \""))
        .filter_map(|rest| rest.split('"').next())
        .collect()
}

#[tokio::test]
async fn sync_creates_tables_in_dependency_order() {
    let mut test = DbTest::new();

    // Posts are registered before the users they reference
    test.builder()
        .register(models::post())
        .unwrap()
        .register(models::tag())
        .unwrap()
        .register(models::user())
        .unwrap();

    let db = test.builder().build().await.unwrap();
    let reports = db.sync().await.unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].source, "Default");
    assert_eq!(reports[0].statements, test.log().ddl());

    assert_eq!(
        created_tables(&test.log().ddl()),
        ["Tag", "Users", "Post", "Post_Tag"]
    );
}

#[tokio::test]
async fn second_sync_issues_no_ddl() {
    let mut test = DbTest::new();
    test.builder()
        .register(models::user())
        .unwrap()
        .register(models::post())
        .unwrap()
        .register(models::tag())
        .unwrap();

    let db = test.builder().build().await.unwrap();

    let first = db.sync().await.unwrap();
    assert!(!first[0].is_empty());

    test.log().clear();

    let second = db.sync().await.unwrap();
    assert!(second[0].is_empty());
    assert!(test.log().ddl().is_empty());
}

#[tokio::test]
async fn generator_reaches_in_sync() {
    let mut test = DbTest::new();
    test.builder().register(models::user()).unwrap();
    let db = test.builder().build().await.unwrap();

    let source = db.sources().iter().next().unwrap().clone();
    let mut generator = db.generator(source).unwrap();
    assert_eq!(generator.state(), State::Unchecked);

    assert!(generator.source_exists().await.unwrap());
    assert!(!generator.table_exists("Users").await.unwrap());

    generator.sync().await.unwrap();
    assert_eq!(generator.state(), State::InSync);

    assert!(generator.table_exists("users").await.unwrap());
    assert!(generator.diff().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_syncs_apply_each_change_once() {
    let mut test = DbTest::new();
    test.builder()
        .register(models::user())
        .unwrap()
        .register(models::post())
        .unwrap()
        .register(models::tag())
        .unwrap();

    let db = test.builder().build().await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..4 {
        let db = db.clone();
        tasks.spawn(async move { db.sync().await });
    }

    let mut applied = 0;
    while let Some(reports) = tasks.join_next().await {
        let reports = reports.unwrap().unwrap();
        if !reports[0].is_empty() {
            applied += 1;
        }
    }

    assert_eq!(applied, 1);
    assert_eq!(
        created_tables(&test.log().ddl()),
        ["Tag", "Users", "Post", "Post_Tag"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dbs_sharing_a_provider_apply_each_change_once() {
    let path = std::env::temp_dir().join(format!("quarry-shared-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let connection = format!("sqlite:{}", path.display());

    let driver = LoggingDriver::new(Sqlite::new());
    let log = driver.exec_log();
    let provider = QueryProvider::new(driver);

    let mut dbs = vec![];
    for _ in 0..2 {
        let db = Db::builder()
            .register(models::user())
            .unwrap()
            .register(models::post())
            .unwrap()
            .register(models::tag())
            .unwrap()
            .query_provider(provider.clone())
            .source(SourceInfo::new("Default", &connection, "sqlite"))
            .create_sources(true)
            .build()
            .await
            .unwrap();
        dbs.push(db);
    }

    let mut tasks = tokio::task::JoinSet::new();
    for db in dbs {
        tasks.spawn(async move { db.sync_source("Default").await });
    }

    let mut applied = 0;
    while let Some(report) = tasks.join_next().await {
        if !report.unwrap().unwrap().is_empty() {
            applied += 1;
        }
    }

    assert_eq!(applied, 1);
    assert_eq!(
        created_tables(&log.ddl()),
        ["Tag", "Users", "Post", "Post_Tag"]
    );

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn rerun_after_failed_statement_converges() {
    let driver = LoggingDriver::new(Sqlite::new()).fail_ddl_containing("CREATE TABLE \"Post\"");
    let mut test = DbTest::with_driver(driver);
    test.builder()
        .register(models::user())
        .unwrap()
        .register(models::post())
        .unwrap()
        .register(models::tag())
        .unwrap();

    let db = test.builder().build().await.unwrap();

    assert!(db.sync().await.is_err());
    assert_eq!(test.log().failures(), 1);

    // Statements before the failure stay applied
    assert_eq!(created_tables(&test.log().ddl()), ["Tag", "Users", "Post"]);

    let source = db.sources().iter().next().unwrap().clone();
    let mut generator = db.generator(source).unwrap();
    let report = generator.sync().await.unwrap();

    assert_eq!(generator.state(), State::InSync);
    assert_eq!(created_tables(&report.statements), ["Post", "Post_Tag"]);
    assert!(generator.diff().await.unwrap().is_empty());
}

#[tokio::test]
async fn sync_on_build() {
    let mut test = DbTest::new();
    test.builder()
        .register(models::user())
        .unwrap()
        .sync_on_build(true);

    let db = test.builder().build().await.unwrap();

    assert_eq!(created_tables(&test.log().ddl()), ["Users"]);
    assert_eq!(db.count("User", None).await.unwrap(), 0);
}

#[tokio::test]
async fn mutual_many_to_one_is_a_cycle() {
    let a = MappingDefinition::builder("A")
        .id(PropertyMapping::new("ID", Type::I64))
        .unwrap()
        .many_to_one("B", "B")
        .unwrap()
        .build()
        .unwrap();

    let b = MappingDefinition::builder("B")
        .id(PropertyMapping::new("ID", Type::I64))
        .unwrap()
        .many_to_one("A", "A")
        .unwrap()
        .build()
        .unwrap();

    let mut test = DbTest::new();
    test.builder().register(a).unwrap().register(b).unwrap();
    let db = test.builder().build().await.unwrap();

    let err = db.sync().await.unwrap_err();

    assert!(err.is_schema_cycle());
    assert!(test.log().ddl().is_empty());
}

async fn file_db(connection: &str, nickname: bool) -> Db {
    let mut user = MappingDefinition::builder("User")
        .id(PropertyMapping::new("ID", Type::I64).auto_increment())
        .unwrap()
        .property("Name", Type::String)
        .unwrap();

    if nickname {
        user = user
            .map(PropertyMapping::new("Nickname", Type::String).max_length(40))
            .unwrap();
    }

    Db::builder()
        .register(user.build().unwrap())
        .unwrap()
        .source(SourceInfo::new("Default", connection, "sqlite"))
        .create_sources(true)
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn new_property_adds_a_column() {
    let path = std::env::temp_dir().join(format!("quarry-add-column-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let connection = format!("sqlite:{}", path.display());

    let db = file_db(&connection, false).await;
    db.sync().await.unwrap();
    assert!(path.exists());

    let mut ann = Record::new("User").with("Name", "Ann");
    db.insert(&mut ann).await.unwrap();

    let db = file_db(&connection, true).await;
    let report = db.sync_source("Default").await.unwrap();

    assert_eq!(report.statements.len(), 1);
    assert!(report.statements[0].starts_with("ALTER TABLE \"User\" ADD COLUMN \"Nickname\""));

    // Existing rows read back with a null nickname
    let users = db.all("User").await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].value("Name"), &Value::from("Ann"));
    assert!(users[0].value("Nickname").is_null());

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn destructive_sync_drops_referencing_tables_first() {
    let path = std::env::temp_dir().join(format!("quarry-drop-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let connection = format!("sqlite:{}", path.display());

    let zoo = MappingDefinition::builder("Zoo")
        .id(PropertyMapping::new("ID", Type::I64).auto_increment())
        .unwrap()
        .build()
        .unwrap();
    let animal = MappingDefinition::builder("Animal")
        .id(PropertyMapping::new("ID", Type::I64).auto_increment())
        .unwrap()
        .many_to_one("Zoo", "Zoo")
        .unwrap()
        .build()
        .unwrap();

    let db = Db::builder()
        .register(zoo)
        .unwrap()
        .register(animal)
        .unwrap()
        .source(SourceInfo::new("Default", &connection, "sqlite"))
        .create_sources(true)
        .sync_on_build(true)
        .build()
        .await
        .unwrap();

    let mut zoo = Record::new("Zoo");
    db.insert(&mut zoo).await.unwrap();
    let mut animal = Record::new("Animal").with("Zoo", zoo.value("ID").clone());
    db.insert(&mut animal).await.unwrap();

    // Nothing is mapped any more
    let db = Db::builder()
        .source(SourceInfo::new("Default", &connection, "sqlite"))
        .destructive(true)
        .build()
        .await
        .unwrap();

    let report = db.sync_source("Default").await.unwrap();
    assert_eq!(
        report.statements,
        ["DROP TABLE \"Animal\";", "DROP TABLE \"Zoo\";"]
    );
    assert!(db.sync_source("Default").await.unwrap().is_empty());

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn missing_database_is_an_inspection_error() {
    let path = std::env::temp_dir()
        .join(format!("quarry-missing-{}", std::process::id()))
        .join("app.db");

    let db = Db::builder()
        .register(models::user())
        .unwrap()
        .source(SourceInfo::new(
            "Default",
            format!("sqlite:{}", path.display()),
            "sqlite",
        ))
        .build()
        .await
        .unwrap();

    let err = db.sync().await.unwrap_err();

    assert!(err.is_schema_inspection());
    assert!(!path.exists());
}
