use pretty_assertions::assert_eq;
use quarry::{Access, Config, Db, Record};
use tests::models;

const CONFIG: &str = r#"
sources:
  - name: Default
    connection: "sqlite::memory:?replica"
    provider: sqlite
    order: 1
    writable: false
  - name: Default
    connection: "sqlite::memory:"
    provider: sqlite
    parameter_prefix: ":"
schema:
  sync_on_build: true
"#;

#[tokio::test]
async fn build_from_yaml() {
    let config = Config::from_yaml(CONFIG).unwrap();
    assert_eq!(config.sources.len(), 2);
    assert!(config.schema.sync_on_build);

    let db = Db::builder()
        .register(models::user())
        .unwrap()
        .config(config)
        .build()
        .await
        .unwrap();

    // The replica is ordered after the primary
    let read = db.batch("Default", Access::Read).unwrap();
    assert_eq!(read.source().connection, "sqlite::memory:");
    assert_eq!(read.source().parameter_prefix, ":");

    // Generated commands follow the source's prefix
    let mut user = Record::new("User").with("Name", "Alice");
    db.insert(&mut user).await.unwrap();
    assert_eq!(db.count("User", None).await.unwrap(), 1);
}

#[test]
fn load_from_file() {
    let path = std::env::temp_dir().join(format!("quarry-config-{}.yml", std::process::id()));
    std::fs::write(&path, CONFIG).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.sources[1].parameter_prefix, ":");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file() {
    let err = Config::load("/nonexistent/quarry.yml").unwrap_err();
    assert!(err.is_invalid_configuration());
}

#[test]
fn unknown_schema_setting() {
    let err = Config::from_yaml(
        r#"
        schema:
          drop_everything: true
        "#,
    )
    .unwrap_err();

    assert!(err.is_invalid_configuration());
}

#[test]
fn missing_provider() {
    let err = Config::from_yaml(
        r#"
        sources:
          - name: Default
            connection: "sqlite::memory:"
            provider: ""
        "#,
    )
    .unwrap_err();

    assert!(err.is_invalid_configuration());
}
