use pretty_assertions::assert_eq;
use quarry::{
    driver::Sqlite, mapping::PropertyMapping, source::SourceRegistry, Access, Db,
    MappingDefinition, SourceInfo, Type,
};
use tests::{models, sqlite};

#[test]
fn lower_order_resolves_first() {
    let mut sources = SourceRegistry::new();
    sources.register(sqlite("Default").order(2));
    sources.register(sqlite("Default").order(1));

    let resolved = sources.resolve(&models::user(), Access::Read).unwrap();

    assert_eq!(
        resolved.iter().map(|source| source.order).collect::<Vec<_>>(),
        [1, 2]
    );
}

#[tokio::test]
async fn batches_use_the_preferred_source() {
    let db = Db::builder()
        .source(SourceInfo::new("Default", "sqlite::memory:?second", "sqlite").order(2))
        .source(SourceInfo::new("Default", "sqlite::memory:?first", "sqlite").order(1))
        .build()
        .await
        .unwrap();

    let batch = db.batch("Default", Access::Read).unwrap();

    assert_eq!(batch.source().order, 1);
    assert_eq!(batch.source().connection, "sqlite::memory:?first");
}

#[tokio::test]
async fn access_filters_sources() {
    let db = Db::builder()
        .source(sqlite("Default").writable(false))
        .source(sqlite("Default").order(1).readable(false))
        .build()
        .await
        .unwrap();

    assert!(!db.batch("Default", Access::Read).unwrap().source().writable);
    assert!(db.batch("Default", Access::Write).unwrap().source().writable);
}

#[tokio::test]
async fn unknown_source_name() {
    let db = Db::builder().source(sqlite("Default")).build().await.unwrap();

    let err = db.batch("Reports", Access::Read).unwrap_err();
    assert!(err.is_no_source_available());
}

#[tokio::test]
async fn unknown_provider_fails_at_build() {
    let err = Db::builder()
        .source(SourceInfo::new("Default", "oracle://localhost/app", "oracle"))
        .build()
        .await
        .unwrap_err();

    assert!(err.is_unsupported_provider());
}

#[tokio::test]
async fn provider_names_match_exactly() {
    let err = Db::builder()
        .source(SourceInfo::new("Default", "sqlite::memory:", "SQLite"))
        .build()
        .await
        .unwrap_err();

    assert!(err.is_unsupported_provider());
}

#[tokio::test]
async fn providers_can_be_registered_under_another_name() {
    let db = Db::builder()
        .provider(Sqlite::named("embedded"))
        .source(SourceInfo::new("Default", "sqlite::memory:", "embedded"))
        .build()
        .await
        .unwrap();

    assert!(db.provider("embedded").is_some());
    assert!(db.provider("sqlite").is_some());
}

#[tokio::test]
async fn a_source_name_needs_a_writable_entry() {
    let err = Db::builder()
        .source(sqlite("Default").writable(false))
        .build()
        .await
        .unwrap_err();

    assert!(err.is_invalid_configuration());
}

#[tokio::test]
async fn classes_pinned_to_a_source() {
    let report = MappingDefinition::builder("Report")
        .source("Reports")
        .id(PropertyMapping::new("ID", Type::I64).auto_increment())
        .unwrap()
        .build()
        .unwrap();

    let db = Db::builder()
        .register(report)
        .unwrap()
        .register(models::user())
        .unwrap()
        .source(sqlite("Default"))
        .source(SourceInfo::new("Reports", "sqlite::memory:?reports", "sqlite"))
        .build()
        .await
        .unwrap();

    let reports = db.sync().await.unwrap();
    assert_eq!(
        reports.iter().map(|r| r.source.as_str()).collect::<Vec<_>>(),
        ["Default", "Reports"]
    );

    let creates = |index: usize, table: &str| {
        let prefix = format!("CREATE TABLE \"{table}\"");
        reports[index]
            .statements
            .iter()
            .any(|sql| sql.starts_with(&prefix))
    };

    // `Report` is only created on its own source, `User` on every source
    assert!(creates(0, "Users"));
    assert!(!creates(0, "Report"));
    assert!(creates(1, "Users"));
    assert!(creates(1, "Report"));
}
