use pretty_assertions::assert_eq;
use quarry::{driver::operation::Transaction, Access, CommandKind, Parameter, Record, Value};
use tests::{models, DbTest};

fn column(results: &quarry::RowSet, name: &str) -> Vec<Value> {
    results
        .iter()
        .map(|row| row.get(name).cloned().unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn row_sets_follow_command_order() {
    let mut test = DbTest::new();
    let db = test.setup_db().await;

    let mut batch = db.batch("Default", Access::Read).unwrap();
    batch
        .add_command("SELECT 1 AS col", CommandKind::Text, [])
        .add_command("SELECT 2 AS col UNION ALL SELECT 3", CommandKind::Text, []);

    let results = batch.execute().await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(column(&results[0], "col"), [Value::I64(1)]);
    assert_eq!(column(&results[1], "col"), [Value::I64(2), Value::I64(3)]);
}

#[tokio::test]
async fn named_parameters_are_bound() {
    let mut test = DbTest::new();
    let db = test.setup_db().await;

    let mut batch = db.batch("Default", Access::Read).unwrap();
    batch.add_command(
        "SELECT @a + @b AS total, @a AS a",
        CommandKind::Text,
        [Parameter::eq("a", 1i64), Parameter::eq("b", 2i64)],
    );

    let results = batch.execute().await.unwrap();
    let row = results[0].first().unwrap();

    assert_eq!(row.get("total"), Some(&Value::I64(3)));
    assert_eq!(row.get("a"), Some(&Value::I64(1)));
}

#[tokio::test]
async fn custom_prefix() {
    let mut test = DbTest::new();
    let db = test.setup_db().await;

    let mut batch = db.batch("Default", Access::Read).unwrap();
    batch.add_command_with_prefix(
        "SELECT :name AS name",
        CommandKind::Text,
        ":",
        [Parameter::eq("name", "quarry")],
    );

    let results = batch.execute().await.unwrap();

    assert_eq!(column(&results[0], "name"), [Value::from("quarry")]);
}

#[tokio::test]
async fn failing_command_reports_its_index() {
    let mut test = DbTest::new();
    let db = test.setup_db().await;

    let mut batch = db.batch("Default", Access::Read).unwrap();
    batch
        .add_command("SELECT 1", CommandKind::Text, [])
        .add_command("SELECT * FROM \"Missing\"", CommandKind::Text, [])
        .add_command("SELECT 2", CommandKind::Text, []);

    let err = batch.execute().await.unwrap_err();

    assert!(err.is_command_execution());
    assert_eq!(err.command_index(), Some(1));

    // The third command never ran
    assert_eq!(test.log().commands().len(), 2);
    assert_eq!(test.log().failures(), 1);
}

#[tokio::test]
async fn executed_batch_cannot_run_again() {
    let mut test = DbTest::new();
    let db = test.setup_db().await;

    let mut batch = db.batch("Default", Access::Read).unwrap();
    batch.add_command("SELECT 1", CommandKind::Text, []);
    batch.execute().await.unwrap();

    // Ignored
    batch.add_command("SELECT 2", CommandKind::Text, []);
    assert!(batch.is_empty());

    let err = batch.execute().await.unwrap_err();
    assert!(err.is_use_after_dispose());
    assert_eq!(test.log().commands().len(), 1);
}

#[tokio::test]
async fn empty_batch_does_not_connect() {
    let mut test = DbTest::new();
    let db = test.setup_db().await;

    let mut batch = db.batch("Default", Access::Read).unwrap();
    let results = batch.execute().await.unwrap();

    assert!(results.is_empty());
    assert!(test.log().is_empty());
}

#[tokio::test]
async fn failure_in_transaction_rolls_back() {
    let mut test = DbTest::new();
    test.builder().register(models::user()).unwrap();
    let db = test.setup_db().await;

    let mut batch = db.batch("Default", Access::Write).unwrap();
    batch
        .in_transaction()
        .add_command(
            "INSERT INTO \"Users\" (\"Name\") VALUES (@name)",
            CommandKind::Text,
            [Parameter::eq("name", "Alice")],
        )
        .add_command("INSERT INTO \"Missing\" DEFAULT VALUES", CommandKind::Text, []);

    let err = batch.execute().await.unwrap_err();
    assert_eq!(err.command_index(), Some(1));

    assert_eq!(
        test.log().transactions(),
        [Transaction::Start, Transaction::Rollback]
    );
    assert_eq!(db.count("User", None).await.unwrap(), 0);
}

#[tokio::test]
async fn failure_without_transaction_keeps_earlier_commands() {
    let mut test = DbTest::new();
    test.builder().register(models::user()).unwrap();
    let db = test.setup_db().await;

    let mut batch = db.batch("Default", Access::Write).unwrap();
    batch
        .add_command(
            "INSERT INTO \"Users\" (\"Name\") VALUES (@name)",
            CommandKind::Text,
            [Parameter::eq("name", "Alice")],
        )
        .add_command("INSERT INTO \"Missing\" DEFAULT VALUES", CommandKind::Text, []);

    batch.execute().await.unwrap_err();

    assert!(test.log().transactions().is_empty());
    assert_eq!(db.count("User", None).await.unwrap(), 1);
}

#[tokio::test]
async fn commands_report_affected_rows() {
    let mut test = DbTest::new();
    test.builder().register(models::user()).unwrap();
    let db = test.setup_db().await;

    for name in ["Alice", "Bob", "Carol"] {
        let mut user = Record::new("User").with("Name", name);
        db.insert(&mut user).await.unwrap();
    }

    let mut batch = db.batch("Default", Access::Write).unwrap();
    batch
        .add_command(
            "UPDATE \"Users\" SET \"Active\" = @active WHERE \"Name\" <> @name",
            CommandKind::Text,
            [Parameter::eq("active", false), Parameter::eq("name", "Alice")],
        )
        .add_command("SELECT \"Name\" FROM \"Users\"", CommandKind::Text, []);

    let results = batch.execute().await.unwrap();

    assert!(results[0].is_empty());
    assert_eq!(results[0].affected(), 2);
    assert_eq!(results[1].affected(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_transactions_do_not_interleave() {
    let mut test = DbTest::new();
    test.builder().register(models::tag()).unwrap();
    let db = test.setup_db().await;

    let mut tasks = tokio::task::JoinSet::new();
    for task in 0..8 {
        let db = db.clone();
        tasks.spawn(async move {
            let mut failed = 0;

            for n in 0..25 {
                let mut batch = db.batch("Default", Access::Write).unwrap();
                batch.in_transaction().add_command(
                    "INSERT INTO \"Tag\" (\"Name\") VALUES (@name)",
                    CommandKind::Text,
                    [Parameter::eq("name", format!("{task}-{n}"))],
                );

                // Every fifth batch rolls its insert back
                if n % 5 == 0 {
                    batch.add_command("INSERT INTO \"Missing\" DEFAULT VALUES", CommandKind::Text, []);
                }

                match batch.execute().await {
                    Ok(_) => {}
                    Err(err) => {
                        assert_eq!(err.command_index(), Some(1), "{err}");
                        failed += 1;
                    }
                }
            }

            failed
        });
    }

    let mut failed = 0;
    while let Some(result) = tasks.join_next().await {
        failed += result.unwrap();
    }

    assert_eq!(failed, 40);
    assert_eq!(db.count("Tag", None).await.unwrap(), 160);
}
