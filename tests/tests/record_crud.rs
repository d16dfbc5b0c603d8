use pretty_assertions::assert_eq;
use quarry::{Db, Parameter, Record, Value};
use tests::{models, DbTest};

async fn setup() -> (DbTest, Db) {
    let mut test = DbTest::new();
    test.builder()
        .register(models::user())
        .unwrap()
        .register(models::post())
        .unwrap()
        .register(models::tag())
        .unwrap();

    let db = test.setup_db().await;
    (test, db)
}

async fn create_user(db: &Db, name: &str) -> i64 {
    let mut user = Record::new("User").with("Name", name);
    db.insert(&mut user).await.unwrap();
    user.value("ID").to_i64().unwrap()
}

async fn create_post(db: &Db, author: i64, title: &str) -> i64 {
    let mut post = Record::new("Post")
        .with("Title", title)
        .with("Author", author);
    db.insert(&mut post).await.unwrap();
    post.value("ID").to_i64().unwrap()
}

#[tokio::test]
async fn insert_assigns_the_generated_identity() {
    let (_test, db) = setup().await;

    let alice = create_user(&db, "Alice").await;
    let bob = create_user(&db, "Bob").await;

    assert!(bob > alice);

    let user = db.get("User", alice).await.unwrap().unwrap();
    assert_eq!(user.value("Name"), &Value::from("Alice"));

    // Defaults apply to properties the record left unset
    assert_eq!(user.value("Active"), &Value::Bool(true));
}

#[tokio::test]
async fn get_missing_record() {
    let (_test, db) = setup().await;

    assert!(db.get("User", 42i64).await.unwrap().is_none());
}

#[tokio::test]
async fn find_and_count() {
    let (_test, db) = setup().await;

    for name in ["Alice", "Albert", "Bob"] {
        create_user(&db, name).await;
    }

    let found = db
        .find("User", Parameter::like("Al%", "Name", 100))
        .await
        .unwrap();

    let mut names: Vec<_> = found.iter().map(|user| user.value("Name").clone()).collect();
    names.sort_by_key(|name| name.as_str().map(str::to_owned));
    assert_eq!(names, [Value::from("Albert"), Value::from("Alice")]);

    assert_eq!(db.count("User", None).await.unwrap(), 3);
    assert_eq!(
        db.count(
            "User",
            Some(Parameter::or([
                Parameter::eq("Name", "Alice"),
                Parameter::eq("Name", "Bob"),
            ]))
        )
        .await
        .unwrap(),
        2
    );
}

#[tokio::test]
async fn update_and_save() {
    let (_test, db) = setup().await;

    let id = create_user(&db, "Alice").await;

    let mut user = db.get("User", id).await.unwrap().unwrap();
    user.set("Name", "Alicia");
    assert_eq!(db.update(&user).await.unwrap(), 1);

    user.set("Email", "alicia@example.com");
    db.save(&mut user).await.unwrap();

    let reloaded = db.get("User", id).await.unwrap().unwrap();
    assert_eq!(reloaded.value("Name"), &Value::from("Alicia"));
    assert_eq!(reloaded.value("Email"), &Value::from("alicia@example.com"));

    // No identity yet, so save inserts
    let mut bob = Record::new("User").with("Name", "Bob");
    db.save(&mut bob).await.unwrap();
    assert!(!bob.value("ID").is_null());
    assert_eq!(db.count("User", None).await.unwrap(), 2);
}

#[tokio::test]
async fn save_inserts_unknown_identity() {
    let (_test, db) = setup().await;

    let mut user = Record::new("User").with("ID", 10i64).with("Name", "Carol");
    db.save(&mut user).await.unwrap();

    let carol = db.get("User", 10i64).await.unwrap().unwrap();
    assert_eq!(carol.value("Name"), &Value::from("Carol"));
}

#[tokio::test]
async fn delete_cascades_to_posts_and_join_rows() {
    let (test, db) = setup().await;

    let alice = create_user(&db, "Alice").await;
    let bob = create_user(&db, "Bob").await;

    let first = create_post(&db, alice, "First").await;
    create_post(&db, alice, "Second").await;
    let other = create_post(&db, bob, "Other").await;

    let mut tag = Record::new("Tag").with("Name", "rust");
    db.insert(&mut tag).await.unwrap();
    let tag = tag.value("ID").to_i64().unwrap();

    db.link("Post", "Tags", first, tag).await.unwrap();
    db.link("Post", "Tags", other, tag).await.unwrap();

    test.log().clear();
    assert_eq!(db.delete("User", alice).await.unwrap(), 1);

    // Join rows, then posts, then the user, in one transaction
    let statements: Vec<_> = test
        .log()
        .commands()
        .into_iter()
        .map(|command| command.text)
        .collect();

    assert_eq!(statements.len(), 3);
    assert!(statements[0].starts_with("DELETE FROM \"Post_Tag\""));
    assert!(statements[1].starts_with("DELETE FROM \"Post\""));
    assert!(statements[2].starts_with("DELETE FROM \"Users\""));
    assert_eq!(test.log().transactions().len(), 2);

    assert_eq!(db.count("User", None).await.unwrap(), 1);
    assert_eq!(db.count("Post", None).await.unwrap(), 1);
    assert!(db.get("Post", other).await.unwrap().is_some());

    // Bob's post keeps its tag
    assert!(db.unlink("Post", "Tags", other, tag).await.unwrap());
    assert!(!db.unlink("Post", "Tags", other, tag).await.unwrap());
}

#[tokio::test]
async fn delete_missing_record() {
    let (_test, db) = setup().await;

    assert_eq!(db.delete("User", 99i64).await.unwrap(), 0);
}

#[tokio::test]
async fn unmapped_class() {
    let (_test, db) = setup().await;

    let err = db.all("Invoice").await.unwrap_err();
    assert!(err.is_invalid_mapping());
}
