use std::fs;
use todoz::api::{TodozApi, TodozPaths};
use todoz::config::TodozConfig;
use todoz::error::TodozError;
use todoz::model::{Mode, TodoId};
use todoz::store::fs::FileStore;
use todoz::store::lock::StoreLock;
use todoz::store::DataStore;

#[test]
fn records_and_counter_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let mut store = FileStore::new(dir.path().to_path_buf());
    let a = store.insert("a.md", "first", &[]).unwrap();
    let b = store.insert("a.md", "second", &["x".to_string()]).unwrap();
    store.delete(b.id).unwrap();
    drop(store);

    let mut reopened = FileStore::new(dir.path().to_path_buf());
    let all = reopened.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, a.id);

    // The deleted id is never handed out again.
    let c = reopened.insert("a.md", "third", &[]).unwrap();
    assert_eq!(c.id, TodoId(3));
}

#[test]
fn save_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path().to_path_buf());
    for i in 0..5 {
        store.insert("a.md", &format!("todo {}", i), &[]).unwrap();
    }

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["todos.json", "todos.lock"]);

    let raw = fs::read_to_string(store.store_file()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["next_id"], 6);
    assert_eq!(json["records"].as_array().unwrap().len(), 5);
}

#[test]
fn corrupt_file_is_store_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("todos.json"), "[1, 2").unwrap();
    let mut store = FileStore::new(dir.path().to_path_buf());

    assert!(matches!(store.get_all(), Err(TodozError::StoreUnavailable(_))));
    assert!(matches!(
        store.insert("a.md", "x", &[]),
        Err(TodozError::StoreUnavailable(_))
    ));
    // The broken file is left for the user to inspect.
    assert_eq!(
        fs::read_to_string(dir.path().join("todos.json")).unwrap(),
        "[1, 2"
    );
}

#[test]
fn lock_is_released_after_each_transaction() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path().to_path_buf());
    store.insert("a.md", "x", &[]).unwrap();
    assert!(StoreLock::try_acquire(dir.path()).is_ok());
}

#[test]
fn two_handles_share_one_counter() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = FileStore::new(dir.path().to_path_buf());
    let mut second = FileStore::new(dir.path().to_path_buf());

    let a = first.insert("a.md", "from first", &[]).unwrap();
    let b = second.insert("b.md", "from second", &[]).unwrap();
    let c = first.next_id().unwrap();
    assert_eq!((a.id, b.id, c), (TodoId(1), TodoId(2), TodoId(3)));
}

#[test]
fn api_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let paths = TodozPaths::new(dir.path().to_path_buf());
    let mut api = TodozApi::new(
        FileStore::new(paths.store_dir()),
        TodozConfig::default(),
        paths,
    );

    let doc = ["- [ ] bla bub ()", "- [ ] bla bub '()'"];
    let tagged = api.handle(&doc, "notes.md", Mode::Write).unwrap().lines;
    assert_eq!(tagged, vec!["-%1% [ ] bla bub ()", "-%2% [ ] bla bub '()'"]);

    let again = api.handle(tagged.as_slice(), "notes.md", Mode::Write).unwrap().lines;
    assert_eq!(again, tagged);

    let loaded = api.load_todos().unwrap().lines;
    assert_eq!(
        loaded,
        vec!["# notes.md", "-%1% [ ] bla bub ()", "-%2% [ ] bla bub '()'"]
    );
}
