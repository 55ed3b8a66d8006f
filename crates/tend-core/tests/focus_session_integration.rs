//! Integration tests for the focus session workflow.
//!
//! Runs sessions against a file-backed SQLite store and checks what a fresh
//! process would load back.

use chrono::Utc;
use tend_core::archive::{self, ArchiveSummary};
use tend_core::storage::persisted::{self, LEGACY_COMPLETED_IDS_KEY, SESSIONS_KEY, TODOS_KEY};
use tend_core::storage::FocusConfig;
use tend_core::{Database, FocusEngine, FocusSession, KeyValueStore, SessionPhase, Todo};

fn open(dir: &tempfile::TempDir) -> FocusEngine<Database> {
    let db = Database::open_at(&dir.path().join("tend.db")).unwrap();
    FocusEngine::load(db, &FocusConfig::default())
}

#[test]
fn test_full_session_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    engine.add_category("Deep Work").unwrap();
    engine.add_todo("draft outline").unwrap();
    engine.add_todo("review notes").unwrap();
    let outline = engine.todos().as_slice()[0].id;
    engine.toggle_completion(outline).unwrap();

    engine.start();
    for _ in 0..5 {
        engine.tick();
    }
    engine.toggle_break();
    for _ in 0..3 {
        engine.tick();
    }
    engine.toggle_break();
    for _ in 0..2 {
        engine.tick();
    }
    engine.end_session();
    let completed = engine.completed_titles();
    engine.save_session(completed).unwrap();
    drop(engine);

    let engine = open(&dir);
    assert_eq!(engine.phase(), SessionPhase::Idle);
    assert!(engine.categories().contains("deep work"));
    assert!(engine.todos().is_empty());

    let history = engine.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].category_times["deep work"], 7);
    assert_eq!(history[0].break_time, 3);
    assert_eq!(history[0].todos, ["draft outline", "review notes"]);
    assert_eq!(history[0].completed_todos, ["draft outline"]);
}

#[test]
fn test_history_accumulates_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);

    for (category, ticks) in [("work", 30), ("study", 45)] {
        engine.select_category(category).unwrap();
        engine.start();
        for _ in 0..ticks {
            engine.tick();
        }
        engine.end_session();
        engine.save_session(vec![]).unwrap();
    }
    drop(engine);

    let engine = open(&dir);
    assert_eq!(archive::total_focus_time(engine.history()), 75);
    assert_eq!(archive::total_break_time(engine.history()), 0);

    let summary = ArchiveSummary::from_sessions(engine.history());
    assert_eq!(summary.session_count, 2);
    assert_eq!(summary.focus_by_category["work"], 30);
    assert_eq!(summary.focus_by_category["study"], 45);

    let today = Utc::now().date_naive();
    assert_eq!(archive::sessions_on(engine.history(), today, &Utc).len(), 2);
}

#[test]
fn test_corrupt_history_does_not_block_new_sessions() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = Database::open_at(&dir.path().join("tend.db")).unwrap();
        db.set(SESSIONS_KEY, "garbage{").unwrap();
    }

    let mut engine = open(&dir);
    assert!(engine.history().is_empty());
    engine.start();
    engine.tick();
    engine.end_session();
    engine.save_session(vec![]).unwrap();
    drop(engine);

    let engine = open(&dir);
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn test_legacy_completion_set_is_migrated_once() {
    let dir = tempfile::tempdir().unwrap();
    let todo = Todo::new("stretch", "exercise");
    {
        let db = Database::open_at(&dir.path().join("tend.db")).unwrap();
        persisted::save(&db, TODOS_KEY, &vec![todo.clone()]).unwrap();
        persisted::save(&db, LEGACY_COMPLETED_IDS_KEY, &vec![todo.id]).unwrap();
    }

    let engine = open(&dir);
    assert!(engine.todos().get(todo.id).unwrap().completed);
    assert!(engine.store().get(LEGACY_COMPLETED_IDS_KEY).unwrap().is_none());
    drop(engine);

    let engine = open(&dir);
    assert_eq!(engine.completed_titles(), ["stretch"]);
}

#[test]
fn test_session_records_are_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = open(&dir);
    engine.add_todo("write tests").unwrap();
    engine.start();
    engine.end_session();
    engine.save_session(vec![]).unwrap();

    // Todo list was cleared; new todos must not leak into the archived record.
    engine.add_todo("write more tests").unwrap();
    let recorded: Vec<FocusSession> = persisted::load_or_default(engine.store(), SESSIONS_KEY);
    assert_eq!(recorded[0].todos, ["write tests"]);
}
