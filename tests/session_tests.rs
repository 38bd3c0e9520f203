//! Token persistence across restarts

use shiftdesk::prelude::*;

fn stores(dir: &tempfile::TempDir) -> (Arc<FileTokenStore>, Arc<MemoryTokenStore>) {
    (
        Arc::new(FileTokenStore::new(dir.path().join("state").join("token"))),
        Arc::new(MemoryTokenStore::new()),
    )
}

#[test]
fn test_remembered_token_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (file, memory) = stores(&dir);

    let session = Session::restore(file.clone(), memory).unwrap();
    assert_eq!(session.state(), AuthState::Anonymous);
    session.login("jwt-remember", true).unwrap();

    let restarted = Session::restore(file, Arc::new(MemoryTokenStore::new())).unwrap();
    assert_eq!(restarted.token().as_deref(), Some("jwt-remember"));
    assert_eq!(restarted.bearer().as_deref(), Some("Bearer jwt-remember"));
}

#[test]
fn test_unremembered_token_is_not_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let (file, memory) = stores(&dir);

    let session = Session::restore(file.clone(), memory).unwrap();
    session.login("jwt-once", false).unwrap();
    assert!(session.is_authenticated());
    assert!(!file.path().exists());

    let restarted = Session::restore(file, Arc::new(MemoryTokenStore::new())).unwrap();
    assert!(!restarted.is_authenticated());
}

#[test]
fn test_logout_clears_both_stores() {
    let dir = tempfile::tempdir().unwrap();
    let (file, memory) = stores(&dir);

    let session = Session::restore(file.clone(), memory.clone()).unwrap();
    session.login("persisted", true).unwrap();
    session.login("ephemeral", false).unwrap();
    session.logout().unwrap();

    assert!(!session.is_authenticated());
    assert!(file.load().unwrap().is_none());
    assert!(memory.load().unwrap().is_none());
    assert_eq!(Route::Dashboard.resolve(&session), Route::Login);
    assert_eq!(Route::after_logout(), Route::Home);
}

#[test]
fn test_persistent_store_wins_on_restore() {
    let dir = tempfile::tempdir().unwrap();
    let (file, memory) = stores(&dir);
    file.save("from-disk").unwrap();
    memory.save("from-memory").unwrap();

    let session = Session::restore(file, memory).unwrap();
    assert_eq!(session.token().as_deref(), Some("from-disk"));
}

#[test]
fn test_blank_token_file_is_anonymous() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    std::fs::write(&path, "  \n").unwrap();

    let session = Session::restore(
        Arc::new(FileTokenStore::new(path)),
        Arc::new(MemoryTokenStore::new()),
    )
    .unwrap();
    assert!(!session.is_authenticated());
}
