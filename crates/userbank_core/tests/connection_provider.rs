use rusqlite::Connection;
use userbank_core::db::DbError;
use userbank_core::{
    ConnectionProvider, FileConnectionProvider, RepoError, SharedConnectionProvider,
    SqliteUserRepository, User, UserRepository,
};

#[test]
fn file_provider_sees_writes_from_earlier_calls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.db");
    let provider = FileConnectionProvider::new(&path).unwrap();
    assert_eq!(provider.path(), path.as_path());

    let repo = SqliteUserRepository::try_new(provider.clone()).unwrap();
    let id = repo
        .create_user(&User::new("Ann", "Lee", 30, true).unwrap())
        .unwrap();

    // A second repository over a fresh provider reads through new connections.
    let reopened = SqliteUserRepository::try_new(FileConnectionProvider::new(&path).unwrap())
        .unwrap();
    assert_eq!(reopened.get_user(id).unwrap().unwrap().name(), "Ann");
}

#[test]
fn file_provider_reports_open_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("users.db");

    let err = FileConnectionProvider::new(&path).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

#[test]
fn closure_errors_propagate_unchanged() {
    let provider = SharedConnectionProvider::in_memory().unwrap();

    let result: Result<(), RepoError> =
        provider.with_connection(|_conn| Err(RepoError::NotFound(5)));
    assert!(matches!(result, Err(RepoError::NotFound(5))));

    // The lock is released after an error, so the next call proceeds.
    let count: Result<i64, RepoError> = provider.with_connection(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))?)
    });
    assert_eq!(count.unwrap(), 0);
}

#[test]
fn shared_provider_serves_several_threads() {
    let provider = SharedConnectionProvider::in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&provider).unwrap();

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let repo = &repo;
            scope.spawn(move || {
                for index in 0..5 {
                    let user =
                        User::new(format!("worker-{worker}-{index}"), "Thread", 20, true).unwrap();
                    repo.create_user(&user).unwrap();
                }
            });
        }
    });

    assert_eq!(repo.list_users().unwrap().len(), 20);
}

#[test]
fn shared_provider_returns_wrapped_connection() {
    let provider = SharedConnectionProvider::in_memory().unwrap();
    SqliteUserRepository::new(&provider)
        .create_user(&User::new("Ann", "Lee", 30, true).unwrap())
        .unwrap();

    let conn: Connection = provider.into_inner().unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
