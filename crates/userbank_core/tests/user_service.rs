use userbank_core::db::open_db_in_memory;
use userbank_core::{
    Account, SqliteUserRepository, User, UserId, UserRepository, UserService,
};

fn ann() -> User {
    User::new("Ann", "Lee", 30, true)
        .unwrap()
        .with_account(Account {
            credit_card: 111,
            balance: 500.0,
            write_offs: 0.0,
            deposit: 100.0,
        })
}

fn only_id<R: UserRepository>(service: &UserService<R>) -> UserId {
    let users = service.fetch_all();
    assert_eq!(users.len(), 1);
    users[0].id().unwrap()
}

#[test]
fn create_then_fetch_concrete_scenario() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    assert!(service.create(&ann()));

    let id = only_id(&service);
    let fetched = service.fetch_by_id(id).unwrap();
    assert_eq!(fetched.name(), "Ann");
    assert_eq!(fetched.balance(), 500.0);
}

#[test]
fn update_and_delete_report_success() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    assert!(service.create(&ann()));
    let id = only_id(&service);

    let mut user = service.fetch_by_id(id).unwrap();
    user.set_deposit(250.0);
    assert!(service.update(&user));
    assert_eq!(service.fetch_by_id(id).unwrap().deposit(), 250.0);

    assert!(service.delete_by_id(id));
    assert!(service.fetch_by_id(id).is_none());
    assert!(service.fetch_all().is_empty());
}

#[test]
fn missing_rows_yield_negative_results() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let ghost = User::with_id(404, "Ghost", "User", 20, false).unwrap();
    assert!(!service.update(&ghost));
    assert!(!service.update(&ann()));
    assert!(!service.delete_by_id(404));
    assert!(service.fetch_by_id(404).is_none());
    assert!(service.fetch_all().is_empty());
}

#[test]
fn storage_failures_are_swallowed() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::new(&conn));
    conn.execute_batch("DROP TABLE users;").unwrap();

    assert!(!service.create(&ann()));
    assert!(service.fetch_by_id(1).is_none());
    assert!(service.fetch_all().is_empty());

    // The typed repository still tells failure apart from absence.
    assert!(service.repository().get_user(1).is_err());
}
