//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `users` table.
//! - Keep SQL text, parameter binding and row hydration in one place.
//!
//! # Invariants
//! - Every call acquires its connection from the provider and releases it
//!   before returning. Nothing is cached between calls.
//! - Each operation is one autocommit statement; no transactions span calls.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_version, latest_version};
use crate::db::{ConnectionProvider, DbError};
use crate::model::user::{Account, User, UserId, UserValidationError};
use log::{debug, warn};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const USERS_TABLE: &str = "users";

/// Column names in binding order. Must match the schema exactly.
const USER_COLUMNS: &[&str] = &[
    "id",
    "name",
    "surname",
    "gender",
    "age",
    "creditCard",
    "balance",
    "writeOffs",
    "deposit",
];

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    surname,
    gender,
    age,
    creditCard,
    balance,
    writeOffs,
    deposit
FROM users";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(UserValidationError),
    Db(DbError),
    NotFound(UserId),
    /// Update was requested for a user that was never persisted.
    MissingId,
    /// A single-row statement touched an unexpected number of rows.
    UnexpectedRowCount(usize),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "user not found: {id}"),
            Self::MissingId => write!(f, "user has no id; persist it before updating"),
            Self::UnexpectedRowCount(count) => {
                write!(f, "expected exactly one affected row, got {count}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is older than required {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for user CRUD operations.
///
/// Outcomes are reported distinctly: a value, absence (`Ok(None)` or
/// `RepoError::NotFound`), or a storage error.
pub trait UserRepository {
    /// Inserts all non-identifier fields and returns the assigned id.
    ///
    /// Any id already carried by `user` is ignored.
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Returns every row in storage order.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    /// Overwrites all non-identifier fields of the row matching `user.id()`.
    fn update_user(&self, user: &User) -> RepoResult<()>;
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<P> {
    provider: P,
}

impl<P: ConnectionProvider> SqliteUserRepository<P> {
    /// Wraps a provider without checking its schema.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Wraps a provider after verifying the `users` schema is in place.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the table
    ///   shape does not match the column bindings.
    pub fn try_new(provider: P) -> RepoResult<Self> {
        provider.with_connection(ensure_connection_ready)?;
        Ok(Self { provider })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: ConnectionProvider> UserRepository for SqliteUserRepository<P> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        let started_at = Instant::now();
        let result = self
            .provider
            .with_connection(|conn| insert_user(conn, user));
        observe("user_create", started_at, result)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let started_at = Instant::now();
        let result = self.provider.with_connection(|conn| select_user(conn, id));
        observe("user_get", started_at, result)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let started_at = Instant::now();
        let result = self.provider.with_connection(select_all_users);
        observe("user_list", started_at, result)
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = match user.id() {
            Some(id) => self
                .provider
                .with_connection(|conn| update_user_row(conn, id, user)),
            None => Err(RepoError::MissingId),
        };
        observe("user_update", started_at, result)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self
            .provider
            .with_connection(|conn| delete_user_row(conn, id));
        observe("user_delete", started_at, result)
    }
}

fn insert_user(conn: &Connection, user: &User) -> RepoResult<UserId> {
    let changed = conn.execute(
        "INSERT INTO users (
            name,
            surname,
            gender,
            age,
            creditCard,
            balance,
            writeOffs,
            deposit
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
        params![
            user.name(),
            user.surname(),
            bool_to_int(user.gender()),
            user.age(),
            user.credit_card(),
            user.balance(),
            user.write_offs(),
            user.deposit(),
        ],
    )?;

    if changed != 1 {
        return Err(RepoError::UnexpectedRowCount(changed));
    }

    Ok(conn.last_insert_rowid())
}

fn select_user(conn: &Connection, id: UserId) -> RepoResult<Option<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_user_row(row)?));
    }

    Ok(None)
}

fn select_all_users(conn: &Connection) -> RepoResult<Vec<User>> {
    let mut stmt = conn.prepare(USER_SELECT_SQL)?;
    let mut rows = stmt.query([])?;
    let mut users = Vec::new();

    while let Some(row) = rows.next()? {
        users.push(parse_user_row(row)?);
    }

    Ok(users)
}

fn update_user_row(conn: &Connection, id: UserId, user: &User) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE users
         SET
            name = ?1,
            surname = ?2,
            gender = ?3,
            age = ?4,
            creditCard = ?5,
            balance = ?6,
            writeOffs = ?7,
            deposit = ?8
         WHERE id = ?9;",
        params![
            user.name(),
            user.surname(),
            bool_to_int(user.gender()),
            user.age(),
            user.credit_card(),
            user.balance(),
            user.write_offs(),
            user.deposit(),
            id,
        ],
    )?;

    expect_single_row(changed, id)
}

fn delete_user_row(conn: &Connection, id: UserId) -> RepoResult<()> {
    let changed = conn.execute("DELETE FROM users WHERE id = ?1;", [id])?;
    expect_single_row(changed, id)
}

fn expect_single_row(changed: usize, id: UserId) -> RepoResult<()> {
    match changed {
        0 => Err(RepoError::NotFound(id)),
        1 => Ok(()),
        other => Err(RepoError::UnexpectedRowCount(other)),
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id: UserId = row.get("id")?;

    let gender = match row.get::<_, i64>("gender")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid gender value `{other}` in users.gender for id {id}"
            )));
        }
    };

    let age: i64 = row.get("age")?;
    let user = User::with_id(
        id,
        row.get::<_, String>("name")?,
        row.get::<_, String>("surname")?,
        age,
        gender,
    )
    .map_err(|err| RepoError::InvalidData(format!("users.age for id {id}: {err}")))?;

    Ok(user.with_account(Account {
        credit_card: row.get("creditCard")?,
        balance: row.get("balance")?,
        write_offs: row.get("writeOffs")?,
        deposit: row.get("deposit")?,
    }))
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([USERS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(USERS_TABLE));
    }

    for &column in USER_COLUMNS {
        if !columns.iter().any(|existing| existing == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: USERS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn observe<T>(event: &'static str, started_at: Instant, result: RepoResult<T>) -> RepoResult<T> {
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => debug!("event={event} module=repo status=ok duration_ms={duration_ms}"),
        Err(RepoError::NotFound(id)) => debug!(
            "event={event} module=repo status=not_found user_id={id} duration_ms={duration_ms}"
        ),
        Err(err) => warn!(
            "event={event} module=repo status=error duration_ms={duration_ms} error={err}"
        ),
    }
    result
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
