//! User use-case service.
//!
//! # Responsibility
//! - Provide the caller-facing CRUD entry points with benign failure values.
//! - Log every swallowed storage error with its message.
//!
//! # Invariants
//! - Service APIs never panic and never propagate storage errors.
//! - `false`, `None` and an empty `Vec` cover both "no data" and "storage
//!   failed". Callers that must tell them apart use `repository()`.

use crate::model::user::{User, UserId};
use crate::repo::user_repo::{RepoError, RepoResult, UserRepository};
use log::error;

/// Swallow-and-log wrapper over a `UserRepository`.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Typed repository for callers that need distinct outcomes.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Inserts `user`; returns whether exactly one row was written.
    pub fn create(&self, user: &User) -> bool {
        succeeded("user_create", self.repo.create_user(user))
    }

    /// Returns the user with `id`, or `None` when absent or on failure.
    pub fn fetch_by_id(&self, id: UserId) -> Option<User> {
        match self.repo.get_user(id) {
            Ok(user) => user,
            Err(err) => {
                log_swallowed("user_get", &err);
                None
            }
        }
    }

    /// Returns all users, or an empty list on failure.
    pub fn fetch_all(&self) -> Vec<User> {
        self.repo.list_users().unwrap_or_else(|err| {
            log_swallowed("user_list", &err);
            Vec::new()
        })
    }

    /// Overwrites the stored row for `user`; returns whether it was updated.
    pub fn update(&self, user: &User) -> bool {
        succeeded("user_update", self.repo.update_user(user))
    }

    /// Deletes the row with `id`; returns whether it was removed.
    pub fn delete_by_id(&self, id: UserId) -> bool {
        succeeded("user_delete", self.repo.delete_user(id))
    }
}

fn succeeded<T>(event: &'static str, result: RepoResult<T>) -> bool {
    match result {
        Ok(_) => true,
        // Zero affected rows is a plain negative answer, not a failure.
        Err(RepoError::NotFound(_)) => false,
        Err(err) => {
            log_swallowed(event, &err);
            false
        }
    }
}

fn log_swallowed(event: &'static str, err: &RepoError) {
    error!("event={event} module=service status=error error_code=storage_failed error={err}");
}
