//! User account domain model.
//!
//! # Responsibility
//! - Define the in-memory record mirrored by one `users` row.
//! - Enforce the age bounds at construction and mutation time.
//!
//! # Invariants
//! - `age` is always within `[AGE_MIN, AGE_MAX]` for any live `User`.
//! - `id` is `None` for transient users and assigned by storage on create.
//!   There is no public setter for it.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned user identifier (SQLite rowid).
pub type UserId = i64;

/// Lowest accepted age, inclusive.
pub const AGE_MIN: i64 = 0;
/// Highest accepted age, inclusive.
pub const AGE_MAX: i64 = 120;

/// Validation errors surfaced while building or mutating a `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserValidationError {
    AgeOutOfRange { value: i64 },
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AgeOutOfRange { value } => write!(
                f,
                "age ({value}) must be within {AGE_MIN}..={AGE_MAX}"
            ),
        }
    }
}

impl Error for UserValidationError {}

/// Validated age in years.
///
/// Serialized as a plain integer; deserialization re-runs validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Age(u8);

impl Age {
    pub fn new(value: i64) -> Result<Self, UserValidationError> {
        if !(AGE_MIN..=AGE_MAX).contains(&value) {
            return Err(UserValidationError::AgeOutOfRange { value });
        }
        // In range, so the narrowing cannot fail.
        u8::try_from(value)
            .map(Self)
            .map_err(|_| UserValidationError::AgeOutOfRange { value })
    }

    pub fn get(self) -> i64 {
        i64::from(self.0)
    }
}

impl TryFrom<i64> for Age {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Age> for i64 {
    fn from(value: Age) -> Self {
        value.get()
    }
}

impl Display for Age {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Card and money fields of a user account.
///
/// Used to complete a partially constructed `User` via `User::with_account`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub credit_card: i64,
    pub balance: f64,
    pub write_offs: f64,
    pub deposit: f64,
}

/// Canonical user account record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: Option<UserId>,
    name: String,
    surname: String,
    age: Age,
    gender: bool,
    credit_card: i64,
    balance: f64,
    write_offs: f64,
    deposit: f64,
}

impl User {
    /// Creates a transient (unpersisted) user.
    ///
    /// Card and money fields start at zero.
    ///
    /// # Errors
    /// - `UserValidationError::AgeOutOfRange` when `age` is outside bounds.
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        age: i64,
        gender: bool,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            id: None,
            name: name.into(),
            surname: surname.into(),
            age: Age::new(age)?,
            gender,
            credit_card: 0,
            balance: 0.0,
            write_offs: 0.0,
            deposit: 0.0,
        })
    }

    /// Creates a user carrying a storage identifier.
    ///
    /// Used by hydration paths that rebuild persisted rows.
    pub fn with_id(
        id: UserId,
        name: impl Into<String>,
        surname: impl Into<String>,
        age: i64,
        gender: bool,
    ) -> Result<Self, UserValidationError> {
        let mut user = Self::new(name, surname, age, gender)?;
        user.id = Some(id);
        Ok(user)
    }

    /// Fills card and money fields, completing a full-field user.
    pub fn with_account(mut self, account: Account) -> Self {
        self.credit_card = account.credit_card;
        self.balance = account.balance;
        self.write_offs = account.write_offs;
        self.deposit = account.deposit;
        self
    }

    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    /// Returns whether this user was loaded from (or written to) storage.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn set_surname(&mut self, surname: impl Into<String>) {
        self.surname = surname.into();
    }

    pub fn age(&self) -> i64 {
        self.age.get()
    }

    /// Replaces the age after validation.
    ///
    /// On error the previous age is kept.
    pub fn set_age(&mut self, age: i64) -> Result<(), UserValidationError> {
        self.age = Age::new(age)?;
        Ok(())
    }

    pub fn gender(&self) -> bool {
        self.gender
    }

    pub fn set_gender(&mut self, gender: bool) {
        self.gender = gender;
    }

    pub fn credit_card(&self) -> i64 {
        self.credit_card
    }

    pub fn set_credit_card(&mut self, credit_card: i64) {
        self.credit_card = credit_card;
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn set_balance(&mut self, balance: f64) {
        self.balance = balance;
    }

    pub fn write_offs(&self) -> f64 {
        self.write_offs
    }

    pub fn set_write_offs(&mut self, write_offs: f64) {
        self.write_offs = write_offs;
    }

    pub fn deposit(&self) -> f64 {
        self.deposit
    }

    pub fn set_deposit(&mut self, deposit: f64) {
        self.deposit = deposit;
    }

    /// Returns card and money fields as one value.
    pub fn account(&self) -> Account {
        Account {
            credit_card: self.credit_card,
            balance: self.balance,
            write_offs: self.write_offs,
            deposit: self.deposit,
        }
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = self
            .id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let gender = if self.gender { "Male" } else { "Female" };

        writeln!(f, "======================= User Details =======================")?;
        writeln!(f, "ID:             {id:<10}")?;
        writeln!(f, "Name:           {:<20}", self.name)?;
        writeln!(f, "Surname:        {:<20}", self.surname)?;
        writeln!(f, "Age:            {:<10}", self.age.get())?;
        writeln!(f, "Gender:         {gender:<10}")?;
        writeln!(f, "Credit card:    {:<20}", self.credit_card)?;
        writeln!(f, "Balance:        ${:<10.2}", self.balance)?;
        writeln!(f, "Write-offs:     ${:<10.2}", self.write_offs)?;
        writeln!(f, "Deposit:        ${:<10.2}", self.deposit)?;
        writeln!(f, "===========================================================")
    }
}
