use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Helper,
    Tutor,
    User,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Owner, Role::Admin, Role::Helper, Role::Tutor, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Helper => "helper",
            Role::Tutor => "tutor",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "helper" => Ok(Role::Helper),
            "tutor" => Ok(Role::Tutor),
            "user" => Ok(Role::User),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Frozen,
    Deleted,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Frozen => "frozen",
            Status::Deleted => "deleted",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Status::Active),
            "frozen" => Ok(Status::Frozen),
            "deleted" => Ok(Status::Deleted),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Persisted identity record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque id, assigned by the store on creation and never reassigned
    pub id: String,
    /// Unique, case-sensitive login
    pub login: String,
    /// Credential as supplied at registration (see `auth::credentials`)
    pub password: String,
    pub name: String,
    /// Organizational unit the user belongs to
    pub filial: String,
    pub role: Role,
    pub status: Status,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

/// A user that has passed validation but has no id or status yet
///
/// Only the user store turns a draft into a `User`, inside the critical
/// section that also checks login uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub login: String,
    pub password: String,
    pub name: String,
    pub filial: String,
    pub role: Role,
}

impl NewUser {
    pub fn into_user(self, id: String) -> User {
        User {
            id,
            login: self.login,
            password: self.password,
            name: self.name,
            filial: self.filial,
            role: self.role,
            status: Status::Active,
        }
    }
}

/// Outward shape of a user; never carries the password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub login: String,
    pub name: String,
    pub filial: String,
    pub role: Role,
    pub status: Status,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            login: user.login.clone(),
            name: user.name.clone(),
            filial: user.filial.clone(),
            role: user.role,
            status: user.status,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login: user.login,
            name: user.name,
            filial: user.filial,
            role: user.role,
            status: user.status,
        }
    }
}
