use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a user.
/// Generated when the user registers and never changes afterwards.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// A fresh, random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// A user as stored in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's id.
    #[serde(rename = "uuid")]
    pub id: UserId,

    /// The user's name, unique across the directory.
    pub name: String,

    /// Admins may list all users.
    #[serde(default)]
    pub is_admin: bool,

    /// Ids of users this user has connected with, in the order the connections were made.
    /// May hold the same id more than once.
    #[serde(default)]
    pub connections: Vec<UserId>,
}

impl User {
    pub(crate) fn from_new(new_user: NewUser) -> Self {
        Self {
            id: UserId::new(),
            name: new_user.name,
            is_admin: new_user.is_admin,
            connections: vec![],
        }
    }

    pub(crate) fn connect_to(&mut self, other: UserId) {
        self.connections.push(other);
    }
}

impl Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// What is needed to create a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// The requested name.
    pub name: String,

    /// Whether the user should be an admin.
    pub is_admin: bool,
}

/// What a successful registration reveals about the new user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    /// The name, as registered.
    pub name: String,

    /// The generated id.
    pub uuid: UserId,
}

impl From<&User> for RegisteredUser {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            uuid: user.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_field_names() {
        let user = User::from_new(NewUser {
            name: "user0".into(),
            is_admin: true,
        });

        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["uuid"], user.id.to_string());
        assert_eq!(json["name"], "user0");
        assert_eq!(json["isAdmin"], true);
        assert!(json["connections"].as_array().unwrap().is_empty());
    }

    #[test]
    fn id_parses_its_own_display() {
        let id = UserId::new();

        assert_eq!(id.to_string().parse::<UserId>().unwrap(), id);
    }

    #[test]
    fn garbage_is_not_an_id() {
        assert!("not-a-uuid".parse::<UserId>().is_err());
    }
}
