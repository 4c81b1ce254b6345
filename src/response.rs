use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::user::{RegisteredUser, User, UserId};

/// Every HTTP response body, successful or not, has this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    /// Human readable description of the outcome.
    pub message: String,

    /// The payload.
    /// An empty object when there is nothing to return.
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wrap some data.
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

impl Envelope {
    /// A message without data, i.e. with `data` set to `{}`.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self::new(message, Value::Object(Map::new()))
    }
}

impl Envelope<RegisteredUser> {
    /// An example of what registering a user returns.
    pub fn example_registered() -> Self {
        Self::new(
            "User created successfully.",
            RegisteredUser {
                name: "user0".into(),
                uuid: UserId::new(),
            },
        )
    }
}

impl Envelope<Vec<User>> {
    /// An example of an admin listing users.
    pub fn example_listed() -> Self {
        let mut admin = User {
            id: UserId::new(),
            name: "user0".into(),
            is_admin: true,
            connections: vec![],
        };
        let mut regular = User {
            id: UserId::new(),
            name: "user1".into(),
            is_admin: false,
            connections: vec![],
        };

        admin.connect_to(regular.id);
        regular.connect_to(admin.id);

        Self::new("Successfully retrieved list of users", vec![admin, regular])
    }
}
