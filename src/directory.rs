//! The user directory.
//!
//! Holds no state of its own apart from the repository it was given,
//! so any [`UserRepository`] can back it.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    error::Error,
    repository::UserRepository,
    user::{NewUser, RegisteredUser, User, UserId},
};

/// Registers, searches, connects and lists users.
pub struct UserDirectory {
    repository: Arc<dyn UserRepository>,

    // Connecting reads two users and writes them back.
    // Two connects touching the same user must not interleave or one append is lost.
    connect_lock: Mutex<()>,
}

impl UserDirectory {
    /// A directory on top of the given storage.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            repository,
            connect_lock: Mutex::new(()),
        }
    }

    /// Look up the user making a request.
    pub async fn requester(&self, id: &UserId) -> Result<User, Error> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::requester_not_found(id.to_string()))
    }

    /// Register a new user.
    ///
    /// The name is required. Uniqueness is left to the repository,
    /// so two racing registrations of the same name cannot both succeed.
    pub async fn register(
        &self,
        name: Option<String>,
        is_admin: bool,
    ) -> Result<RegisteredUser, Error> {
        let name = match name {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(Error::Validation(
                    "Please supply at least the user's name".into(),
                ))
            }
        };

        let user = self.repository.create(NewUser { name, is_admin }).await?;
        info!(%user, admin = user.is_admin, "Registered");

        Ok(RegisteredUser::from(&user))
    }

    /// Names of users starting with `filter`, leaving out the requester.
    ///
    /// The requester is left out by name, not by id.
    pub async fn search(
        &self,
        requester: &UserId,
        filter: Option<&str>,
    ) -> Result<Vec<String>, Error> {
        let requester = self.requester(requester).await?;
        let filter = filter.unwrap_or_default();

        let names = self
            .repository
            .find_by_name_prefix(filter)
            .await?
            .into_iter()
            .map(|user| user.name)
            .filter(|name| name != &requester.name)
            .collect::<Vec<_>>();

        debug!(%requester, %filter, hits = names.len(), "Search");

        Ok(names)
    }

    /// Connect the requester with the user named `target_name`.
    ///
    /// Each side gets the other's id appended to its connections.
    /// Both users are saved in one batch.
    /// Returns the names of the requester and the target, in that order.
    pub async fn connect(
        &self,
        requester: &UserId,
        target_name: &str,
    ) -> Result<(String, String), Error> {
        let _guard = self.connect_lock.lock().await;

        let mut requester = self.requester(requester).await?;
        let mut target = self
            .repository
            .find_by_name(target_name)
            .await?
            .ok_or_else(|| Error::target_not_found(target_name))?;

        if requester.id == target.id {
            // Same record: both directions land on it.
            requester.connect_to(requester.id);
            requester.connect_to(requester.id);
            self.repository.save(&requester).await?;
        } else {
            requester.connect_to(target.id);
            target.connect_to(requester.id);
            self.repository
                .save_all(&[requester.clone(), target.clone()])
                .await?;
        }

        info!(%requester, %target, "Connected");

        Ok((requester.name, target.name))
    }

    /// Every user with full details.
    /// Only admins may do this.
    pub async fn list(&self, requester: &UserId) -> Result<Vec<User>, Error> {
        let requester = self.requester(requester).await?;

        if !requester.is_admin {
            info!(%requester, "Refused listing users, not an admin");
            return Err(Error::Unauthorized(requester.name));
        }

        let users = self.repository.list_all().await?;
        debug!(%requester, users = users.len(), "Listing users");

        Ok(users)
    }
}
