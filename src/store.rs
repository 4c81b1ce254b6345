use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    error::StoreError,
    repository::UserRepository,
    user::{NewUser, User, UserId},
};

/// Keeps users in memory, in the order they were created.
///
/// If a snapshot path is given, all users are written to that file (as RON)
/// after every change, and read back when the store is opened.
/// A change is only kept if its snapshot was written.
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
    snapshot: Option<PathBuf>,
}

impl UserStore {
    /// A store which only lives in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A store backed by a snapshot file.
    /// A missing file means an empty store; the file is created on the first change.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let users = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => ron::from_str::<Vec<User>>(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(?path, "No snapshot yet, starting empty");
                vec![]
            }
            Err(e) => return Err(e.into()),
        };

        check_unique(&users)?;

        info!(?path, users = users.len(), "User store opened");

        Ok(Self {
            users: RwLock::new(users),
            snapshot: Some(path),
        })
    }

    async fn persist(&self, users: &[User]) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        let contents = ron::ser::to_string_pretty(users, ron::ser::PrettyConfig::default())?;

        // Write next to the target, then rename over it,
        // so a crash never leaves a half written snapshot.
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, path).await?;

        Ok(())
    }

    /// Apply `change` to the users, keeping the result only if it can be persisted.
    async fn write_with<T, F>(&self, change: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Vec<User>) -> Result<T, StoreError> + Send,
        T: Send,
    {
        let mut users = self.users.write().await;

        let mut updated = users.clone();
        let outcome = change(&mut updated)?;

        if let Err(e) = self.persist(&updated).await {
            warn!("Snapshot write failed, change discarded: {e}");
            return Err(e);
        }

        *users = updated;

        Ok(outcome)
    }
}

/// A snapshot edited by hand (or written by something else) might not hold
/// up the guarantees the store gives, so check them.
fn check_unique(users: &[User]) -> Result<(), StoreError> {
    let mut names = HashSet::new();
    let mut ids = HashSet::new();

    for user in users {
        if !names.insert(user.name.as_str()) {
            return Err(StoreError::CorruptSnapshot(format!(
                "the name `{}` is used more than once",
                user.name
            )));
        }
        if !ids.insert(user.id) {
            return Err(StoreError::CorruptSnapshot(format!(
                "the id `{}` is used more than once",
                user.id
            )));
        }
    }

    Ok(())
}

fn replace(users: &mut [User], user: &User) -> Result<(), StoreError> {
    let stored = users
        .iter_mut()
        .find(|stored| stored.id == user.id)
        .ok_or(StoreError::UnknownUser(user.id))?;

    *stored = user.clone();

    Ok(())
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.write_with(|users| {
            if users.iter().any(|user| user.name == new_user.name) {
                return Err(StoreError::DuplicateName(new_user.name));
            }

            let user = User::from_new(new_user);
            users.push(user.clone());

            Ok(user)
        })
        .await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;

        Ok(users.iter().find(|user| &user.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;

        Ok(users.iter().find(|user| user.name == name).cloned())
    }

    async fn find_by_name_prefix(&self, prefix: &str) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;

        Ok(users
            .iter()
            .filter(|user| user.name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.clone())
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        self.write_with(|users| replace(users, user)).await
    }

    async fn save_all(&self, to_save: &[User]) -> Result<(), StoreError> {
        self.write_with(|users| {
            for user in to_save {
                replace(users, user)?;
            }

            Ok(())
        })
        .await
    }
}
