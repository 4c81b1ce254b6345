use async_trait::async_trait;

use crate::{
    error::StoreError,
    user::{NewUser, User, UserId},
};

/// Storage for users.
///
/// Implementations must enforce that names are unique:
/// [`UserRepository::create`] fails with [`StoreError::DuplicateName`] when the name is taken.
///
/// "Scan order" below means the order in which users were created.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user with a freshly generated id and no connections.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Look up a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;

    /// Look up a user by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    /// All users whose name starts with `prefix`, in scan order.
    /// Case sensitive. The empty prefix matches everyone.
    async fn find_by_name_prefix(&self, prefix: &str) -> Result<Vec<User>, StoreError>;

    /// All users, in scan order.
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;

    /// Replace the stored user having the same id.
    async fn save(&self, user: &User) -> Result<(), StoreError>;

    /// Save several users.
    ///
    /// The default saves them one at a time, so a failure part way leaves
    /// the earlier saves in place. Implementations able to apply all of them
    /// at once should override this.
    async fn save_all(&self, users: &[User]) -> Result<(), StoreError> {
        for user in users {
            self.save(user).await?;
        }

        Ok(())
    }
}
