/// Persistence abstraction
///
/// The store is split in two traits:
///
/// - [`Store`]: the backing database. Its only job is to hand out transactions.
/// - [`StoreTx`]: an explicit transaction handle. Every read and write goes
///   through it, so a multi-step workflow passes the same handle to each step
///   instead of relying on ambient state.
///
/// Lookups that find nothing return `Ok(None)`; `Err` is reserved for real
/// failures. Deletes and updates report whether a row was affected.
///
/// Dropping a `StoreTx` without calling `commit` discards its writes.
///
/// # Implementations
///
/// - [`postgres::PgStore`]: sqlx / PostgreSQL
/// - [`memory::MemoryStore`]: in-process, used by tests and local runs
///
/// # Example
///
/// ```no_run
/// use factory_shared::store::{run_in_transaction, Store, StoreError};
/// use factory_shared::models::User;
///
/// # async fn example(store: &dyn Store) -> Result<Option<User>, StoreError> {
/// let user = run_in_transaction(store, |tx| {
///     Box::pin(async move { tx.get_user_by_auth_id("auth0|123").await })
/// })
/// .await?;
/// # Ok(user)
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::models::{
    Organization, OrganizationMember, Permission, Role, Team, TeamMember, User,
};

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store implementations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Insert would violate a uniqueness rule
    #[error("{entity} already exists: {key}")]
    Duplicate { entity: &'static str, key: String },

    /// Insert references a row that does not exist
    #[error("{entity} with id {id} does not exist")]
    MissingReference { entity: &'static str, id: Uuid },

    /// Delete blocked by a row that still points at the target
    #[error("{entity} with id {id} is still referenced")]
    StillReferenced { entity: &'static str, id: Uuid },

    /// Backend cannot serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn duplicate(entity: &'static str, key: impl ToString) -> Self {
        StoreError::Duplicate {
            entity,
            key: key.to_string(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }
}

/// A backing database able to open transactions
#[async_trait]
pub trait Store: Send + Sync {
    /// Opens a new transaction
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>>;

    /// Verifies the backend is reachable
    async fn health_check(&self) -> StoreResult<()>;
}

/// Transaction-scoped handle exposing every persistence operation
#[async_trait]
pub trait StoreTx: Send {
    // Users

    /// Inserts the user row. The auth link is written by `link_user_with_auth`.
    async fn create_user(&mut self, user: &User) -> StoreResult<()>;
    async fn link_user_with_auth(&mut self, user_id: Uuid, auth_id: &str) -> StoreResult<()>;
    async fn get_user_by_auth_id(&mut self, auth_id: &str) -> StoreResult<Option<User>>;
    async fn get_user_by_id(&mut self, id: Uuid) -> StoreResult<Option<User>>;
    /// Updates email, status and profile
    async fn update_user(&mut self, user: &User) -> StoreResult<bool>;
    async fn record_login(&mut self, user_id: Uuid) -> StoreResult<bool>;
    async fn delete_user(&mut self, id: Uuid) -> StoreResult<bool>;

    // Organizations

    async fn create_organization(&mut self, org: &Organization) -> StoreResult<()>;
    async fn get_organization(&mut self, id: Uuid) -> StoreResult<Option<Organization>>;
    async fn get_organization_for_owner(&mut self, owner_id: Uuid) -> StoreResult<Option<Organization>>;
    async fn update_organization(&mut self, org: &Organization) -> StoreResult<bool>;
    /// Deletes the organization together with its teams, roles, permissions
    /// and memberships
    async fn delete_organization(&mut self, id: Uuid) -> StoreResult<bool>;

    // Teams

    async fn create_team(&mut self, team: &Team) -> StoreResult<()>;
    async fn get_team(&mut self, id: Uuid) -> StoreResult<Option<Team>>;
    async fn list_teams(&mut self, organization_id: Uuid) -> StoreResult<Vec<Team>>;
    async fn update_team(&mut self, team: &Team) -> StoreResult<bool>;
    async fn delete_team(&mut self, id: Uuid) -> StoreResult<bool>;

    // User-Organization relationships

    async fn add_user_to_organization(
        &mut self,
        organization_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
    ) -> StoreResult<()>;
    async fn remove_user_from_organization(&mut self, organization_id: Uuid, user_id: Uuid) -> StoreResult<bool>;
    async fn get_organization_member(
        &mut self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<OrganizationMember>>;
    async fn list_organization_members(&mut self, organization_id: Uuid) -> StoreResult<Vec<OrganizationMember>>;

    // User-Team relationships

    async fn add_user_to_team(&mut self, team_id: Uuid, user_id: Uuid, role_id: Uuid) -> StoreResult<()>;
    async fn remove_user_from_team(&mut self, team_id: Uuid, user_id: Uuid) -> StoreResult<bool>;
    async fn list_team_members(&mut self, team_id: Uuid) -> StoreResult<Vec<TeamMember>>;

    // Roles and permissions

    async fn create_role(&mut self, role: &Role) -> StoreResult<()>;
    async fn get_role(&mut self, id: Uuid) -> StoreResult<Option<Role>>;
    async fn list_roles(&mut self, organization_id: Uuid) -> StoreResult<Vec<Role>>;
    async fn delete_role(&mut self, id: Uuid) -> StoreResult<bool>;

    async fn create_permission(&mut self, permission: &Permission) -> StoreResult<()>;
    async fn get_permission(&mut self, id: Uuid) -> StoreResult<Option<Permission>>;
    async fn list_permissions(&mut self, organization_id: Uuid) -> StoreResult<Vec<Permission>>;
    async fn delete_permission(&mut self, id: Uuid) -> StoreResult<bool>;

    async fn assign_permission_to_role(&mut self, role_id: Uuid, permission_id: Uuid) -> StoreResult<()>;
    async fn remove_permission_from_role(&mut self, role_id: Uuid, permission_id: Uuid) -> StoreResult<bool>;
    async fn list_permissions_for_role(&mut self, role_id: Uuid) -> StoreResult<Vec<Permission>>;

    // Lifecycle

    async fn commit(self: Box<Self>) -> StoreResult<()>;
    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

/// Runs `f` inside one transaction
///
/// Commits when `f` returns `Ok`, rolls back when it returns `Err`. The error
/// type only needs to absorb `StoreError`, so business code can return its own
/// errors from inside the closure.
pub async fn run_in_transaction<T, E, F>(store: &dyn Store, f: F) -> Result<T, E>
where
    T: Send,
    E: From<StoreError> + Send,
    F: for<'t> FnOnce(&'t mut dyn StoreTx) -> BoxFuture<'t, Result<T, E>> + Send,
{
    let mut tx = store.begin().await?;

    match f(tx.as_mut()).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(err)
        }
    }
}
