/// In-process store
///
/// Keeps every table in a `MemoryState` behind an async mutex. A transaction
/// takes the lock for its whole lifetime and works on a private copy; `commit`
/// publishes the copy, dropping or rolling back throws it away. Transactions are
/// therefore fully serialized, which is the strictest isolation the Postgres
/// store can offer.
///
/// Uniqueness and reference checks mirror the SQL schema so that business
/// code behaves the same against both backends. The one exception is the
/// role/permission → organization reference, which Postgres checks at commit
/// time and this store does not check at all.
///
/// # Failure injection
///
/// `fail_on("create_organization")` makes every later call to that operation
/// return `StoreError::Unavailable`, which lets tests exercise rollback paths.
///
/// # Example
///
/// ```
/// use factory_shared::store::memory::MemoryStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = MemoryStore::new();
/// assert_eq!(store.counts().await.users, 0);
/// # }
/// ```

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, StoreTx};
use crate::models::{
    Organization, OrganizationMember, Permission, Role, Team, TeamMember, User,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    auth_links: HashMap<String, Uuid>,
    organizations: HashMap<Uuid, Organization>,
    teams: HashMap<Uuid, Team>,
    roles: HashMap<Uuid, Role>,
    permissions: HashMap<Uuid, Permission>,
    role_permissions: BTreeSet<(Uuid, Uuid)>,
    organization_members: HashMap<(Uuid, Uuid), OrganizationMember>,
    team_members: HashMap<(Uuid, Uuid), TeamMember>,
}

/// Row counts per table, for assertions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryCounts {
    pub users: usize,
    pub auth_links: usize,
    pub organizations: usize,
    pub teams: usize,
    pub roles: usize,
    pub permissions: usize,
    pub role_permissions: usize,
    pub organization_members: usize,
    pub team_members: usize,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    failures: Arc<StdMutex<HashSet<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call of `operation` fail
    pub fn fail_on(&self, operation: &str) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(operation.to_string());
        }
    }

    /// Committed row counts. Waits for any open transaction to finish.
    pub async fn counts(&self) -> MemoryCounts {
        let state = self.state.lock().await;
        MemoryCounts {
            users: state.users.len(),
            auth_links: state.auth_links.len(),
            organizations: state.organizations.len(),
            teams: state.teams.len(),
            roles: state.roles.len(),
            permissions: state.permissions.len(),
            role_permissions: state.role_permissions.len(),
            organization_members: state.organization_members.len(),
            team_members: state.team_members.len(),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        let tx = MemoryTx {
            guard,
            working,
            failures: self.failures.clone(),
        };
        tx.check("begin")?;
        Ok(Box::new(tx))
    }

    async fn health_check(&self) -> StoreResult<()> {
        let failing = self
            .failures
            .lock()
            .map(|failures| failures.contains("health_check"))
            .unwrap_or(false);
        if failing {
            return Err(StoreError::Unavailable("injected failure in health_check".to_string()));
        }
        Ok(())
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    failures: Arc<StdMutex<HashSet<String>>>,
}

impl MemoryTx {
    fn check(&self, operation: &str) -> StoreResult<()> {
        let failing = self
            .failures
            .lock()
            .map(|failures| failures.contains(operation))
            .unwrap_or(false);
        if failing {
            return Err(StoreError::Unavailable(format!("injected failure in {}", operation)));
        }
        Ok(())
    }

    fn require_user(&self, id: Uuid) -> StoreResult<()> {
        if !self.working.users.contains_key(&id) {
            return Err(StoreError::MissingReference { entity: "users", id });
        }
        Ok(())
    }

    fn require_role(&self, id: Uuid) -> StoreResult<()> {
        if !self.working.roles.contains_key(&id) {
            return Err(StoreError::MissingReference { entity: "roles", id });
        }
        Ok(())
    }

    /// A user is only visible once linked to an auth id
    fn linked_user(&self, id: Uuid) -> Option<User> {
        let auth_id = self
            .working
            .auth_links
            .iter()
            .find(|(_, user_id)| **user_id == id)
            .map(|(auth_id, _)| auth_id.clone())?;
        self.working.users.get(&id).map(|user| User {
            signup_auth_id: auth_id,
            ..user.clone()
        })
    }

    fn drop_role_dependents(&mut self, role_id: Uuid) {
        let state = &mut self.working;
        state.role_permissions.retain(|(role, _)| *role != role_id);
        state.organization_members.retain(|_, m| m.role_id != role_id);
        state.team_members.retain(|_, m| m.role_id != role_id);
    }
}

fn sorted_by_creation<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(key);
    items
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn create_user(&mut self, user: &User) -> StoreResult<()> {
        self.check("create_user")?;
        if self.working.users.contains_key(&user.id) {
            return Err(StoreError::duplicate("user", user.id));
        }
        self.working.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn link_user_with_auth(&mut self, user_id: Uuid, auth_id: &str) -> StoreResult<()> {
        self.check("link_user_with_auth")?;
        self.require_user(user_id)?;
        if self.working.auth_links.contains_key(auth_id) {
            return Err(StoreError::duplicate("user auth link", auth_id));
        }
        if self.working.auth_links.values().any(|id| *id == user_id) {
            return Err(StoreError::duplicate("user auth link", user_id));
        }
        self.working.auth_links.insert(auth_id.to_string(), user_id);
        Ok(())
    }

    async fn get_user_by_auth_id(&mut self, auth_id: &str) -> StoreResult<Option<User>> {
        self.check("get_user_by_auth_id")?;
        let Some(user_id) = self.working.auth_links.get(auth_id).copied() else {
            return Ok(None);
        };
        Ok(self.linked_user(user_id))
    }

    async fn get_user_by_id(&mut self, id: Uuid) -> StoreResult<Option<User>> {
        self.check("get_user_by_id")?;
        Ok(self.linked_user(id))
    }

    async fn update_user(&mut self, user: &User) -> StoreResult<bool> {
        self.check("update_user")?;
        match self.working.users.get_mut(&user.id) {
            Some(existing) => {
                existing.email = user.email.clone();
                existing.status = user.status;
                existing.profile = user.profile.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_login(&mut self, user_id: Uuid) -> StoreResult<bool> {
        self.check("record_login")?;
        match self.working.users.get_mut(&user_id) {
            Some(existing) => {
                existing.last_login_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&mut self, id: Uuid) -> StoreResult<bool> {
        self.check("delete_user")?;
        if self.working.organizations.values().any(|org| org.owner_id == id) {
            return Err(StoreError::StillReferenced { entity: "users", id });
        }
        let state = &mut self.working;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        state.auth_links.retain(|_, user_id| *user_id != id);
        state.organization_members.retain(|(_, user_id), _| *user_id != id);
        state.team_members.retain(|(_, user_id), _| *user_id != id);
        Ok(true)
    }

    async fn create_organization(&mut self, org: &Organization) -> StoreResult<()> {
        self.check("create_organization")?;
        self.require_user(org.owner_id)?;
        if self.working.organizations.contains_key(&org.id) {
            return Err(StoreError::duplicate("organization", org.id));
        }
        if self.working.organizations.values().any(|o| o.owner_id == org.owner_id) {
            return Err(StoreError::duplicate("organization owner", org.owner_id));
        }
        self.working.organizations.insert(org.id, org.clone());
        Ok(())
    }

    async fn get_organization(&mut self, id: Uuid) -> StoreResult<Option<Organization>> {
        self.check("get_organization")?;
        Ok(self.working.organizations.get(&id).cloned())
    }

    async fn get_organization_for_owner(&mut self, owner_id: Uuid) -> StoreResult<Option<Organization>> {
        self.check("get_organization_for_owner")?;
        Ok(self
            .working
            .organizations
            .values()
            .find(|org| org.owner_id == owner_id)
            .cloned())
    }

    async fn update_organization(&mut self, org: &Organization) -> StoreResult<bool> {
        self.check("update_organization")?;
        match self.working.organizations.get_mut(&org.id) {
            Some(existing) => {
                existing.name = org.name.clone();
                existing.domain = org.domain.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_organization(&mut self, id: Uuid) -> StoreResult<bool> {
        self.check("delete_organization")?;
        let state = &mut self.working;
        if state.organizations.remove(&id).is_none() {
            return Ok(false);
        }

        let team_ids: HashSet<Uuid> = state
            .teams
            .values()
            .filter(|team| team.organization_id == id)
            .map(|team| team.id)
            .collect();
        let role_ids: HashSet<Uuid> = state
            .roles
            .values()
            .filter(|role| role.organization_id == id)
            .map(|role| role.id)
            .collect();
        let permission_ids: HashSet<Uuid> = state
            .permissions
            .values()
            .filter(|permission| permission.organization_id == id)
            .map(|permission| permission.id)
            .collect();

        state.team_members.retain(|(team_id, _), m| {
            !team_ids.contains(team_id) && !role_ids.contains(&m.role_id)
        });
        state.organization_members.retain(|(org_id, _), m| {
            *org_id != id && !role_ids.contains(&m.role_id)
        });
        state.role_permissions.retain(|(role_id, permission_id)| {
            !role_ids.contains(role_id) && !permission_ids.contains(permission_id)
        });
        state.teams.retain(|team_id, _| !team_ids.contains(team_id));
        state.roles.retain(|role_id, _| !role_ids.contains(role_id));
        state.permissions.retain(|permission_id, _| !permission_ids.contains(permission_id));
        Ok(true)
    }

    async fn create_team(&mut self, team: &Team) -> StoreResult<()> {
        self.check("create_team")?;
        if !self.working.organizations.contains_key(&team.organization_id) {
            return Err(StoreError::MissingReference {
                entity: "organizations",
                id: team.organization_id,
            });
        }
        if self.working.teams.contains_key(&team.id) {
            return Err(StoreError::duplicate("team", team.id));
        }
        if self
            .working
            .teams
            .values()
            .any(|t| t.organization_id == team.organization_id && t.name == team.name)
        {
            return Err(StoreError::duplicate("team", &team.name));
        }
        self.working.teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn get_team(&mut self, id: Uuid) -> StoreResult<Option<Team>> {
        self.check("get_team")?;
        Ok(self.working.teams.get(&id).cloned())
    }

    async fn list_teams(&mut self, organization_id: Uuid) -> StoreResult<Vec<Team>> {
        self.check("list_teams")?;
        let teams = self
            .working
            .teams
            .values()
            .filter(|team| team.organization_id == organization_id)
            .cloned()
            .collect();
        Ok(sorted_by_creation(teams, |t: &Team| (t.created_at, t.name.clone())))
    }

    async fn update_team(&mut self, team: &Team) -> StoreResult<bool> {
        self.check("update_team")?;
        let clash = self.working.teams.values().any(|t| {
            t.id != team.id && t.organization_id == team.organization_id && t.name == team.name
        });
        if clash {
            return Err(StoreError::duplicate("team", &team.name));
        }
        match self.working.teams.get_mut(&team.id) {
            Some(existing) => {
                existing.name = team.name.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_team(&mut self, id: Uuid) -> StoreResult<bool> {
        self.check("delete_team")?;
        if self.working.teams.remove(&id).is_none() {
            return Ok(false);
        }
        self.working.team_members.retain(|(team_id, _), _| *team_id != id);
        Ok(true)
    }

    async fn add_user_to_organization(
        &mut self,
        organization_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
    ) -> StoreResult<()> {
        self.check("add_user_to_organization")?;
        if !self.working.organizations.contains_key(&organization_id) {
            return Err(StoreError::MissingReference {
                entity: "organizations",
                id: organization_id,
            });
        }
        self.require_user(user_id)?;
        self.require_role(role_id)?;
        if self.working.organization_members.contains_key(&(organization_id, user_id)) {
            return Err(StoreError::duplicate("organization member", user_id));
        }
        self.working.organization_members.insert(
            (organization_id, user_id),
            OrganizationMember {
                organization_id,
                user_id,
                role_id,
                joined_at: chrono::Utc::now(),
            },
        );
        Ok(())
    }

    async fn remove_user_from_organization(&mut self, organization_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        self.check("remove_user_from_organization")?;
        Ok(self
            .working
            .organization_members
            .remove(&(organization_id, user_id))
            .is_some())
    }

    async fn get_organization_member(
        &mut self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<OrganizationMember>> {
        self.check("get_organization_member")?;
        Ok(self
            .working
            .organization_members
            .get(&(organization_id, user_id))
            .cloned())
    }

    async fn list_organization_members(&mut self, organization_id: Uuid) -> StoreResult<Vec<OrganizationMember>> {
        self.check("list_organization_members")?;
        let members = self
            .working
            .organization_members
            .values()
            .filter(|m| m.organization_id == organization_id)
            .cloned()
            .collect();
        Ok(sorted_by_creation(members, |m: &OrganizationMember| (m.joined_at, m.user_id)))
    }

    async fn add_user_to_team(&mut self, team_id: Uuid, user_id: Uuid, role_id: Uuid) -> StoreResult<()> {
        self.check("add_user_to_team")?;
        if !self.working.teams.contains_key(&team_id) {
            return Err(StoreError::MissingReference { entity: "teams", id: team_id });
        }
        self.require_user(user_id)?;
        self.require_role(role_id)?;
        if self.working.team_members.contains_key(&(team_id, user_id)) {
            return Err(StoreError::duplicate("team member", user_id));
        }
        self.working.team_members.insert(
            (team_id, user_id),
            TeamMember {
                team_id,
                user_id,
                role_id,
                joined_at: chrono::Utc::now(),
            },
        );
        Ok(())
    }

    async fn remove_user_from_team(&mut self, team_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        self.check("remove_user_from_team")?;
        Ok(self.working.team_members.remove(&(team_id, user_id)).is_some())
    }

    async fn list_team_members(&mut self, team_id: Uuid) -> StoreResult<Vec<TeamMember>> {
        self.check("list_team_members")?;
        let members = self
            .working
            .team_members
            .values()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect();
        Ok(sorted_by_creation(members, |m: &TeamMember| (m.joined_at, m.user_id)))
    }

    async fn create_role(&mut self, role: &Role) -> StoreResult<()> {
        self.check("create_role")?;
        if self.working.roles.contains_key(&role.id) {
            return Err(StoreError::duplicate("role", role.id));
        }
        self.working.roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn get_role(&mut self, id: Uuid) -> StoreResult<Option<Role>> {
        self.check("get_role")?;
        Ok(self.working.roles.get(&id).cloned())
    }

    async fn list_roles(&mut self, organization_id: Uuid) -> StoreResult<Vec<Role>> {
        self.check("list_roles")?;
        let roles = self
            .working
            .roles
            .values()
            .filter(|role| role.organization_id == organization_id)
            .cloned()
            .collect();
        Ok(sorted_by_creation(roles, |r: &Role| (r.created_at, r.name.clone())))
    }

    async fn delete_role(&mut self, id: Uuid) -> StoreResult<bool> {
        self.check("delete_role")?;
        if self.working.roles.remove(&id).is_none() {
            return Ok(false);
        }
        self.drop_role_dependents(id);
        Ok(true)
    }

    async fn create_permission(&mut self, permission: &Permission) -> StoreResult<()> {
        self.check("create_permission")?;
        if self.working.permissions.contains_key(&permission.id) {
            return Err(StoreError::duplicate("permission", permission.id));
        }
        self.working.permissions.insert(permission.id, permission.clone());
        Ok(())
    }

    async fn get_permission(&mut self, id: Uuid) -> StoreResult<Option<Permission>> {
        self.check("get_permission")?;
        Ok(self.working.permissions.get(&id).cloned())
    }

    async fn list_permissions(&mut self, organization_id: Uuid) -> StoreResult<Vec<Permission>> {
        self.check("list_permissions")?;
        let permissions = self
            .working
            .permissions
            .values()
            .filter(|p| p.organization_id == organization_id)
            .cloned()
            .collect();
        Ok(sorted_by_creation(permissions, |p: &Permission| p.name.clone()))
    }

    async fn delete_permission(&mut self, id: Uuid) -> StoreResult<bool> {
        self.check("delete_permission")?;
        if self.working.permissions.remove(&id).is_none() {
            return Ok(false);
        }
        self.working
            .role_permissions
            .retain(|(_, permission_id)| *permission_id != id);
        Ok(true)
    }

    async fn assign_permission_to_role(&mut self, role_id: Uuid, permission_id: Uuid) -> StoreResult<()> {
        self.check("assign_permission_to_role")?;
        self.require_role(role_id)?;
        if !self.working.permissions.contains_key(&permission_id) {
            return Err(StoreError::MissingReference {
                entity: "permissions",
                id: permission_id,
            });
        }
        if !self.working.role_permissions.insert((role_id, permission_id)) {
            return Err(StoreError::duplicate("role permission", permission_id));
        }
        Ok(())
    }

    async fn remove_permission_from_role(&mut self, role_id: Uuid, permission_id: Uuid) -> StoreResult<bool> {
        self.check("remove_permission_from_role")?;
        Ok(self.working.role_permissions.remove(&(role_id, permission_id)))
    }

    async fn list_permissions_for_role(&mut self, role_id: Uuid) -> StoreResult<Vec<Permission>> {
        self.check("list_permissions_for_role")?;
        let permissions = self
            .working
            .role_permissions
            .iter()
            .filter(|(role, _)| *role == role_id)
            .filter_map(|(_, permission_id)| self.working.permissions.get(permission_id).cloned())
            .collect();
        Ok(sorted_by_creation(permissions, |p: &Permission| p.name.clone()))
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.check("commit")?;
        let MemoryTx {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}
