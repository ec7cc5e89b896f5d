/// Service façade
///
/// The entry point used by the transports. Every operation runs in its own
/// transaction and is scoped to the caller, identified by the external-auth
/// subject id. Teams, roles and permissions are resolved through the caller's
/// owned organization; rows belonging to another organization are reported
/// as not found.

use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::allow_list::AllowList;
use super::error::{ServiceError, ServiceResult, StoreResultExt};
use super::registration::{register_user, NewRegistration, Registration};
use crate::auth::Identity;
use crate::models::{
    AddTeamMember, NewPermission, NewRole, NewTeam, Organization, Permission, Role, Team,
    TeamMember, UpdateOrganization, User,
};
use crate::store::{run_in_transaction, Store, StoreTx};

#[derive(Clone)]
pub struct Service {
    store: Arc<dyn Store>,
    allow_list: AllowList,
}

impl Service {
    pub fn new(store: Arc<dyn Store>, allow_list: AllowList) -> Self {
        Self { store, allow_list }
    }

    async fn transact<T, F>(&self, f: F) -> ServiceResult<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t mut dyn StoreTx) -> BoxFuture<'t, ServiceResult<T>> + Send,
    {
        run_in_transaction(self.store.as_ref(), f).await
    }

    // Users

    /// Registers the caller and provisions their organization
    #[instrument(skip(self, identity), fields(auth_id = %identity.auth_id))]
    pub async fn register(&self, identity: &Identity) -> ServiceResult<Registration> {
        let email = require_email(identity)?;
        register_user(
            self.store.as_ref(),
            &self.allow_list,
            NewRegistration {
                auth_id: identity.auth_id.clone(),
                email,
                profile: identity.profile(),
            },
        )
        .await
    }

    /// Records a login and returns the refreshed user
    #[instrument(skip(self))]
    pub async fn login(&self, auth_id: &str) -> ServiceResult<User> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let user = require_user(tx, &auth_id).await?;
                tx.record_login(user.id).await.context("record login")?;
                tx.get_user_by_id(user.id)
                    .await
                    .context("reload user")?
                    .ok_or_else(|| ServiceError::not_found("user"))
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_auth_id(&self, auth_id: &str) -> ServiceResult<Option<User>> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move { tx.get_user_by_auth_id(&auth_id).await.context("get user") })
        })
        .await
    }

    /// Creates a user linked to the caller's subject id, without an organization
    #[instrument(skip(self, identity), fields(auth_id = %identity.auth_id))]
    pub async fn create_user(&self, identity: &Identity) -> ServiceResult<User> {
        let email = require_email(identity)?;
        let input = NewRegistration {
            auth_id: identity.auth_id.clone(),
            email,
            profile: identity.profile(),
        };
        input
            .validate()
            .map_err(|e| ServiceError::InvalidArgument(e.to_string()))?;
        let status = self.allow_list.initial_status(&input.email);

        let user = self
            .transact(move |tx| {
                Box::pin(async move {
                    if tx
                        .get_user_by_auth_id(&input.auth_id)
                        .await
                        .context("look up user")?
                        .is_some()
                    {
                        return Err(ServiceError::already_exists("user"));
                    }
                    let user = User::new(
                        Uuid::new_v4(),
                        &input.auth_id,
                        &input.email,
                        status,
                        input.profile,
                    );
                    tx.create_user(&user).await.context("create user")?;
                    tx.link_user_with_auth(user.id, &input.auth_id)
                        .await
                        .context("link user")?;
                    Ok(user)
                })
            })
            .await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Deletes the caller and their owned organization
    ///
    /// Returns `None` when no user is linked to the subject id.
    #[instrument(skip(self))]
    pub async fn delete_owner(&self, auth_id: &str) -> ServiceResult<Option<User>> {
        let auth_id = auth_id.to_string();
        let deleted = self
            .transact(move |tx| {
                Box::pin(async move {
                    let Some(user) = tx
                        .get_user_by_auth_id(&auth_id)
                        .await
                        .context("look up user")?
                    else {
                        return Ok(None);
                    };

                    if let Some(org) = tx
                        .get_organization_for_owner(user.id)
                        .await
                        .context("look up organization")?
                    {
                        tx.delete_organization(org.id)
                            .await
                            .context("delete organization")?;
                    }
                    tx.delete_user(user.id).await.context("delete user")?;

                    Ok(Some(user))
                })
            })
            .await?;

        if let Some(user) = &deleted {
            tracing::info!(user_id = %user.id, "User and owned organization deleted");
        }
        Ok(deleted)
    }

    // Organization

    #[instrument(skip(self))]
    pub async fn get_organization_for_owner(&self, auth_id: &str) -> ServiceResult<Organization> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| Box::pin(async move { owned_organization(tx, &auth_id).await }))
            .await
    }

    #[instrument(skip(self, changes))]
    pub async fn update_organization(
        &self,
        auth_id: &str,
        changes: UpdateOrganization,
    ) -> ServiceResult<Organization> {
        let changes = changes.normalized();
        changes
            .validate()
            .map_err(|e| ServiceError::InvalidArgument(e.to_string()))?;

        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let mut org = owned_organization(tx, &auth_id).await?;
                org.apply(&changes);
                tx.update_organization(&org)
                    .await
                    .context("update organization")?;
                Ok(org)
            })
        })
        .await
    }

    // Teams

    #[instrument(skip(self))]
    pub async fn list_teams(&self, auth_id: &str) -> ServiceResult<Vec<Team>> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                tx.list_teams(org.id).await.context("list teams")
            })
        })
        .await
    }

    #[instrument(skip(self, input))]
    pub async fn create_team(&self, auth_id: &str, input: NewTeam) -> ServiceResult<Team> {
        let input = input.normalized();
        input
            .validate()
            .map_err(|e| ServiceError::InvalidArgument(e.to_string()))?;

        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                let team = Team::new(Uuid::new_v4(), org.id, &input.name);
                tx.create_team(&team).await.context("create team")?;
                Ok(team)
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_team(&self, auth_id: &str, team_id: Uuid) -> ServiceResult<Team> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                scoped_team(tx, org.id, team_id).await
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_team(&self, auth_id: &str, team_id: Uuid) -> ServiceResult<()> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                let team = scoped_team(tx, org.id, team_id).await?;
                tx.delete_team(team.id).await.context("delete team")?;
                Ok(())
            })
        })
        .await
    }

    /// Adds a user to one of the caller's teams
    ///
    /// A user who is not yet a member of the organization joins it with the
    /// same role.
    #[instrument(skip(self))]
    pub async fn add_user_to_team(
        &self,
        auth_id: &str,
        team_id: Uuid,
        input: AddTeamMember,
    ) -> ServiceResult<TeamMember> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                let team = scoped_team(tx, org.id, team_id).await?;
                let role = scoped_role(tx, org.id, input.role_id).await?;

                if tx
                    .get_user_by_id(input.user_id)
                    .await
                    .context("look up member")?
                    .is_none()
                {
                    return Err(ServiceError::not_found("user"));
                }

                if tx
                    .get_organization_member(org.id, input.user_id)
                    .await
                    .context("look up organization member")?
                    .is_none()
                {
                    tx.add_user_to_organization(org.id, input.user_id, role.id)
                        .await
                        .context("add organization member")?;
                }

                tx.add_user_to_team(team.id, input.user_id, role.id)
                    .await
                    .context("add team member")?;

                tx.list_team_members(team.id)
                    .await
                    .context("list team members")?
                    .into_iter()
                    .find(|member| member.user_id == input.user_id)
                    .ok_or_else(|| ServiceError::not_found("team member"))
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn remove_user_from_team(
        &self,
        auth_id: &str,
        team_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<()> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                let team = scoped_team(tx, org.id, team_id).await?;
                if !tx
                    .remove_user_from_team(team.id, user_id)
                    .await
                    .context("remove team member")?
                {
                    return Err(ServiceError::not_found("team member"));
                }
                Ok(())
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn list_team_members(&self, auth_id: &str, team_id: Uuid) -> ServiceResult<Vec<TeamMember>> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                let team = scoped_team(tx, org.id, team_id).await?;
                tx.list_team_members(team.id)
                    .await
                    .context("list team members")
            })
        })
        .await
    }

    // Roles and permissions

    #[instrument(skip(self))]
    pub async fn list_roles(&self, auth_id: &str) -> ServiceResult<Vec<Role>> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                tx.list_roles(org.id).await.context("list roles")
            })
        })
        .await
    }

    #[instrument(skip(self, input))]
    pub async fn create_role(&self, auth_id: &str, input: NewRole) -> ServiceResult<Role> {
        let input = input.normalized();
        input
            .validate()
            .map_err(|e| ServiceError::InvalidArgument(e.to_string()))?;

        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                let role = Role::new(Uuid::new_v4(), org.id, &input.name);
                tx.create_role(&role).await.context("create role")?;
                Ok(role)
            })
        })
        .await
    }

    #[instrument(skip(self, input))]
    pub async fn create_permission(&self, auth_id: &str, input: NewPermission) -> ServiceResult<Permission> {
        let input = input.normalized();
        input
            .validate()
            .map_err(|e| ServiceError::InvalidArgument(e.to_string()))?;

        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                let permission = Permission::new(
                    Uuid::new_v4(),
                    org.id,
                    &input.name,
                    &input.resource,
                    input.access,
                );
                tx.create_permission(&permission)
                    .await
                    .context("create permission")?;
                Ok(permission)
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn assign_permission(
        &self,
        auth_id: &str,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> ServiceResult<()> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                let role = scoped_role(tx, org.id, role_id).await?;
                let permission = scoped_permission(tx, org.id, permission_id).await?;
                tx.assign_permission_to_role(role.id, permission.id)
                    .await
                    .context("assign permission")
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn revoke_permission(
        &self,
        auth_id: &str,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> ServiceResult<()> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                let role = scoped_role(tx, org.id, role_id).await?;
                if !tx
                    .remove_permission_from_role(role.id, permission_id)
                    .await
                    .context("revoke permission")?
                {
                    return Err(ServiceError::not_found("role permission"));
                }
                Ok(())
            })
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn list_role_permissions(&self, auth_id: &str, role_id: Uuid) -> ServiceResult<Vec<Permission>> {
        let auth_id = auth_id.to_string();
        self.transact(move |tx| {
            Box::pin(async move {
                let org = owned_organization(tx, &auth_id).await?;
                let role = scoped_role(tx, org.id, role_id).await?;
                tx.list_permissions_for_role(role.id)
                    .await
                    .context("list role permissions")
            })
        })
        .await
    }

    pub async fn health_check(&self) -> ServiceResult<()> {
        self.store.health_check().await.context("health check")
    }
}

fn require_email(identity: &Identity) -> ServiceResult<String> {
    identity
        .email
        .clone()
        .ok_or_else(|| ServiceError::Unauthenticated("identity carries no email".to_string()))
}

async fn require_user(tx: &mut dyn StoreTx, auth_id: &str) -> ServiceResult<User> {
    tx.get_user_by_auth_id(auth_id)
        .await
        .context("look up user")?
        .ok_or_else(|| ServiceError::not_found("user"))
}

async fn owned_organization(tx: &mut dyn StoreTx, auth_id: &str) -> ServiceResult<Organization> {
    let user = require_user(tx, auth_id).await?;
    tx.get_organization_for_owner(user.id)
        .await
        .context("look up organization")?
        .ok_or_else(|| ServiceError::not_found("organization"))
}

async fn scoped_team(tx: &mut dyn StoreTx, organization_id: Uuid, team_id: Uuid) -> ServiceResult<Team> {
    tx.get_team(team_id)
        .await
        .context("look up team")?
        .filter(|team| team.organization_id == organization_id)
        .ok_or_else(|| ServiceError::not_found("team"))
}

async fn scoped_role(tx: &mut dyn StoreTx, organization_id: Uuid, role_id: Uuid) -> ServiceResult<Role> {
    tx.get_role(role_id)
        .await
        .context("look up role")?
        .filter(|role| role.organization_id == organization_id)
        .ok_or_else(|| ServiceError::not_found("role"))
}

async fn scoped_permission(
    tx: &mut dyn StoreTx,
    organization_id: Uuid,
    permission_id: Uuid,
) -> ServiceResult<Permission> {
    tx.get_permission(permission_id)
        .await
        .context("look up permission")?
        .filter(|permission| permission.organization_id == organization_id)
        .ok_or_else(|| ServiceError::not_found("permission"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::registration::ADMIN_TEAM_NAME;
    use crate::models::{Access, UserStatus};
    use crate::store::memory::MemoryStore;

    fn service_with(store: MemoryStore) -> Service {
        Service::new(Arc::new(store), AllowList::new(["vip@example.com"]))
    }

    fn identity(auth_id: &str) -> Identity {
        Identity::new(auth_id).with_email(format!("{}@example.com", auth_id))
    }

    #[tokio::test]
    async fn test_register_requires_email() {
        let service = service_with(MemoryStore::new());
        let err = service.register(&Identity::new("anon")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_register_uses_allow_list() {
        let service = service_with(MemoryStore::new());
        let registration = service
            .register(&Identity::new("vip").with_email("VIP@example.com"))
            .await
            .unwrap();
        assert_eq!(registration.user.status, UserStatus::Active);
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_not_found() {
        let service = service_with(MemoryStore::new());
        let err = service.login("nobody").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_login_records_timestamp() {
        let service = service_with(MemoryStore::new());
        let registration = service.register(&identity("alice")).await.unwrap();

        let user = service.login("alice").await.unwrap();
        assert_eq!(user.id, registration.user.id);
        assert!(user.last_login_at >= registration.user.last_login_at);
    }

    #[tokio::test]
    async fn test_delete_owner_cascades_organization() {
        let store = MemoryStore::new();
        let service = service_with(store.clone());
        service.register(&identity("alice")).await.unwrap();

        let deleted = service.delete_owner("alice").await.unwrap();
        assert!(deleted.is_some());

        let err = service.get_organization_for_owner("alice").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(store.counts().await, Default::default());

        assert!(service.delete_owner("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_names_are_invalid() {
        let store = MemoryStore::new();
        let service = service_with(store.clone());
        service.register(&identity("alice")).await.unwrap();
        let before = store.counts().await;

        let err = service
            .create_team("alice", NewTeam { name: "   ".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let err = service
            .create_role("alice", NewRole { name: "\t".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let err = service
            .create_permission(
                "alice",
                NewPermission {
                    name: " ".to_string(),
                    resource: "teams".to_string(),
                    access: Access::Read,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let err = service
            .update_organization(
                "alice",
                UpdateOrganization {
                    name: Some("  ".to_string()),
                    domain: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        assert_eq!(store.counts().await, before);
        let org = service.get_organization_for_owner("alice").await.unwrap();
        assert_eq!(org.name, crate::business::registration::DEFAULT_ORGANIZATION_NAME);
    }

    #[tokio::test]
    async fn test_names_are_stored_trimmed() {
        let service = service_with(MemoryStore::new());
        service.register(&identity("alice")).await.unwrap();

        let team = service
            .create_team("alice", NewTeam { name: "  Platform ".to_string() })
            .await
            .unwrap();
        assert_eq!(team.name, "Platform");

        let org = service
            .update_organization(
                "alice",
                UpdateOrganization {
                    name: Some(" Acme ".to_string()),
                    domain: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(org.name, "Acme");
    }

    #[tokio::test]
    async fn test_create_user_without_organization() {
        let service = service_with(MemoryStore::new());
        let user = service.create_user(&identity("bob")).await.unwrap();
        assert_eq!(user.signup_auth_id, "bob");

        let err = service.create_user(&identity("bob")).await.unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists(_)));

        let err = service.get_organization_for_owner("bob").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        // An organization-less user can still be removed
        assert!(service.delete_owner("bob").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_organization() {
        let service = service_with(MemoryStore::new());
        service.register(&identity("alice")).await.unwrap();

        let org = service
            .update_organization(
                "alice",
                UpdateOrganization {
                    name: Some("Acme".to_string()),
                    domain: Some(Some("acme.io".to_string())),
                },
            )
            .await
            .unwrap();
        assert_eq!(org.name, "Acme");

        let fetched = service.get_organization_for_owner("alice").await.unwrap();
        assert_eq!(fetched.domain.as_deref(), Some("acme.io"));

        let err = service
            .update_organization(
                "alice",
                UpdateOrganization {
                    name: Some(String::new()),
                    domain: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_team_lifecycle() {
        let service = service_with(MemoryStore::new());
        let owner = service.register(&identity("alice")).await.unwrap();
        let member = service.create_user(&identity("bob")).await.unwrap();

        let team = service
            .create_team("alice", NewTeam { name: "Platform".to_string() })
            .await
            .unwrap();
        let err = service
            .create_team("alice", NewTeam { name: "Platform".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists(_)));

        let names: Vec<_> = service
            .list_teams("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert!(names.contains(&ADMIN_TEAM_NAME.to_string()));
        assert!(names.contains(&"Platform".to_string()));

        let added = service
            .add_user_to_team(
                "alice",
                team.id,
                AddTeamMember {
                    user_id: member.id,
                    role_id: owner.role.id,
                },
            )
            .await
            .unwrap();
        assert_eq!(added.user_id, member.id);

        let err = service
            .add_user_to_team(
                "alice",
                team.id,
                AddTeamMember {
                    user_id: member.id,
                    role_id: owner.role.id,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists(_)));

        assert_eq!(service.list_team_members("alice", team.id).await.unwrap().len(), 1);

        service
            .remove_user_from_team("alice", team.id, member.id)
            .await
            .unwrap();
        let err = service
            .remove_user_from_team("alice", team.id, member.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        service.delete_team("alice", team.id).await.unwrap();
        let err = service.get_team("alice", team.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_other_organizations_are_invisible() {
        let service = service_with(MemoryStore::new());
        let alice = service.register(&identity("alice")).await.unwrap();
        service.register(&identity("carol")).await.unwrap();

        let err = service.get_team("carol", alice.team.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = service
            .list_role_permissions("carol", alice.role.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_role_permission_management() {
        let service = service_with(MemoryStore::new());
        service.register(&identity("alice")).await.unwrap();

        let role = service
            .create_role("alice", NewRole { name: "Viewer".to_string() })
            .await
            .unwrap();
        let permission = service
            .create_permission(
                "alice",
                NewPermission {
                    name: "teams.read".to_string(),
                    resource: "teams".to_string(),
                    access: Access::Read,
                },
            )
            .await
            .unwrap();

        service
            .assign_permission("alice", role.id, permission.id)
            .await
            .unwrap();
        let err = service
            .assign_permission("alice", role.id, permission.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists(_)));

        let granted = service.list_role_permissions("alice", role.id).await.unwrap();
        assert_eq!(granted, vec![permission.clone()]);

        assert_eq!(service.list_roles("alice").await.unwrap().len(), 2);

        service
            .revoke_permission("alice", role.id, permission.id)
            .await
            .unwrap();
        assert!(service
            .list_role_permissions("alice", role.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_health_check_reports_store_failure() {
        let store = MemoryStore::new();
        let service = service_with(store.clone());
        assert!(service.health_check().await.is_ok());

        store.fail_on("health_check");
        let err = service.health_check().await.unwrap_err();
        assert!(matches!(err, ServiceError::Internal { .. }));
    }
}
