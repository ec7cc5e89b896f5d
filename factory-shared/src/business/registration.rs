/// User registration workflow
///
/// Registration provisions a complete tenant in one transaction:
///
/// 1. Reject the subject id if a user is already linked to it
/// 2. Pick the initial status from the allow-list
/// 3. Generate ids for every row
/// 4. Create the "Admin" role and its default permissions
/// 5. Create the user and link it to the subject id
/// 6. Create "My Organization" owned by the user, with the user as an Admin member
/// 7. Create the "Administrators" team, with the user as an Admin member
/// 8. Commit
///
/// Any failure rolls the whole transaction back. A concurrent registration
/// for the same subject id loses on the `users_auth` unique key and surfaces
/// as `AlreadyExists`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::allow_list::AllowList;
use super::error::{ServiceError, ServiceResult, StoreResultExt};
use crate::models::{
    Access, Organization, Permission, Role, Team, User, UserProfile, UserStatus,
};
use crate::store::{run_in_transaction, Store, StoreTx};

pub const DEFAULT_ORGANIZATION_NAME: &str = "My Organization";
pub const ADMIN_TEAM_NAME: &str = "Administrators";
pub const ADMIN_ROLE_NAME: &str = "Admin";

/// Permission template granted to the administrator role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPermission {
    pub name: &'static str,
    pub resource: &'static str,
    pub access: Access,
}

pub const DEFAULT_ADMIN_PERMISSIONS: &[DefaultPermission] = &[
    DefaultPermission {
        name: "organization.write",
        resource: "organization",
        access: Access::Write,
    },
    DefaultPermission {
        name: "teams.write",
        resource: "teams",
        access: Access::Write,
    },
    DefaultPermission {
        name: "members.write",
        resource: "members",
        access: Access::Write,
    },
    DefaultPermission {
        name: "roles.write",
        resource: "roles",
        access: Access::Write,
    },
];

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRegistration {
    #[validate(length(min = 1, max = 255, message = "Subject id must be 1-255 characters"))]
    pub auth_id: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default)]
    pub profile: UserProfile,
}

/// Everything created by a successful registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub user: User,
    pub organization: Organization,
    pub team: Team,
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// Ids generated up front for one registration
struct RegistrationIds {
    user: Uuid,
    organization: Uuid,
    team: Uuid,
    role: Uuid,
    permissions: Vec<Uuid>,
}

impl RegistrationIds {
    fn generate() -> Self {
        Self {
            user: Uuid::new_v4(),
            organization: Uuid::new_v4(),
            team: Uuid::new_v4(),
            role: Uuid::new_v4(),
            permissions: DEFAULT_ADMIN_PERMISSIONS
                .iter()
                .map(|_| Uuid::new_v4())
                .collect(),
        }
    }
}

/// Registers a user and provisions their organization atomically
pub async fn register_user(
    store: &dyn Store,
    allow_list: &AllowList,
    input: NewRegistration,
) -> ServiceResult<Registration> {
    input
        .validate()
        .map_err(|e| ServiceError::InvalidArgument(e.to_string()))?;

    let status = allow_list.initial_status(&input.email);

    let registration =
        run_in_transaction(store, move |tx| Box::pin(provision(tx, input, status))).await?;

    tracing::info!(
        user_id = %registration.user.id,
        organization_id = %registration.organization.id,
        status = registration.user.status.as_str(),
        "User registered"
    );

    Ok(registration)
}

async fn provision(
    tx: &mut dyn StoreTx,
    input: NewRegistration,
    status: UserStatus,
) -> ServiceResult<Registration> {
    if tx
        .get_user_by_auth_id(&input.auth_id)
        .await
        .context("look up user")?
        .is_some()
    {
        return Err(ServiceError::already_exists("user"));
    }

    let ids = RegistrationIds::generate();

    let role = Role::new(ids.role, ids.organization, ADMIN_ROLE_NAME);
    tx.create_role(&role).await.context("create admin role")?;

    let mut permissions = Vec::with_capacity(DEFAULT_ADMIN_PERMISSIONS.len());
    for (template, id) in DEFAULT_ADMIN_PERMISSIONS.iter().zip(&ids.permissions) {
        let permission = Permission::new(
            *id,
            ids.organization,
            template.name,
            template.resource,
            template.access,
        );
        tx.create_permission(&permission)
            .await
            .context("create permission")?;
        tx.assign_permission_to_role(role.id, permission.id)
            .await
            .context("assign permission")?;
        permissions.push(permission);
    }

    let user = User::new(ids.user, &input.auth_id, &input.email, status, input.profile);
    tx.create_user(&user).await.context("create user")?;
    tx.link_user_with_auth(user.id, &input.auth_id)
        .await
        .context("link user")?;

    let organization = Organization::new(ids.organization, DEFAULT_ORGANIZATION_NAME, user.id);
    tx.create_organization(&organization)
        .await
        .context("create organization")?;
    tx.add_user_to_organization(organization.id, user.id, role.id)
        .await
        .context("add organization member")?;

    let team = Team::new(ids.team, organization.id, ADMIN_TEAM_NAME);
    tx.create_team(&team).await.context("create admin team")?;
    tx.add_user_to_team(team.id, user.id, role.id)
        .await
        .context("add team member")?;

    Ok(Registration {
        user,
        organization,
        team,
        role,
        permissions,
    })
}
