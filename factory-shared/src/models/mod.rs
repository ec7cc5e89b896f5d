/// Domain models
///
/// Plain data types shared by the store implementations, the business layer
/// and the HTTP adapters. Persistence lives behind `crate::store`.
///
/// # Models
///
/// - `user`: User accounts linked to an external identity
/// - `organization`: Tenants, each owned by one user
/// - `team`: Groups of users inside an organization
/// - `role`: Roles, permissions and access levels
/// - `membership`: Organization and team membership rows

pub mod membership;
pub mod organization;
pub mod role;
pub mod team;
pub mod user;

pub use membership::{AddTeamMember, OrganizationMember, TeamMember};
pub use organization::{Organization, UpdateOrganization};
pub use role::{Access, NewPermission, NewRole, Permission, Role};
pub use team::{NewTeam, Team};
pub use user::{User, UserProfile, UserStatus};
