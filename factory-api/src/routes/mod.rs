/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check and version
/// - `auth`: Registration and login
/// - `users`: The caller's user record
/// - `organization`: The caller's organization
/// - `teams`: Teams and team membership
/// - `roles`: Roles, permissions and grants

pub mod auth;
pub mod health;
pub mod organization;
pub mod roles;
pub mod teams;
pub mod users;
