/// Startup fixtures
///
/// `simple` resets a single well-known owner so a fresh environment always has
/// one registered account to log in with.

use crate::config::Fixture;
use factory_shared::auth::Identity;
use factory_shared::business::{Service, ServiceResult};

pub const PRIMARY_AUTH_ID: &str = "primary";
pub const PRIMARY_EMAIL: &str = "primary@test.com";

pub async fn apply(service: &Service, fixture: Fixture) -> ServiceResult<()> {
    match fixture {
        Fixture::Simple => apply_simple(service).await,
    }
}

async fn apply_simple(service: &Service) -> ServiceResult<()> {
    if service.delete_owner(PRIMARY_AUTH_ID).await?.is_some() {
        tracing::info!(auth_id = PRIMARY_AUTH_ID, "Removed previous fixture owner");
    }

    let registration = service
        .register(&Identity::new(PRIMARY_AUTH_ID).with_email(PRIMARY_EMAIL))
        .await?;

    tracing::info!(
        user_id = %registration.user.id,
        organization_id = %registration.organization.id,
        "Applied simple fixture"
    );
    Ok(())
}
