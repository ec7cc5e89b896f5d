/// Caller identity
///
/// Token verification happens upstream: an identity gateway authenticates the
/// request and forwards the verified claims as headers. This module only
/// reads those headers.
///
/// # Modules
///
/// - `identity`: The `Identity` claims and their axum extractor

pub mod identity;

pub use identity::{Identity, IdentityRejection};
