/// Business logic
///
/// # Modules
///
/// - `registration`: The atomic tenant provisioning workflow
/// - `service`: `Service`, the façade the transports call
/// - `allow_list`: Emails activated at signup
/// - `error`: `ServiceError` and store error wrapping

pub mod allow_list;
pub mod error;
pub mod registration;
pub mod service;

pub use allow_list::AllowList;
pub use error::{ServiceError, ServiceResult, StoreResultExt};
pub use registration::{register_user, NewRegistration, Registration};
pub use service::Service;
