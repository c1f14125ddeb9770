use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod reference;
pub mod reports;
pub mod shift_reports;

/// Succeeds when the user holds at least one of `roles`.
fn ensure_any_role(user: &AuthenticatedUser, roles: &[&str]) -> ServiceResult<()> {
    if roles.iter().any(|role| check_role(role, &user.roles)) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}
