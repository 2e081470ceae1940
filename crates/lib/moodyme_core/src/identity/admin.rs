//! Operator account setup: create a new ADMIN account or promote an
//! existing one.

use thiserror::Error;
use tracing::info;

use super::{IdentityError, IdentityProvider};
use crate::models::user::{Identity, NewUser, Role};
use crate::validation;

#[derive(Debug, Error)]
pub enum AdminSetupError {
    #[error("{0}")]
    Validation(String),

    #[error("No account found for {0}")]
    UnknownEmail(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Validate and create a new account with the ADMIN role.
pub async fn create_admin(
    identity: &dyn IdentityProvider,
    user: NewUser,
) -> Result<Identity, AdminSetupError> {
    let user = NewUser {
        email: user.email.trim().to_string(),
        role: Some(Role::Admin),
        ..user
    };
    validation::into_result(validation::new_user_errors(&user))
        .map_err(AdminSetupError::Validation)?;

    let created = identity.create_user(&user).await?;
    info!(uid = %created.id, email = %created.email, "admin account created");
    Ok(created)
}

/// Give an existing account the ADMIN role, keeping its names.
pub async fn grant_admin(
    identity: &dyn IdentityProvider,
    email: &str,
) -> Result<Identity, AdminSetupError> {
    let current = identity
        .get_by_email(email)
        .await?
        .ok_or_else(|| AdminSetupError::UnknownEmail(email.to_string()))?;
    if current.role.is_admin() {
        return Ok(current);
    }

    identity
        .set_claims(&current.id, &current.claims().with_role(Role::Admin))
        .await?;
    info!(uid = %current.id, email = %current.email, "admin role granted");
    identity
        .get_by_id(&current.id)
        .await?
        .ok_or(AdminSetupError::Identity(IdentityError::UserNotFound))
}

/// Promote the account if it exists, otherwise create it.
pub async fn ensure_admin(
    identity: &dyn IdentityProvider,
    user: NewUser,
) -> Result<Identity, AdminSetupError> {
    if identity.get_by_email(&user.email).await?.is_some() {
        return grant_admin(identity, &user.email).await;
    }
    create_admin(identity, user).await
}
