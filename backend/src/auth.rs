use log::info;
use thiserror::Error;

use crate::db::Storage;
use crate::error::StoreError;
use crate::models::{NewUser, Role, User};
use crate::store::Store;
use crate::validation::{validate_signup, SignupForm, ValidationErrors};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with email {0} already exists")]
    DuplicateEmail(String),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validates the form, creates the account and starts a session for it.
///
/// The duplicate-email check and the insert are two separate reads of the
/// collection; see `Store` for the single-writer assumption this relies on.
pub fn signup<S: Storage>(store: &mut Store<S>, form: SignupForm) -> Result<User, AuthError> {
    validate_signup(&form)?;
    let email = form.email.trim().to_string();
    if store.get_user_by_email(&email)?.is_some() {
        return Err(AuthError::DuplicateEmail(email));
    }

    // validate_signup guarantees the role is present
    let role = form.role.unwrap_or(Role::Tenant);
    let mut new = NewUser::new(form.name.trim(), email, form.password, role);
    new.phone = form.phone;

    let user = store.create_user(new)?;
    store.set_session_user(&user)?;
    info!("New {} account: {}", user.role, user.email);
    Ok(user)
}

pub fn login<S: Storage>(
    store: &mut Store<S>,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = store.get_user_by_email(email)?
        .filter(|u| u.password == password)
        .ok_or(AuthError::InvalidCredentials)?;
    store.set_session_user(&user)?;
    info!("Authenticated user: {}", user.id);
    Ok(user)
}

pub fn logout<S: Storage>(store: &mut Store<S>) -> Result<(), StoreError> {
    store.clear_session()
}

pub fn current_user<S: Storage>(store: &Store<S>) -> Result<Option<User>, StoreError> {
    store.session_user()
}

pub fn has_role(user: &User, role: Role) -> bool {
    user.role == role
}

pub fn has_any_role(user: &User, roles: &[Role]) -> bool {
    roles.contains(&user.role)
}
