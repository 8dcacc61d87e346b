//! Session login. Decides who the viewer is; it does not protect any data.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use prestige_core::model::User;
use rand_core::OsRng;
use thiserror::Error;

use crate::config::AdminSettings;

pub const ADMIN_NAME: &str = "Administrator";
pub const ADMIN_EMAIL: &str = "admin@prestige.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
  #[error("email or login is required")]
  MissingIdentifier,
}

/// Resolve a login attempt.
///
/// The configured admin login (typed as either the identifier or the name)
/// with a password matching the admin hash yields the admin. Anything else is
/// a regular user keyed by `identifier`, displayed as `name` or, when that is
/// blank, the part of the identifier before `@`.
pub fn login(
  identifier: &str,
  name: &str,
  password: &str,
  admin: &AdminSettings,
) -> Result<User, LoginError> {
  let identifier = identifier.trim();
  let name = name.trim();
  if identifier.is_empty() {
    return Err(LoginError::MissingIdentifier);
  }

  let claims_admin = identifier == admin.login || name == admin.login;
  if claims_admin
    && let Some(hash) = &admin.password_hash
    && verify_password(password, hash)
  {
    return Ok(User::admin(ADMIN_NAME, ADMIN_EMAIL));
  }

  let display = if name.is_empty() {
    identifier.split('@').next().unwrap_or(identifier)
  } else {
    name
  };
  Ok(User::new(display, identifier))
}

fn verify_password(password: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    tracing::warn!("admin.password_hash is not a valid PHC string");
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// argon2 PHC string for `password`, suitable for `admin.password_hash`.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn admin() -> AdminSettings {
    AdminSettings {
      login:         "admin".into(),
      password_hash: Some(hash_password("tajne").unwrap()),
    }
  }

  #[test]
  fn admin_needs_matching_password() {
    let settings = admin();
    let user = login("admin", "", "tajne", &settings).unwrap();
    assert!(user.is_admin);
    assert_eq!(user.name, ADMIN_NAME);
    assert_eq!(user.email, ADMIN_EMAIL);

    let user = login("jan@acme.com", "admin", "tajne", &settings).unwrap();
    assert!(user.is_admin);

    let user = login("admin", "", "zle", &settings).unwrap();
    assert!(!user.is_admin);
    assert_eq!(user.email, "admin");
  }

  #[test]
  fn no_hash_means_no_admin() {
    let settings = AdminSettings::default();
    let user = login("admin", "", "admin", &settings).unwrap();
    assert!(!user.is_admin);
  }

  #[test]
  fn display_name_prefers_given_name() {
    let settings = AdminSettings::default();
    let user = login("jan@acme.com", "Jan", "x", &settings).unwrap();
    assert_eq!(user, User::new("Jan", "jan@acme.com"));

    let user = login(" ewa@acme.com ", "  ", "x", &settings).unwrap();
    assert_eq!(user, User::new("ewa", "ewa@acme.com"));
  }

  #[test]
  fn blank_identifier_is_rejected() {
    assert_eq!(
      login("  ", "Jan", "x", &AdminSettings::default()),
      Err(LoginError::MissingIdentifier)
    );
  }

  #[test]
  fn garbage_hash_never_verifies() {
    let settings = AdminSettings { login: "admin".into(), password_hash: Some("nope".into()) };
    assert!(!login("admin", "", "nope", &settings).unwrap().is_admin);
  }
}
