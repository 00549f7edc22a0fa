use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered freelancer account. Never serialized directly; API responses
/// use [`UserProfile`] so the password hash stays out of the wire format.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// The hashed password of the user. (argon2)
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Uses argon2 to verify the password hash against the provided password.
    pub fn verify_password(&self, password: &str) -> bool {
        let hash = match PasswordHash::new(&self.password_hash) {
            Ok(hash) => hash,
            Err(err) => {
                tracing::error!("failed to parse password hash: {}", err);
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    }

    /// Generates a new password hash using argon2.
    pub fn hash_password(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("failed to hash password");

        hash.to_string()
    }

    /// Validates a display name.
    pub fn validate_name(name: &str) -> Result<(), &'static str> {
        if name.trim().is_empty() {
            return Err("Name must not be empty");
        }

        if name.len() > 100 {
            return Err("Name must be at most 100 characters long");
        }

        Ok(())
    }

    /// Validates an email.
    pub fn validate_email(email: &str) -> Result<(), &'static str> {
        if email.len() > 100 {
            return Err("Email must be at most 100 characters long");
        }

        if !email_address::EmailAddress::is_valid(email) {
            return Err("Invalid email address");
        }

        Ok(())
    }

    /// Validates a password.
    pub fn validate_password(password: &str) -> Result<(), &'static str> {
        if password.len() < 8 {
            return Err("Password must be at least 8 characters long");
        }

        if password.len() > 100 {
            return Err("Password must be at most 100 characters long");
        }

        Ok(())
    }
}

/// The public shape of a user, embedded in auth responses and persisted by
/// clients alongside the session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = User::hash_password("hunter2hunter2");
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: hash,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(user.verify_password("hunter2hunter2"));
        assert!(!user.verify_password("hunter2"));
    }

    #[test]
    fn rejects_bad_signup_fields() {
        assert!(User::validate_name("  ").is_err());
        assert!(User::validate_email("not-an-email").is_err());
        assert!(User::validate_email("ada@example.com").is_ok());
        assert!(User::validate_password("short").is_err());
        assert!(User::validate_password("long enough").is_ok());
    }
}
