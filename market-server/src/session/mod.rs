//! Session / identity store
//!
//! Holds the current identity (at most one) and the registered accounts.
//! Mutated only by explicit signup / login / logout; the cart engine reads
//! the current identity and never writes it.
//!
//! Passwords are argon2-hashed at signup and verified at login; plaintext
//! never reaches storage.

use serde::{Deserialize, Serialize};
use shared::models::{Identity, Role};
use shared::util;
use shared::{AppError, AppResult};

use crate::db::MarketStorage;

/// Server-side identity record: public identity plus credential hash
///
/// The hash never serializes out through the API; only storage sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRecord {
    #[serde(flatten)]
    pub identity: Identity,
    pub hash_pass: String,
}

impl IdentityRecord {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

/// Session store over persisted identity state
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: MarketStorage,
}

impl SessionStore {
    pub fn new(storage: MarketStorage) -> Self {
        Self { storage }
    }

    /// Register a new identity and log it in
    ///
    /// Always succeeds for a well-formed profile; duplicate emails are
    /// allowed and disambiguated at login by registration order.
    pub fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> AppResult<Identity> {
        let hash_pass = IdentityRecord::hash_password(password)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

        let record = IdentityRecord {
            identity: Identity {
                id: util::new_id(role.as_str()),
                name: name.to_string(),
                email: email.to_string(),
                role,
            },
            hash_pass,
        };

        let txn = self.storage.begin_write()?;
        self.storage.store_identity(&txn, &record)?;
        txn.commit().map_err(crate::db::StorageError::from)?;

        self.storage.set_current_identity(&record.identity)?;

        tracing::info!(
            identity_id = %record.identity.id,
            role = %role,
            "Identity registered"
        );
        Ok(record.identity)
    }

    /// Authenticate and set the current identity
    ///
    /// Unknown email and wrong password fail identically so accounts cannot
    /// be enumerated.
    pub fn login(&self, email: &str, password: &str, role: Role) -> AppResult<Identity> {
        let record = self
            .storage
            .find_identity(email, role)?
            .ok_or(AppError::InvalidCredentials)?;

        let password_valid = record
            .verify_password(password)
            .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

        if !password_valid {
            tracing::warn!(email = %email, "Login failed - invalid credentials");
            return Err(AppError::InvalidCredentials);
        }

        self.storage.set_current_identity(&record.identity)?;
        tracing::info!(identity_id = %record.identity.id, "Identity logged in");
        Ok(record.identity)
    }

    /// Clear the current identity
    pub fn logout(&self) -> AppResult<()> {
        self.storage.clear_current_identity()?;
        tracing::info!("Identity logged out");
        Ok(())
    }

    /// Read the current identity, if any
    pub fn current(&self) -> AppResult<Option<Identity>> {
        Ok(self.storage.get_current_identity()?)
    }
}
