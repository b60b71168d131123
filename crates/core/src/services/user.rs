//! User account service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use kidvid_common::{AppError, AppResult};
use kidvid_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::services::verification::VerificationService;

/// User account service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    verifier: VerificationService,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 64))]
    pub nickname: Option<String>,

    pub avatar_url: Option<String>,

    pub background_url: Option<String>,

    #[validate(length(max = 512))]
    pub signature: Option<String>,

    /// Emailed verification code; checked when present.
    pub verification_code: Option<String>,
}

/// Input for updating a user. Every profile field is overwritten; the
/// password only changes when a new non-empty one is supplied.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 64))]
    pub nickname: Option<String>,

    pub avatar_url: Option<String>,

    pub background_url: Option<String>,

    #[validate(length(max = 512))]
    pub signature: Option<String>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository, verifier: VerificationService) -> Self {
        Self {
            user_repo,
            verifier,
        }
    }

    /// Register a new user.
    ///
    /// Username and email must be unused. When a verification code is
    /// supplied it must match one issued for the given email.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        input.validate()?;

        if self.user_repo.exists_by_username(&input.username).await? {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        if let Some(ref email) = input.email
            && self.user_repo.exists_by_email(email).await?
        {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        if let Some(ref code) = input.verification_code {
            let Some(ref email) = input.email else {
                return Err(AppError::BadRequest(
                    "Verification code supplied without an email".to_string(),
                ));
            };
            if !self.verifier.verify(email, code).await? {
                return Err(AppError::BadRequest(
                    "Invalid or expired verification code".to_string(),
                ));
            }
        }

        let password_hash = hash_password(&input.password)?;
        let now = chrono::Utc::now();

        let model = user::ActiveModel {
            username: Set(input.username),
            password: Set(password_hash),
            email: Set(input.email),
            nickname: Set(input.nickname),
            avatar_url: Set(input.avatar_url),
            background_url: Set(input.background_url),
            signature: Set(input.signature),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        self.user_repo.create(model).await
    }

    /// Log in with a username or an email.
    ///
    /// Tries the account string as a username first, then as an email.
    /// Returns `Ok(None)` on any mismatch instead of raising.
    pub async fn login(&self, account: &str, password: &str) -> AppResult<Option<user::Model>> {
        if let Some(user) = self.user_repo.find_by_username(account).await?
            && verify_password(password, &user.password)?
        {
            return Ok(Some(user));
        }

        if let Some(user) = self.user_repo.find_by_email(account).await?
            && verify_password(password, &user.password)?
        {
            return Ok(Some(user));
        }

        Ok(None)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: i64) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_username(username).await
    }

    /// Find a user by nickname.
    pub async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_nickname(nickname).await
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_email(email).await
    }

    /// Get all users.
    pub async fn list_all(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all().await
    }

    /// Update a user, overwriting every profile field.
    ///
    /// Username uniqueness is re-checked only when the username changes.
    pub async fn update(&self, id: i64, input: UpdateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(id).await?;

        if input.username != user.username
            && self.user_repo.exists_by_username(&input.username).await?
        {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let mut active: user::ActiveModel = user.into();
        active.username = Set(input.username);
        active.email = Set(input.email);
        active.nickname = Set(input.nickname);
        active.avatar_url = Set(input.avatar_url);
        active.background_url = Set(input.background_url);
        active.signature = Set(input.signature);

        if let Some(password) = input.password
            && !password.is_empty()
        {
            active.password = Set(hash_password(&password)?);
        }

        active.updated_at = Set(chrono::Utc::now().into());

        self.user_repo.update(active).await
    }

    /// Delete a user.
    ///
    /// Comments, likes and watch history stay behind; the comment read path
    /// substitutes placeholder author fields.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.user_repo.get_by_id(id).await?;
        self.user_repo.delete(id).await
    }

    /// Check if a username is already taken.
    pub async fn is_username_exists(&self, username: &str) -> AppResult<bool> {
        self.user_repo.exists_by_username(username).await
    }

    /// Check if a nickname is already taken.
    pub async fn is_nickname_exists(&self, nickname: &str) -> AppResult<bool> {
        self.user_repo.exists_by_nickname(nickname).await
    }

    /// Check if an email is already registered.
    pub async fn is_email_exists(&self, email: &str) -> AppResult<bool> {
        self.user_repo.exists_by_email(email).await
    }

    /// Change a user's password after verifying the emailed code.
    ///
    /// Returns `Ok(false)` when the email is unknown or the code does not
    /// verify; the code is invalidated only after a successful change.
    pub async fn change_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> AppResult<bool> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            return Ok(false);
        };

        if !self.verifier.verify(email, code).await? {
            return Ok(false);
        }

        let mut active: user::ActiveModel = user.into();
        active.password = Set(hash_password(new_password)?);
        active.updated_at = Set(chrono::Utc::now().into());
        self.user_repo.update(active).await?;

        self.verifier.invalidate(email).await?;

        Ok(true)
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
