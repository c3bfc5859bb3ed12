//! User service for authentication and account management
//!
//! Password hashing and verification run on the blocking thread pool so
//! argon2 work never stalls the async runtime.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::UserRepository;
use sqlx::PgPool;
use uuid::Uuid;
use validator::ValidateEmail;
use vitatrack_shared::models::Gender;
use vitatrack_shared::types::{AuthTokens, UserProfile};

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user and issue a token pair
    pub async fn register(
        pool: &PgPool,
        jwt: &JwtService,
        email: &str,
        password: &str,
        gender: Option<&str>,
    ) -> Result<AuthTokens, ApiError> {
        if !email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }

        if password.len() < 8 {
            return Err(ApiError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if let Some(g) = gender {
            if g.parse::<Gender>().is_err() {
                return Err(ApiError::Validation(
                    "Gender must be 'male' or 'female'".to_string(),
                ));
            }
        }

        if UserRepository::find_by_email(pool, email)
            .await
            .map_err(ApiError::Internal)?
            .is_some()
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_owned = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || PasswordService::hash(&password_owned))
            .await
            .map_err(|e| ApiError::Internal(e.into()))?
            .map_err(ApiError::Internal)?;

        let user = UserRepository::create(pool, email, &password_hash, gender)
            .await
            .map_err(ApiError::Internal)?;

        Self::issue_tokens(jwt, user.id)
    }

    /// Authenticate by email and password
    pub async fn login(
        pool: &PgPool,
        jwt: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, ApiError> {
        let user = UserRepository::find_by_email(pool, email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        let password_owned = password.to_string();
        let hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || PasswordService::verify(&password_owned, &hash))
            .await
            .map_err(|e| ApiError::Internal(e.into()))?
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        Self::issue_tokens(jwt, user.id)
    }

    /// Exchange a refresh token for a fresh token pair
    pub async fn refresh(
        pool: &PgPool,
        jwt: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let claims = jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

        let user_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

        // Reject tokens for users that no longer exist
        UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid refresh token".to_string()))?;

        Self::issue_tokens(jwt, user_id)
    }

    /// Load the authenticated user's profile
    pub async fn profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(UserProfile {
            id: user.id.to_string(),
            email: user.email,
            gender: user.gender,
            created_at: user.created_at,
        })
    }

    /// The user's stored gender, if any, parsed for analysis functions
    pub async fn gender(pool: &PgPool, user_id: Uuid) -> Result<Option<Gender>, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(user.gender.as_deref().and_then(|g| g.parse().ok()))
    }

    fn issue_tokens(jwt: &JwtService, user_id: Uuid) -> Result<AuthTokens, ApiError> {
        let access_token = jwt
            .generate_access_token(user_id)
            .map_err(ApiError::Internal)?;
        let refresh_token = jwt
            .generate_refresh_token(user_id)
            .map_err(ApiError::Internal)?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt.access_token_expiry_secs(),
        })
    }
}
