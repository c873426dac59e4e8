use bcrypt::{hash, verify};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, SignupRequest};
use crate::repositories::{MaintenanceRepository, StoredUser};
use crate::utils::errors::{AppError, AppResult};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthController {
    repository: MaintenanceRepository,
    bcrypt_cost: u32,
}

impl AuthController {
    pub fn new(repository: MaintenanceRepository, bcrypt_cost: u32) -> Self {
        Self { repository, bcrypt_cost }
    }

    pub async fn signup(&self, request: SignupRequest) -> AppResult<StoredUser> {
        // La repetición es opcional, pero si viene debe coincidir
        if let Some(retype) = &request.retype_password {
            if retype != &request.password {
                return Err(AppError::BadRequest("Passwords do not match!".to_string()));
            }
        }
        request.validate()?;

        if self.repository.find_user_by_email(&request.email).await.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash(&request.password, self.bcrypt_cost)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let user = self
            .repository
            .insert_user(&request.name, &request.email, password_hash)
            .await?;
        tracing::info!("👤 Usuario registrado: {}", user.email);
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<StoredUser> {
        let user = self
            .repository
            .find_user_by_email(&request.email)
            .await
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user)
    }
}
