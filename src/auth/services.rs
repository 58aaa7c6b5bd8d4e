use tracing::{info, warn};

use super::{
    dto::{present, AuthResponse, LoginRequest, RegisterRequest},
    extractors::AuthUser,
    jwt::JwtKeys,
    password::{verify_password, PasswordField},
    repo::{CreateUserError, UserRepository},
    repo_types::{NewUser, User},
};
use crate::error::AppError;

const EMAIL_TAKEN: &str = "Email already in use.";
const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USER_NOT_FOUND: &str = "User not found";

pub async fn register(
    users: &dyn UserRepository,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let (Some(full_name), Some(email), Some(password)) = (
        present(req.full_name),
        present(req.email),
        present(req.password),
    ) else {
        return Err(AppError::missing_fields());
    };

    if users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict(EMAIL_TAKEN.into()));
    }

    let new_user = NewUser {
        full_name,
        email,
        password_hash: PasswordField::Plain(password).seal()?,
        profile_image_url: present(req.profile_image_url),
    };

    let user = match users.create(new_user).await {
        Ok(u) => u,
        Err(CreateUserError::EmailTaken) => {
            warn!("email registered concurrently");
            return Err(AppError::Conflict(EMAIL_TAKEN.into()));
        }
        Err(CreateUserError::Other(e)) => return Err(e.into()),
    };

    let token = keys.issue(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(AuthResponse {
        id: user.id,
        user,
        token,
    })
}

pub async fn login(
    users: &dyn UserRepository,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
        return Err(AppError::missing_fields());
    };

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    }

    let token = keys.issue(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(AuthResponse {
        id: user.id,
        user,
        token,
    })
}

/// The gate already loaded the caller; a token whose user is gone ends here.
pub fn get_self(auth: AuthUser) -> Result<User, AppError> {
    auth.user.ok_or_else(|| {
        warn!(user_id = %auth.id, "profile requested for unknown user");
        AppError::NotFound(USER_NOT_FOUND.into())
    })
}
