use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest},
        jwt::JwtKeys,
        password::{check_password, hash_password, INVALID_CREDENTIALS},
        repo::UserRepo,
        repo_types::{NewUser, Role, User},
    },
    error::{AppError, AppResult},
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(users: &dyn UserRepo, req: RegisterRequest) -> AppResult<User> {
    let name = req.name.trim();
    let email = normalize_email(&req.email);

    if name.is_empty() || email.is_empty() || req.password.is_empty() || req.role.trim().is_empty()
    {
        return Err(AppError::validation(
            "name, email, password and role are required",
        ));
    }
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation("Password too short"));
    }
    let role: Role = req
        .role
        .parse()
        .map_err(|_| AppError::validation("Role must be student or tutor"))?;

    if users.find_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&req.password)?;
    let user = users
        .create(NewUser {
            name: name.to_string(),
            email: email.clone(),
            role,
            password_hash,
        })
        .await?
        .ok_or_else(|| {
            warn!(%email, "email registered concurrently");
            AppError::Conflict("Email already registered".into())
        })?;

    info!(user_id = %user.id, email = %user.email, role = %user.role, "user registered");
    Ok(user)
}

pub async fn login(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    req: LoginRequest,
) -> AppResult<LoginResponse> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::validation("email and password are required"));
    }

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    };

    check_password(&req.password, &user.password_hash).inspect_err(|_| {
        warn!(%email, user_id = %user.id, "login rejected");
    })?;

    let token = keys.sign(user.id, user.role)?;
    info!(user_id = %user.id, "user logged in");
    Ok(LoginResponse {
        token,
        user: user.into(),
    })
}

pub async fn me(users: &dyn UserRepo, user_id: Uuid) -> AppResult<PublicUser> {
    users
        .find_by_id(user_id)
        .await?
        .map(PublicUser::from)
        .ok_or_else(|| AppError::Auth("User not found".into()))
}
