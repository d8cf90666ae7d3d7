use crate::{
    auth::{hash_password, verify_password, AuthResponse, SigninRequest, SignupRequest, TokenKeys},
    error::AppError,
    models::{PublicUser, User},
    validation,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;

/// Register a new account and issue its first token.
#[post("/signup")]
pub async fn signup(
    pool: web::Data<PgPool>,
    keys: web::Data<TokenKeys>,
    data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    let email = data.email.as_deref().unwrap_or("");
    let full_name = data.full_name.as_deref().map(str::trim).unwrap_or("");
    let password = data.password.as_deref().unwrap_or("");

    if email.is_empty() || full_name.is_empty() || password.is_empty() {
        return Err(AppError::Validation("All fields are required".into()));
    }
    if !validation::is_valid_email(email) {
        return Err(AppError::Validation("Invalid email format".into()));
    }
    if !validation::is_valid_password(password) {
        return Err(AppError::Validation(
            "Password must be at least 8 characters with one letter, one number, and one special character"
                .into(),
        ));
    }

    let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&**pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password(password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, full_name, password_hash) VALUES ($1, $2, $3) \
         RETURNING id, email, full_name, password_hash, created_at",
    )
    .bind(email)
    .bind(full_name)
    .bind(password_hash)
    .fetch_one(&**pool)
    .await?;

    let token = keys.issue(user.id)?;
    log::info!("user {} registered", user.id);

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User created successfully".into(),
        token,
        user: PublicUser::from(&user),
    }))
}

/// Authenticate an existing account and issue a fresh token.
///
/// Unknown email and wrong password take the same rejection path so the
/// response cannot be used to probe which addresses are registered.
#[post("/signin")]
pub async fn signin(
    pool: web::Data<PgPool>,
    keys: web::Data<TokenKeys>,
    data: web::Json<SigninRequest>,
) -> Result<impl Responder, AppError> {
    let email = data.email.as_deref().unwrap_or("");
    let password = data.password.as_deref().unwrap_or("");

    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("Email and password are required".into()));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, full_name, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(&**pool)
    .await?
    .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.issue(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".into(),
        token,
        user: PublicUser::from(&user),
    }))
}
