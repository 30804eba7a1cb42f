// src/handlers/auth.rs
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::jwt::sign_token;
use crate::dtos::user::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UserResponse};
use crate::dtos::Envelope;
use crate::error::AppError;
use crate::handlers::map_unique_violation;
use crate::middleware::auth::AuthContext;
use crate::models::user::User;
use crate::state::AppState;

// Credential failures share one message so responses never reveal whether
// the email exists.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn jwt_secret() -> Result<String, AppError> {
    std::env::var("JWT_SECRET").map_err(|_| AppError::internal("JWT secret not configured"))
}

// POST /api/auth/register
pub async fn register(
    State(AppState { db_pool }): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<AuthResponse>>), AppError> {
    // Basic validation
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Name required"));
    }
    if !payload.email.contains('@') || !payload.email.contains('.') {
        return Err(AppError::validation("A valid email is required"));
    }
    if payload.password.len() < 6 {
        return Err(AppError::validation("Password must be at least 6 characters"));
    }

    let password_hash = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))?;

    let id = Uuid::new_v4().to_string();
    let name = payload.name.trim().to_string();

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&name)
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(Utc::now())
    .execute(&db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "User already exists with this email"))?;

    let token = sign_token(&id, &name, &payload.email, &jwt_secret()?)?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            AuthResponse {
                token,
                user: UserResponse { id, name, email: payload.email },
            },
            "User registered successfully",
        )),
    ))
}

// POST /api/auth/login
pub async fn login(
    State(AppState { db_pool }): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Envelope<AuthResponse>>, AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::validation("Email required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("Password required"));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(&payload.email)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

    let ok = verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;

    if !ok {
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = sign_token(&user.id, &user.name, &user.email, &jwt_secret()?)?;

    Ok(Json(Envelope::with_message(
        AuthResponse {
            token,
            user: UserResponse { id: user.id, name: user.name, email: user.email },
        },
        "Login successful",
    )))
}

// GET /api/auth/profile - full profile for the id in AuthContext
pub async fn profile(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Envelope<ProfileResponse>>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE id = ?",
    )
    .bind(&auth.user_id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(Envelope::new(ProfileResponse::from(user))))
}
