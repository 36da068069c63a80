// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::UsuarioAutenticado,
    models::usuario::{AuthResponse, LoginPayload},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Autenticación",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token JWT emitido", body = AuthResponse),
        (status = 401, description = "Credenciales inválidas"),
        (status = 403, description = "Usuario desactivado")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(AuthResponse { token })))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Autenticación",
    responses(
        (status = 200, description = "Perfil del usuario autenticado", body = crate::models::usuario::Usuario),
        (status = 401, description = "Token inválido o ausente")
    ),
    security(("bearer_auth" = []))
)]
pub async fn perfil(
    UsuarioAutenticado(usuario): UsuarioAutenticado,
) -> Result<impl IntoResponse, AppError> {
    Ok((StatusCode::OK, Json(usuario)))
}
