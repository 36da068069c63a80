// src/handlers/configuracion.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::UsuarioAutenticado,
        rbac::{RequiereRol, SoloAdmin},
    },
    models::configuracion::{ActualizarConfiguracionPayload, ConfiguracionSistema},
};

// GET /api/configuracion
#[utoipa::path(
    get,
    path = "/api/configuracion",
    tag = "Configuración",
    responses(
        (status = 200, description = "Configuración vigente del sistema", body = ConfiguracionSistema),
        (status = 403, description = "Solo ADMIN")
    ),
    security(("bearer_auth" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
) -> Result<impl IntoResponse, AppError> {
    let config = app_state.configuracion_service.obtener().await?;
    Ok((StatusCode::OK, Json(config)))
}

// PUT /api/configuracion
#[utoipa::path(
    put,
    path = "/api/configuracion",
    tag = "Configuración",
    request_body = ActualizarConfiguracionPayload,
    responses(
        (status = 200, description = "Configuración actualizada", body = ConfiguracionSistema),
        (status = 400, description = "Campos con errores")
    ),
    security(("bearer_auth" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
    _guard: RequiereRol<SoloAdmin>,
    Json(payload): Json<ActualizarConfiguracionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let config = app_state
        .configuracion_service
        .actualizar(payload, &usuario.username)
        .await?;

    Ok((StatusCode::OK, Json(config)))
}
