// src/handlers/roles.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::UsuarioAutenticado,
        rbac::{RequiereRol, SoloAdmin},
    },
    models::rol::{ActualizarRolPayload, CrearRolPayload, Rol, RolVista},
};

// GET /api/roles
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "Roles",
    responses(
        (status = 200, description = "Listado de roles con sus permisos", body = [Rol]),
        (status = 403, description = "Solo ADMIN")
    ),
    security(("bearer_auth" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
) -> Result<impl IntoResponse, AppError> {
    let roles = app_state.rol_service.listar().await?;
    Ok((StatusCode::OK, Json(roles)))
}

// GET /api/roles/{nombre}
// La consulta queda registrada en la auditoría de vistas.
#[utoipa::path(
    get,
    path = "/api/roles/{nombre}",
    tag = "Roles",
    params(("nombre" = String, Path, description = "Nombre del rol")),
    responses(
        (status = 200, description = "Rol encontrado", body = Rol),
        (status = 404, description = "Rol no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
    _guard: RequiereRol<SoloAdmin>,
    Path(nombre): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rol = app_state.rol_service.obtener(&nombre, &usuario.username).await?;
    Ok((StatusCode::OK, Json(rol)))
}

// POST /api/roles
#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "Roles",
    request_body = CrearRolPayload,
    responses(
        (status = 201, description = "Rol creado", body = Rol),
        (status = 409, description = "Nombre duplicado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
    Json(payload): Json<CrearRolPayload>,
) -> Result<impl IntoResponse, AppError> {
    let rol = app_state.rol_service.crear(payload).await?;
    Ok((StatusCode::CREATED, Json(rol)))
}

// PUT /api/roles/{nombre}
#[utoipa::path(
    put,
    path = "/api/roles/{nombre}",
    tag = "Roles",
    params(("nombre" = String, Path, description = "Nombre del rol")),
    request_body = ActualizarRolPayload,
    responses(
        (status = 200, description = "Rol actualizado", body = Rol),
        (status = 404, description = "Rol no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
    Path(nombre): Path<String>,
    Json(payload): Json<ActualizarRolPayload>,
) -> Result<impl IntoResponse, AppError> {
    let rol = app_state.rol_service.actualizar(&nombre, payload).await?;
    Ok((StatusCode::OK, Json(rol)))
}

// DELETE /api/roles/{nombre}
#[utoipa::path(
    delete,
    path = "/api/roles/{nombre}",
    tag = "Roles",
    params(("nombre" = String, Path, description = "Nombre del rol")),
    responses(
        (status = 204, description = "Rol eliminado"),
        (status = 404, description = "Rol no encontrado"),
        (status = 409, description = "Rol en uso o rol ADMIN")
    ),
    security(("bearer_auth" = []))
)]
pub async fn eliminar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
    Path(nombre): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.rol_service.eliminar(&nombre).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/roles/{nombre}/vistas
#[utoipa::path(
    get,
    path = "/api/roles/{nombre}/vistas",
    tag = "Roles",
    params(("nombre" = String, Path, description = "Nombre del rol")),
    responses(
        (status = 200, description = "Últimas consultas registradas sobre el rol", body = [RolVista]),
        (status = 404, description = "Rol no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn historial_vistas(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
    Path(nombre): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let vistas = app_state.rol_service.historial_vistas(&nombre).await?;
    Ok((StatusCode::OK, Json(vistas)))
}
