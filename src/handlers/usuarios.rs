// src/handlers/usuarios.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{RequiereRol, SoloAdmin},
    models::usuario::{
        ActualizarUsuarioPayload, AsignarRolesPayload, CambiarPasswordPayload,
        CrearUsuarioPayload, Usuario,
    },
};

// GET /api/usuarios
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuarios",
    responses(
        (status = 200, description = "Listado de usuarios con sus roles", body = [Usuario]),
        (status = 403, description = "Solo ADMIN")
    ),
    security(("bearer_auth" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
) -> Result<impl IntoResponse, AppError> {
    let usuarios = app_state.usuario_service.listar().await?;
    Ok((StatusCode::OK, Json(usuarios)))
}

// GET /api/usuarios/{id}
#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID del usuario")),
    responses(
        (status = 200, description = "Usuario encontrado", body = Usuario),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = app_state.usuario_service.obtener(id).await?;
    Ok((StatusCode::OK, Json(usuario)))
}

// POST /api/usuarios
#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Usuarios",
    request_body = CrearUsuarioPayload,
    responses(
        (status = 201, description = "Usuario creado", body = Usuario),
        (status = 409, description = "Username o email duplicado, o rol inexistente")
    ),
    security(("bearer_auth" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
    Json(payload): Json<CrearUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = app_state.usuario_service.crear(payload).await?;
    Ok((StatusCode::CREATED, Json(usuario)))
}

// PUT /api/usuarios/{id}
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID del usuario")),
    request_body = ActualizarUsuarioPayload,
    responses(
        (status = 200, description = "Usuario actualizado", body = Usuario),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = app_state.usuario_service.actualizar(id, payload).await?;
    Ok((StatusCode::OK, Json(usuario)))
}

// POST /api/usuarios/{id}/password
#[utoipa::path(
    post,
    path = "/api/usuarios/{id}/password",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID del usuario")),
    request_body = CambiarPasswordPayload,
    responses(
        (status = 204, description = "Contraseña cambiada"),
        (status = 400, description = "Las contraseñas no coinciden"),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cambiar_password(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CambiarPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.usuario_service.cambiar_password(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/usuarios/{id}/activar
#[utoipa::path(
    post,
    path = "/api/usuarios/{id}/activar",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID del usuario")),
    responses(
        (status = 204, description = "Usuario activado"),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn activar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.usuario_service.cambiar_estado(id, true).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/usuarios/{id}/desactivar
#[utoipa::path(
    post,
    path = "/api/usuarios/{id}/desactivar",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID del usuario")),
    responses(
        (status = 204, description = "Usuario desactivado; sus tokens dejan de servir"),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn desactivar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.usuario_service.cambiar_estado(id, false).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/usuarios/{id}/roles
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}/roles",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID del usuario")),
    request_body = AsignarRolesPayload,
    responses(
        (status = 200, description = "Roles reemplazados", body = Usuario),
        (status = 409, description = "Algún rol no existe")
    ),
    security(("bearer_auth" = []))
)]
pub async fn asignar_roles(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AsignarRolesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = app_state.usuario_service.asignar_roles(id, payload).await?;
    Ok((StatusCode::OK, Json(usuario)))
}

// GET /api/usuarios/exportar/csv
#[utoipa::path(
    get,
    path = "/api/usuarios/exportar/csv",
    tag = "Usuarios",
    responses(
        (status = 200, description = "Listado de usuarios en CSV", content_type = "text/csv")
    ),
    security(("bearer_auth" = []))
)]
pub async fn exportar_csv(
    State(app_state): State<AppState>,
    _guard: RequiereRol<SoloAdmin>,
) -> Result<impl IntoResponse, AppError> {
    let usuarios = app_state.usuario_service.listar().await?;
    let csv = app_state.exportacion_service.csv_usuarios(&usuarios);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"usuarios.csv\"".to_string(),
            ),
        ],
        csv,
    ))
}
