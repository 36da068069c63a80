// src/handlers/clientes.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AccesoClientes, RequiereRol},
    models::cliente::{ActualizarClientePayload, Cliente, CrearClientePayload},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ParametrosPagina {
    /// Número de página, partiendo de cero
    #[serde(default)]
    pub pagina: usize,

    /// Cantidad de elementos por página
    #[serde(default = "tamanio_defecto")]
    pub tamanio: usize,
}

fn tamanio_defecto() -> usize {
    20
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParametrosBusqueda {
    /// Texto a buscar en nombre, apellido o email
    pub q: String,

    /// Número de página, partiendo de cero
    #[serde(default)]
    pub pagina: usize,

    /// Cantidad de elementos por página
    #[serde(default = "tamanio_defecto")]
    pub tamanio: usize,
}

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    params(ParametrosPagina),
    responses(
        (status = 200, description = "Página de clientes"),
        (status = 401, description = "No autenticado"),
        (status = 403, description = "Sin rol de acceso a clientes")
    ),
    security(("bearer_auth" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoClientes>,
    Query(params): Query<ParametrosPagina>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = app_state
        .cliente_service
        .listar_paginados(params.pagina, params.tamanio)
        .await?;

    Ok((StatusCode::OK, Json(pagina)))
}

// GET /api/clientes/buscar
#[utoipa::path(
    get,
    path = "/api/clientes/buscar",
    tag = "Clientes",
    params(ParametrosBusqueda),
    responses(
        (status = 200, description = "Página de clientes que coinciden con el texto")
    ),
    security(("bearer_auth" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoClientes>,
    Query(params): Query<ParametrosBusqueda>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = app_state
        .cliente_service
        .buscar_paginados(&params.q, params.pagina, params.tamanio)
        .await?;

    Ok((StatusCode::OK, Json(pagina)))
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID del cliente")),
    responses(
        (status = 200, description = "Cliente encontrado", body = Cliente),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoClientes>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let cliente = app_state.cliente_service.obtener(id).await?;
    Ok((StatusCode::OK, Json(cliente)))
}

// GET /api/clientes/{id}/ventas
#[utoipa::path(
    get,
    path = "/api/clientes/{id}/ventas",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID del cliente")),
    responses(
        (status = 200, description = "Últimas ventas del cliente")
    ),
    security(("bearer_auth" = []))
)]
pub async fn historial_ventas(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoClientes>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // Valida que el cliente exista antes de listar su historial
    app_state.cliente_service.obtener(id).await?;

    let ventas = app_state.venta_service.historial_cliente(id).await?;
    Ok((StatusCode::OK, Json(ventas)))
}

// GET /api/clientes/{id}/estadisticas
#[utoipa::path(
    get,
    path = "/api/clientes/{id}/estadisticas",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID del cliente")),
    responses(
        (status = 200, description = "Compras realizadas y monto acumulado del cliente"),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn estadisticas(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoClientes>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.cliente_service.obtener(id).await?;

    let (compras, total) = app_state.venta_service.estadisticas_cliente(id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "comprasRealizadas": compras,
            "totalCompras": total,
        })),
    ))
}

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = CrearClientePayload,
    responses(
        (status = 201, description = "Cliente creado", body = Cliente),
        (status = 400, description = "RUT inválido o campos con errores"),
        (status = 409, description = "Email duplicado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoClientes>,
    Json(payload): Json<CrearClientePayload>,
) -> Result<impl IntoResponse, AppError> {
    let cliente = app_state.cliente_service.crear(payload).await?;
    Ok((StatusCode::CREATED, Json(cliente)))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID del cliente")),
    request_body = ActualizarClientePayload,
    responses(
        (status = 200, description = "Cliente actualizado", body = Cliente),
        (status = 404, description = "Cliente no encontrado"),
        (status = 409, description = "Email duplicado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoClientes>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarClientePayload>,
) -> Result<impl IntoResponse, AppError> {
    let cliente = app_state.cliente_service.actualizar(id, payload).await?;
    Ok((StatusCode::OK, Json(cliente)))
}

// DELETE /api/clientes/{id}
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID del cliente")),
    responses(
        (status = 204, description = "Cliente eliminado"),
        (status = 404, description = "Cliente no encontrado"),
        (status = 409, description = "El cliente tiene ventas registradas")
    ),
    security(("bearer_auth" = []))
)]
pub async fn eliminar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoClientes>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.cliente_service.eliminar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/clientes/exportar/csv
#[utoipa::path(
    get,
    path = "/api/clientes/exportar/csv",
    tag = "Clientes",
    responses(
        (status = 200, description = "Listado de clientes en CSV", content_type = "text/csv")
    ),
    security(("bearer_auth" = []))
)]
pub async fn exportar_csv(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoClientes>,
) -> Result<impl IntoResponse, AppError> {
    let clientes = app_state.cliente_service.listar().await?;
    let csv = app_state.exportacion_service.csv_clientes(&clientes);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"clientes.csv\"".to_string(),
            ),
        ],
        csv,
    ))
}

// GET /api/clientes/exportar/excel
#[utoipa::path(
    get,
    path = "/api/clientes/exportar/excel",
    tag = "Clientes",
    responses(
        (status = 200, description = "Listado de clientes en Excel",
         content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    ),
    security(("bearer_auth" = []))
)]
pub async fn exportar_excel(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoClientes>,
) -> Result<impl IntoResponse, AppError> {
    let clientes = app_state.cliente_service.listar().await?;
    let excel = app_state.exportacion_service.excel_clientes(&clientes)?;

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"clientes.xlsx\"".to_string(),
            ),
        ],
        excel,
    ))
}

// GET /api/clientes/exportar/pdf
#[utoipa::path(
    get,
    path = "/api/clientes/exportar/pdf",
    tag = "Clientes",
    responses(
        (status = 200, description = "Listado de clientes en PDF", content_type = "application/pdf")
    ),
    security(("bearer_auth" = []))
)]
pub async fn exportar_pdf(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoClientes>,
) -> Result<impl IntoResponse, AppError> {
    let clientes = app_state.cliente_service.listar().await?;
    let pdf = app_state.exportacion_service.pdf_clientes(&clientes).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"clientes.pdf\"".to_string(),
            ),
        ],
        pdf,
    ))
}
