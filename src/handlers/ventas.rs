// src/handlers/ventas.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::clientes::ParametrosPagina,
    middleware::{
        auth::UsuarioAutenticado,
        rbac::{AccesoVentas, RequiereRol},
    },
    models::venta::{CrearVentaPayload, VentaConDetalles},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParametrosRango {
    /// Fecha inicial del rango, formato YYYY-MM-DD
    pub desde: NaiveDate,

    /// Fecha final del rango, formato YYYY-MM-DD
    pub hasta: NaiveDate,
}

// GET /api/ventas
#[utoipa::path(
    get,
    path = "/api/ventas",
    tag = "Ventas",
    params(ParametrosPagina),
    responses(
        (status = 200, description = "Página de ventas con nombres resueltos"),
        (status = 403, description = "Sin rol de acceso a ventas")
    ),
    security(("bearer_auth" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoVentas>,
    Query(params): Query<ParametrosPagina>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = app_state
        .venta_service
        .listar_paginadas(params.pagina, params.tamanio)
        .await?;

    Ok((StatusCode::OK, Json(pagina)))
}

// GET /api/ventas/rango
#[utoipa::path(
    get,
    path = "/api/ventas/rango",
    tag = "Ventas",
    params(ParametrosRango),
    responses(
        (status = 200, description = "Ventas dentro del rango de fechas")
    ),
    security(("bearer_auth" = []))
)]
pub async fn listar_por_rango(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoVentas>,
    Query(params): Query<ParametrosRango>,
) -> Result<impl IntoResponse, AppError> {
    let ventas = app_state
        .venta_service
        .buscar_por_rango(params.desde, params.hasta)
        .await?;

    Ok((StatusCode::OK, Json(ventas)))
}

// GET /api/ventas/{id}
#[utoipa::path(
    get,
    path = "/api/ventas/{id}",
    tag = "Ventas",
    params(("id" = Uuid, Path, description = "ID de la venta")),
    responses(
        (status = 200, description = "Venta con sus líneas", body = VentaConDetalles),
        (status = 404, description = "Venta no encontrada")
    ),
    security(("bearer_auth" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoVentas>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let venta = app_state.venta_service.obtener(id).await?;
    Ok((StatusCode::OK, Json(venta)))
}

// POST /api/ventas
#[utoipa::path(
    post,
    path = "/api/ventas",
    tag = "Ventas",
    request_body = CrearVentaPayload,
    responses(
        (status = 201, description = "Venta registrada con stock descontado", body = VentaConDetalles),
        (status = 400, description = "Stock insuficiente o detalles inválidos"),
        (status = 404, description = "Cliente o producto inexistente")
    ),
    security(("bearer_auth" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    UsuarioAutenticado(usuario): UsuarioAutenticado,
    _guard: RequiereRol<AccesoVentas>,
    Json(payload): Json<CrearVentaPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Valida que el cliente exista antes de tocar el stock
    app_state.cliente_service.obtener(payload.cliente_id).await?;

    let venta = app_state.venta_service.crear(usuario.id, payload).await?;
    Ok((StatusCode::CREATED, Json(venta)))
}

// POST /api/ventas/{id}/anular
#[utoipa::path(
    post,
    path = "/api/ventas/{id}/anular",
    tag = "Ventas",
    params(("id" = Uuid, Path, description = "ID de la venta")),
    responses(
        (status = 204, description = "Venta anulada y stock restaurado"),
        (status = 404, description = "Venta no encontrada"),
        (status = 409, description = "La venta ya estaba anulada")
    ),
    security(("bearer_auth" = []))
)]
pub async fn anular(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoVentas>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.venta_service.anular(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/ventas/{id}/comprobante
#[utoipa::path(
    get,
    path = "/api/ventas/{id}/comprobante",
    tag = "Ventas",
    params(("id" = Uuid, Path, description = "ID de la venta")),
    responses(
        (status = 200, description = "Comprobante de la venta en PDF", content_type = "application/pdf"),
        (status = 404, description = "Venta no encontrada")
    ),
    security(("bearer_auth" = []))
)]
pub async fn comprobante(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoVentas>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let venta = app_state.venta_service.obtener(id).await?;
    let pdf = app_state.exportacion_service.pdf_comprobante(&venta).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"venta-{}.pdf\"", id),
            ),
        ],
        pdf,
    ))
}

// GET /api/ventas/exportar/excel
#[utoipa::path(
    get,
    path = "/api/ventas/exportar/excel",
    tag = "Ventas",
    params(ParametrosRango),
    responses(
        (status = 200, description = "Ventas del rango en Excel",
         content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    ),
    security(("bearer_auth" = []))
)]
pub async fn exportar_excel(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoVentas>,
    Query(params): Query<ParametrosRango>,
) -> Result<impl IntoResponse, AppError> {
    let ventas = app_state
        .venta_service
        .buscar_por_rango(params.desde, params.hasta)
        .await?;
    let excel = app_state.exportacion_service.excel_ventas(&ventas)?;

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ventas.xlsx\"".to_string(),
            ),
        ],
        excel,
    ))
}

// GET /api/ventas/exportar/pdf
#[utoipa::path(
    get,
    path = "/api/ventas/exportar/pdf",
    tag = "Ventas",
    params(ParametrosRango),
    responses(
        (status = 200, description = "Ventas del rango en PDF", content_type = "application/pdf")
    ),
    security(("bearer_auth" = []))
)]
pub async fn exportar_pdf(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoVentas>,
    Query(params): Query<ParametrosRango>,
) -> Result<impl IntoResponse, AppError> {
    let ventas = app_state
        .venta_service
        .buscar_por_rango(params.desde, params.hasta)
        .await?;
    let pdf = app_state
        .exportacion_service
        .pdf_ventas(&ventas, params.desde, params.hasta)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ventas.pdf\"".to_string(),
            ),
        ],
        pdf,
    ))
}
