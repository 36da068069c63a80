// src/handlers/reportes.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AccesoReportes, RequiereRol},
    models::reporte::{ClienteReporte, VentaResumen},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParametrosReporte {
    /// Fecha inicial del rango, formato YYYY-MM-DD
    pub desde: NaiveDate,

    /// Fecha final del rango, formato YYYY-MM-DD
    pub hasta: NaiveDate,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParametrosReporteOpcional {
    /// Fecha inicial del rango; sin ella el reporte es histórico
    pub desde: Option<NaiveDate>,

    /// Fecha final del rango
    pub hasta: Option<NaiveDate>,
}

// GET /api/reportes/ventas
#[utoipa::path(
    get,
    path = "/api/reportes/ventas",
    tag = "Reportes",
    params(ParametrosReporte),
    responses(
        (status = 200, description = "Resumen de ventas del rango con comparación al período anterior", body = VentaResumen),
        (status = 403, description = "Sin rol de acceso a reportes")
    ),
    security(("bearer_auth" = []))
)]
pub async fn resumen_ventas(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoReportes>,
    Query(params): Query<ParametrosReporte>,
) -> Result<impl IntoResponse, AppError> {
    if params.desde > params.hasta {
        return Err(AppError::Conflicto(
            "La fecha inicial no puede ser posterior a la final.".to_string(),
        ));
    }

    let resumen = app_state
        .reporte_service
        .resumen_ventas(params.desde, params.hasta)
        .await?;

    Ok((StatusCode::OK, Json(resumen)))
}

// GET /api/reportes/clientes
#[utoipa::path(
    get,
    path = "/api/reportes/clientes",
    tag = "Reportes",
    params(ParametrosReporteOpcional),
    responses(
        (status = 200, description = "Clientes con compras y sus estadísticas", body = [ClienteReporte])
    ),
    security(("bearer_auth" = []))
)]
pub async fn reporte_clientes(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoReportes>,
    Query(params): Query<ParametrosReporteOpcional>,
) -> Result<impl IntoResponse, AppError> {
    let filas = app_state
        .reporte_service
        .reporte_clientes(params.desde, params.hasta)
        .await?;

    Ok((StatusCode::OK, Json(filas)))
}
