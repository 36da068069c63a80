// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::{common::error::AppError, config::AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParametrosDashboard {
    /// Período: hoy, semana, mes, trimestre o año; por defecto mes
    #[serde(default = "periodo_defecto")]
    pub periodo: String,
}

fn periodo_defecto() -> String {
    "mes".to_string()
}

// GET /api/dashboard/datos
// Disponible para cualquier usuario autenticado, sin importar el rol.
#[utoipa::path(
    get,
    path = "/api/dashboard/datos",
    tag = "Dashboard",
    params(ParametrosDashboard),
    responses(
        (status = 200, description = "Métricas del período con comparación al anterior"),
        (status = 401, description = "No autenticado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn metricas(
    State(app_state): State<AppState>,
    Query(params): Query<ParametrosDashboard>,
) -> Result<impl IntoResponse, AppError> {
    let hoy = Local::now().date_naive();

    let datos = app_state
        .reporte_service
        .metricas_dashboard(&params.periodo, hoy)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "periodo": params.periodo,
            "ventas": datos.ventas,
            "transacciones": datos.transacciones,
            "ticketPromedio": datos.ticket_promedio,
            "clientesNuevos": datos.clientes_nuevos,
            "articulosVendidos": datos.articulos_vendidos,
            "productosMasVendidos": datos.productos_mas_vendidos,
            "ventasPorPeriodo": datos.ventas_por_periodo,
            "ventasPorCategoria": datos.ventas_por_categoria,
        })),
    ))
}
