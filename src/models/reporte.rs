// src/models/reporte.rs

// DTOs del módulo de reportes. Las filas agregadas llegan directo de las
// consultas de reporte_repo; los porcentajes se completan en el servicio.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Métrica del dashboard: valor del período y cambio contra el anterior.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Metrica {
    pub valor: f64,
    pub porcentaje_cambio: f64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductoVendido {
    pub nombre: String,
    pub unidades_vendidas: i64,
    pub ingresos: Decimal,

    // Participación sobre la venta total del período; la asigna el servicio
    #[sqlx(default)]
    pub porcentaje_total: f64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VentaPorPeriodo {
    // Etiqueta del día, "2024-01-15"
    pub periodo: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VentaPorCategoria {
    pub categoria: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VentaPorVendedor {
    pub vendedor: String,
    pub total: Decimal,
}

/// Resumen de ventas de un rango de fechas, con la comparación contra el
/// período inmediatamente anterior de igual duración.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VentaResumen {
    pub total_ventas: Decimal,
    pub total_transacciones: i64,
    pub total_articulos_vendidos: i64,
    pub ticket_promedio: Decimal,
    pub clientes_nuevos: i64,

    pub porcentaje_cambio_ventas: f64,
    pub porcentaje_cambio_transacciones: f64,
    pub porcentaje_cambio_ticket_promedio: f64,
    pub porcentaje_cambio_clientes_nuevos: f64,

    pub productos_mas_vendidos: Vec<ProductoVendido>,
    pub ventas_por_periodo: Vec<VentaPorPeriodo>,
    pub ventas_por_categoria: Vec<VentaPorCategoria>,
    pub ventas_por_vendedor: Vec<VentaPorVendedor>,
}

/// Fila del reporte de clientes con sus estadísticas de compra.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClienteReporte {
    pub id: Uuid,
    pub rut: String,
    pub nombre_completo: String,
    pub email: String,
    pub fecha_registro: NaiveDate,
    pub compras_realizadas: i64,
    pub total_compras: Decimal,

    #[sqlx(default)]
    pub promedio_por_compra: Decimal,

    pub ultima_compra: Option<NaiveDate>,
}
