// src/models/venta.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const ESTADO_COMPLETADA: &str = "COMPLETADA";
pub const ESTADO_ANULADA: &str = "ANULADA";

// IVA chileno aplicado sobre el subtotal
pub const TASA_IVA: Decimal = Decimal::from_parts(19, 0, 0, false, 2); // 0.19

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Venta {
    pub id: Uuid,
    pub fecha: DateTime<Utc>,
    pub cliente_id: Uuid,
    pub vendedor_id: Uuid,
    pub subtotal: Decimal,
    pub impuesto: Decimal,
    pub total: Decimal,
    pub metodo_pago: Option<String>,
    pub observaciones: Option<String>,
    pub estado: String,
}

impl Venta {
    pub fn anulada(&self) -> bool {
        self.estado == ESTADO_ANULADA
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VentaDetalle {
    pub id: Uuid,
    pub venta_id: Uuid,
    pub producto_id: Uuid,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub descuento: Decimal,
    pub total: Decimal,
}

/// Fila de listado con los nombres ya resueltos (JOIN con clientes y usuarios).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VentaListado {
    pub id: Uuid,
    pub fecha: DateTime<Utc>,
    pub cliente_id: Uuid,
    pub cliente_nombre: String,
    pub vendedor_id: Uuid,
    pub vendedor_nombre: String,
    pub subtotal: Decimal,
    pub impuesto: Decimal,
    pub total: Decimal,
    pub metodo_pago: Option<String>,
    pub estado: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetalleListado {
    pub id: Uuid,
    pub producto_id: Uuid,
    pub producto_codigo: String,
    pub producto_nombre: String,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub descuento: Decimal,
    pub total: Decimal,
}

/// Venta completa con sus líneas, para el detalle y los comprobantes.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VentaConDetalles {
    #[serde(flatten)]
    pub venta: VentaListado,
    pub detalles: Vec<DetalleListado>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearVentaPayload {
    pub cliente_id: Uuid,

    #[validate(nested)]
    #[validate(length(min = 1, message = "La venta debe tener al menos un detalle"))]
    pub detalles: Vec<CrearDetallePayload>,

    #[schema(example = "EFECTIVO")]
    pub metodo_pago: Option<String>,
    pub observaciones: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearDetallePayload {
    pub producto_id: Uuid,

    #[validate(range(min = 1, message = "La cantidad debe ser al menos 1"))]
    #[schema(example = 2)]
    pub cantidad: i32,

    // Descuento absoluto sobre la línea, nunca negativo
    #[serde(default)]
    pub descuento: Option<Decimal>,
}
