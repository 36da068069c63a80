// src/models/producto.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Categoria {
    pub id: Uuid,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub activa: bool,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Producto {
    pub id: Uuid,
    // Código único normalizado en mayúsculas
    pub codigo: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub stock: i32,
    pub categoria_id: Option<Uuid>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub activo: bool,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl Producto {
    /// "[CODIGO] - Nombre del producto", como aparece en listados y exportes.
    pub fn nombre_formateado(&self) -> String {
        format!("[{}] - {}", self.codigo, self.nombre)
    }

    pub fn disponible(&self) -> bool {
        self.activo && self.stock > 0
    }

    /// Stock resultante tras aplicar un delta (positivo o negativo).
    /// Devuelve `None` cuando el resultado sería negativo.
    pub fn stock_resultante(&self, delta: i32) -> Option<i32> {
        let nuevo = self.stock.checked_add(delta)?;
        if nuevo < 0 { None } else { Some(nuevo) }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearProductoPayload {
    #[validate(length(min = 1, message = "El código no puede estar vacío"))]
    #[schema(example = "NTB-001")]
    pub codigo: String,

    #[validate(length(min = 1, message = "El nombre no puede estar vacío"))]
    #[schema(example = "Notebook 14 pulgadas")]
    pub nombre: String,

    pub descripcion: Option<String>,

    #[schema(example = 549990.0)]
    pub precio: Decimal,

    #[validate(range(min = 0, message = "El stock no puede ser negativo"))]
    #[serde(default)]
    pub stock: i32,

    pub categoria_id: Option<Uuid>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarProductoPayload {
    #[validate(length(min = 1, message = "El código no puede estar vacío"))]
    pub codigo: String,

    #[validate(length(min = 1, message = "El nombre no puede estar vacío"))]
    pub nombre: String,

    pub descripcion: Option<String>,
    pub precio: Decimal,

    #[validate(range(min = 0, message = "El stock no puede ser negativo"))]
    pub stock: i32,

    pub categoria_id: Option<Uuid>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub activo: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AjusteStockPayload {
    #[validate(range(min = 1, message = "La cantidad debe ser mayor que cero"))]
    #[schema(example = 5)]
    pub cantidad: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearCategoriaPayload {
    #[validate(length(min = 1, message = "El nombre no puede estar vacío"))]
    #[schema(example = "Electrónica")]
    pub nombre: String,

    pub descripcion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producto_con_stock(stock: i32) -> Producto {
        Producto {
            id: Uuid::new_v4(),
            codigo: "P-001".into(),
            nombre: "Prueba".into(),
            descripcion: None,
            precio: Decimal::new(1000, 0),
            stock,
            categoria_id: None,
            marca: None,
            modelo: None,
            activo: true,
            fecha_creacion: Utc::now(),
            fecha_actualizacion: Utc::now(),
        }
    }

    #[test]
    fn reducir_stock_bajo_cero_se_rechaza() {
        let p = producto_con_stock(3);
        assert_eq!(p.stock_resultante(-4), None);
    }

    #[test]
    fn reducir_stock_exactamente_a_cero_funciona() {
        let p = producto_con_stock(3);
        assert_eq!(p.stock_resultante(-3), Some(0));
    }

    #[test]
    fn aumentar_stock_suma_el_delta() {
        let p = producto_con_stock(3);
        assert_eq!(p.stock_resultante(7), Some(10));
    }

    #[test]
    fn nombre_formateado_incluye_el_codigo() {
        let p = producto_con_stock(1);
        assert_eq!(p.nombre_formateado(), "[P-001] - Prueba");
    }
}
