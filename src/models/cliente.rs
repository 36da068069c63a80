// src/models/cliente.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: Uuid,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub rut: String,
    // La fija el repositorio en el primer insert
    pub fecha_registro: NaiveDate,
    pub categoria: Option<String>,
}

impl Cliente {
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearClientePayload {
    #[validate(length(min = 1, message = "El nombre no puede estar vacío"))]
    #[schema(example = "María")]
    pub nombre: String,

    #[validate(length(min = 1, message = "El apellido no puede estar vacío"))]
    #[schema(example = "González")]
    pub apellido: String,

    #[validate(email(message = "El correo debe tener un formato válido"))]
    #[schema(example = "maria@correo.cl")]
    pub email: String,

    pub telefono: Option<String>,
    pub direccion: Option<String>,

    // El checksum se valida en el servicio con el validador de RUT
    #[schema(example = "12.345.678-5")]
    pub rut: String,

    #[schema(example = "Mayorista")]
    pub categoria: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarClientePayload {
    #[validate(length(min = 1, message = "El nombre no puede estar vacío"))]
    pub nombre: String,

    #[validate(length(min = 1, message = "El apellido no puede estar vacío"))]
    pub apellido: String,

    #[validate(email(message = "El correo debe tener un formato válido"))]
    pub email: String,

    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub rut: String,
    pub categoria: Option<String>,
}
