// src/models/rol.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Roles conocidos por los guardianes de ruta
pub const ROL_ADMIN: &str = "ADMIN";
pub const ROL_VENTAS: &str = "VENTAS";
pub const ROL_PRODUCTOS: &str = "PRODUCTOS";
pub const ROL_GERENTE: &str = "GERENTE";

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rol {
    pub id: Uuid,
    pub nombre: String,
    pub descripcion: Option<String>,

    // Se carga aparte desde rol_permisos
    #[sqlx(skip)]
    pub permisos: Vec<String>,
}

/// Registro append-only de quién consultó la configuración de un rol.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RolVista {
    pub id: Uuid,
    pub rol_nombre: String,
    pub usuario: String,
    pub fecha_vista: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearRolPayload {
    #[validate(length(min = 3, max = 50, message = "El nombre debe tener entre 3 y 50 caracteres"))]
    #[schema(example = "BODEGA")]
    pub nombre: String,

    #[validate(length(max = 200, message = "La descripción no puede superar los 200 caracteres"))]
    pub descripcion: Option<String>,

    #[serde(default)]
    #[schema(example = json!(["productos:stock"]))]
    pub permisos: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarRolPayload {
    #[validate(length(max = 200, message = "La descripción no puede superar los 200 caracteres"))]
    pub descripcion: Option<String>,

    #[serde(default)]
    pub permisos: Vec<String>,
}
