// src/models/usuario.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: Uuid,
    pub username: String,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,

    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub activo: bool,
    pub fecha_creacion: NaiveDate,
    pub ultimo_acceso: NaiveDate,

    // Se carga aparte desde usuario_roles
    #[sqlx(skip)]
    pub roles: Vec<String>,
}

impl Usuario {
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }

    pub fn tiene_rol(&self, rol: &str) -> bool {
        self.roles.iter().any(|r| r == rol)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "El nombre de usuario no puede estar vacío"))]
    #[schema(example = "admin")]
    pub username: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    #[schema(example = "admin123")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Claims dentro del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // ID del usuario
    pub exp: usize, // Expiración
    pub iat: usize, // Emisión
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearUsuarioPayload {
    #[validate(length(min = 3, message = "El nombre de usuario debe tener al menos 3 caracteres"))]
    #[schema(example = "rgonzalez")]
    pub username: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: String,

    #[validate(length(min = 1, message = "El nombre no puede estar vacío"))]
    pub nombre: String,

    #[validate(length(min = 1, message = "El apellido no puede estar vacío"))]
    pub apellido: String,

    #[validate(email(message = "El correo debe tener un formato válido"))]
    pub email: String,

    #[serde(default)]
    #[schema(example = json!(["VENTAS"]))]
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarUsuarioPayload {
    #[validate(length(min = 1, message = "El nombre no puede estar vacío"))]
    pub nombre: String,

    #[validate(length(min = 1, message = "El apellido no puede estar vacío"))]
    pub apellido: String,

    #[validate(email(message = "El correo debe tener un formato válido"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CambiarPasswordPayload {
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Las contraseñas no coinciden"))]
    pub confirmacion: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AsignarRolesPayload {
    #[schema(example = json!(["ADMIN", "GERENTE"]))]
    pub roles: Vec<String>,
}
