// src/models/configuracion.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Fila única con la configuración de la empresa y del correo saliente.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguracionSistema {
    pub id: Uuid,
    pub nombre_empresa: String,
    pub direccion_empresa: Option<String>,
    pub telefono_empresa: Option<String>,
    pub email_contacto: Option<String>,
    pub logo_url: Option<String>,
    pub color_primario: String,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<i32>,
    pub smtp_usuario: Option<String>,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub smtp_password: Option<String>,

    pub smtp_ssl_habilitado: bool,
    pub dias_inactividad_alerta: i32,
    pub habilitar_notificaciones: bool,
    pub ultima_actualizacion: DateTime<Utc>,
    pub usuario_actualizacion: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarConfiguracionPayload {
    #[validate(length(min = 1, max = 100, message = "El nombre de la empresa es obligatorio"))]
    #[schema(example = "InformViva Ltda.")]
    pub nombre_empresa: String,

    #[validate(length(max = 200, message = "La dirección no puede superar los 200 caracteres"))]
    pub direccion_empresa: Option<String>,

    #[validate(length(max = 50, message = "El teléfono no puede superar los 50 caracteres"))]
    pub telefono_empresa: Option<String>,

    #[validate(email(message = "El correo debe tener un formato válido"))]
    pub email_contacto: Option<String>,

    #[validate(length(max = 200, message = "El logo URL no puede superar los 200 caracteres"))]
    pub logo_url: Option<String>,

    #[serde(default = "color_primario_defecto")]
    pub color_primario: String,

    pub smtp_host: Option<String>,
    pub smtp_port: Option<i32>,
    pub smtp_usuario: Option<String>,
    pub smtp_password: Option<String>,

    #[serde(default = "verdadero")]
    pub smtp_ssl_habilitado: bool,

    #[serde(default = "dias_alerta_defecto")]
    pub dias_inactividad_alerta: i32,

    #[serde(default = "verdadero")]
    pub habilitar_notificaciones: bool,
}

fn color_primario_defecto() -> String {
    "#0d6efd".to_string()
}

fn verdadero() -> bool {
    true
}

fn dias_alerta_defecto() -> i32 {
    30
}
