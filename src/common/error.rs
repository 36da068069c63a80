// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Error central de la aplicación. Cada variante sabe a qué código HTTP
// corresponde; los handlers solo propagan con `?`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    RecursoNoEncontrado(String),

    #[error("{0}")]
    StockInsuficiente(String),

    #[error("{0}")]
    RutInvalido(String),

    // Violaciones de unicidad y eliminaciones bloqueadas por referencias
    #[error("{0}")]
    Conflicto(String),

    #[error("Usuario o contraseña inválidos")]
    CredencialesInvalidas,

    #[error("El usuario está desactivado")]
    UsuarioInactivo,

    #[error("Token de autenticación inválido o ausente")]
    TokenInvalido,

    #[error("Acceso denegado: se requiere alguno de los roles {0}")]
    AccesoDenegado(String),

    #[error("Error de base de datos")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para cualquier otro error inesperado
    #[error("Error interno del servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Error de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Error de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devuelve todos los detalles de validación como mapa campo -> mensajes
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::RecursoNoEncontrado(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::StockInsuficiente(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::RutInvalido(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflicto(msg) => (StatusCode::CONFLICT, msg),
            AppError::CredencialesInvalidas => {
                (StatusCode::UNAUTHORIZED, "Usuario o contraseña inválidos.".to_string())
            }
            AppError::TokenInvalido => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticación inválido o ausente.".to_string(),
            ),
            AppError::UsuarioInactivo => {
                (StatusCode::FORBIDDEN, "El usuario está desactivado.".to_string())
            }
            AppError::AccesoDenegado(roles) => (
                StatusCode::FORBIDDEN,
                format!("Acceso denegado: se requiere alguno de los roles [{}].", roles),
            ),

            // Todo lo demás (DatabaseError, InternalServerError, etc.) es un 500.
            // El detalle queda en el log; el cliente recibe un cuerpo estructurado.
            // La ruta la completa el middleware `anotar_ruta_en_500`.
            ref e => {
                tracing::error!("Error interno del servidor: {}", e);
                let body = Json(cuerpo_error_interno(None));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// Cuerpo estructurado de los 500: status, mensaje genérico, timestamp y,
/// cuando se conoce, la ruta que falló.
pub fn cuerpo_error_interno(ruta: Option<&str>) -> serde_json::Value {
    let mut cuerpo = json!({
        "status": 500,
        "error": "Ocurrió un error inesperado.",
        "timestamp": chrono::Utc::now(),
    });

    if let Some(ruta) = ruta {
        cuerpo["path"] = json!(ruta);
    }

    cuerpo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn el_cuerpo_de_500_incluye_la_ruta_cuando_se_conoce() {
        let cuerpo = cuerpo_error_interno(Some("/api/ventas"));
        assert_eq!(cuerpo["status"], 500);
        assert_eq!(cuerpo["path"], "/api/ventas");
        assert!(cuerpo.get("timestamp").is_some());
    }

    #[test]
    fn sin_ruta_conocida_el_campo_se_omite() {
        let cuerpo = cuerpo_error_interno(None);
        assert!(cuerpo.get("path").is_none());
        assert_eq!(cuerpo["error"], "Ocurrió un error inesperado.");
    }
}
