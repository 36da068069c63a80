// src/middleware/errores.rs

use axum::{
    Json,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::common::error::cuerpo_error_interno;

/// Reescribe los 500 para que el cuerpo incluya la ruta que falló.
/// `AppError` no ve la petición cuando arma la respuesta; este middleware sí,
/// y el detalle del error ya quedó en el log al generarse.
pub async fn anotar_ruta_en_500(req: Request, next: Next) -> Response {
    let ruta = req.uri().path().to_string();
    let respuesta = next.run(req).await;

    if respuesta.status() == StatusCode::INTERNAL_SERVER_ERROR {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(cuerpo_error_interno(Some(&ruta))),
        )
            .into_response();
    }

    respuesta
}
