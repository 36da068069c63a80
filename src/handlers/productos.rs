// src/handlers/productos.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::clientes::ParametrosPagina,
    middleware::rbac::{AccesoProductos, RequiereRol},
    models::producto::{
        ActualizarProductoPayload, AjusteStockPayload, Categoria, CrearCategoriaPayload,
        CrearProductoPayload, Producto,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParametrosBajoStock {
    /// Umbral de stock; por defecto 5
    pub umbral: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParametrosNombre {
    /// Texto a buscar en el nombre del producto
    pub q: String,

    /// Número de página, partiendo de cero
    #[serde(default)]
    pub pagina: usize,

    /// Cantidad de elementos por página
    #[serde(default = "tamanio_defecto")]
    pub tamanio: usize,
}

fn tamanio_defecto() -> usize {
    20
}

// GET /api/productos
#[utoipa::path(
    get,
    path = "/api/productos",
    tag = "Productos",
    params(ParametrosPagina),
    responses(
        (status = 200, description = "Página de productos"),
        (status = 403, description = "Sin rol de acceso a productos")
    ),
    security(("bearer_auth" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
    Query(params): Query<ParametrosPagina>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = app_state
        .producto_service
        .listar_paginados(params.pagina, params.tamanio)
        .await?;

    Ok((StatusCode::OK, Json(pagina)))
}

// GET /api/productos/activos
#[utoipa::path(
    get,
    path = "/api/productos/activos",
    tag = "Productos",
    responses(
        (status = 200, description = "Productos activos para el punto de venta", body = [Producto])
    ),
    security(("bearer_auth" = []))
)]
pub async fn listar_activos(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
) -> Result<impl IntoResponse, AppError> {
    let productos = app_state.producto_service.listar_activos().await?;
    Ok((StatusCode::OK, Json(productos)))
}

// GET /api/productos/buscar
#[utoipa::path(
    get,
    path = "/api/productos/buscar",
    tag = "Productos",
    params(ParametrosNombre),
    responses(
        (status = 200, description = "Página de productos cuyo nombre coincide")
    ),
    security(("bearer_auth" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
    Query(params): Query<ParametrosNombre>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = app_state
        .producto_service
        .buscar_paginados(&params.q, params.pagina, params.tamanio)
        .await?;

    Ok((StatusCode::OK, Json(pagina)))
}

// GET /api/productos/bajo-stock
#[utoipa::path(
    get,
    path = "/api/productos/bajo-stock",
    tag = "Productos",
    params(ParametrosBajoStock),
    responses(
        (status = 200, description = "Productos activos bajo el umbral de stock", body = [Producto])
    ),
    security(("bearer_auth" = []))
)]
pub async fn listar_bajo_stock(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
    Query(params): Query<ParametrosBajoStock>,
) -> Result<impl IntoResponse, AppError> {
    let productos = app_state
        .producto_service
        .listar_bajo_stock(params.umbral)
        .await?;

    Ok((StatusCode::OK, Json(productos)))
}

// GET /api/productos/{id}
#[utoipa::path(
    get,
    path = "/api/productos/{id}",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    responses(
        (status = 200, description = "Producto encontrado", body = Producto),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let producto = app_state.producto_service.obtener(id).await?;
    Ok((StatusCode::OK, Json(producto)))
}

// GET /api/productos/{id}/estadisticas
#[utoipa::path(
    get,
    path = "/api/productos/{id}/estadisticas",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    responses(
        (status = 200, description = "Unidades vendidas e ingresos históricos del producto")
    ),
    security(("bearer_auth" = []))
)]
pub async fn estadisticas(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.producto_service.obtener(id).await?;

    let (unidades, ingresos) = app_state.producto_service.estadisticas_venta(id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "unidadesVendidas": unidades,
            "ingresos": ingresos,
        })),
    ))
}

// POST /api/productos
#[utoipa::path(
    post,
    path = "/api/productos",
    tag = "Productos",
    request_body = CrearProductoPayload,
    responses(
        (status = 201, description = "Producto creado", body = Producto),
        (status = 400, description = "Campos con errores"),
        (status = 409, description = "Código duplicado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
    Json(payload): Json<CrearProductoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let producto = app_state.producto_service.crear(payload).await?;
    Ok((StatusCode::CREATED, Json(producto)))
}

// PUT /api/productos/{id}
#[utoipa::path(
    put,
    path = "/api/productos/{id}",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    request_body = ActualizarProductoPayload,
    responses(
        (status = 200, description = "Producto actualizado", body = Producto),
        (status = 404, description = "Producto no encontrado"),
        (status = 409, description = "Código duplicado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarProductoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let producto = app_state.producto_service.actualizar(id, payload).await?;
    Ok((StatusCode::OK, Json(producto)))
}

// POST /api/productos/{id}/stock/entrada
#[utoipa::path(
    post,
    path = "/api/productos/{id}/stock/entrada",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    request_body = AjusteStockPayload,
    responses(
        (status = 200, description = "Stock incrementado", body = Producto)
    ),
    security(("bearer_auth" = []))
)]
pub async fn entrada_stock(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AjusteStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let producto = app_state
        .producto_service
        .ajustar_stock(id, payload.cantidad)
        .await?;

    Ok((StatusCode::OK, Json(producto)))
}

// POST /api/productos/{id}/stock/salida
#[utoipa::path(
    post,
    path = "/api/productos/{id}/stock/salida",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    request_body = AjusteStockPayload,
    responses(
        (status = 200, description = "Stock descontado", body = Producto),
        (status = 400, description = "Stock insuficiente")
    ),
    security(("bearer_auth" = []))
)]
pub async fn salida_stock(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AjusteStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let producto = app_state
        .producto_service
        .ajustar_stock(id, -payload.cantidad)
        .await?;

    Ok((StatusCode::OK, Json(producto)))
}

// DELETE /api/productos/{id}
#[utoipa::path(
    delete,
    path = "/api/productos/{id}",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    responses(
        (status = 204, description = "Producto desactivado"),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn desactivar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.producto_service.desactivar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/productos/{id}/reactivar
#[utoipa::path(
    post,
    path = "/api/productos/{id}/reactivar",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    responses(
        (status = 204, description = "Producto reactivado"),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reactivar(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.producto_service.reactivar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/productos/exportar/excel
#[utoipa::path(
    get,
    path = "/api/productos/exportar/excel",
    tag = "Productos",
    responses(
        (status = 200, description = "Listado de productos en Excel",
         content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    ),
    security(("bearer_auth" = []))
)]
pub async fn exportar_excel(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
) -> Result<impl IntoResponse, AppError> {
    let productos = app_state.producto_service.listar().await?;
    let excel = app_state.exportacion_service.excel_productos(&productos)?;

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"productos.xlsx\"".to_string(),
            ),
        ],
        excel,
    ))
}

// GET /api/productos/exportar/pdf
#[utoipa::path(
    get,
    path = "/api/productos/exportar/pdf",
    tag = "Productos",
    responses(
        (status = 200, description = "Listado de productos en PDF", content_type = "application/pdf")
    ),
    security(("bearer_auth" = []))
)]
pub async fn exportar_pdf(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
) -> Result<impl IntoResponse, AppError> {
    let productos = app_state.producto_service.listar().await?;
    let pdf = app_state.exportacion_service.pdf_productos(&productos).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"productos.pdf\"".to_string(),
            ),
        ],
        pdf,
    ))
}

// --- Categorías ---

// GET /api/categorias
#[utoipa::path(
    get,
    path = "/api/categorias",
    tag = "Productos",
    responses(
        (status = 200, description = "Listado de categorías", body = [Categoria])
    ),
    security(("bearer_auth" = []))
)]
pub async fn listar_categorias(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
) -> Result<impl IntoResponse, AppError> {
    let categorias = app_state.producto_service.listar_categorias().await?;
    Ok((StatusCode::OK, Json(categorias)))
}

// POST /api/categorias
#[utoipa::path(
    post,
    path = "/api/categorias",
    tag = "Productos",
    request_body = CrearCategoriaPayload,
    responses(
        (status = 201, description = "Categoría creada", body = Categoria),
        (status = 409, description = "Nombre duplicado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn crear_categoria(
    State(app_state): State<AppState>,
    _guard: RequiereRol<AccesoProductos>,
    Json(payload): Json<CrearCategoriaPayload>,
) -> Result<impl IntoResponse, AppError> {
    let categoria = app_state.producto_service.crear_categoria(payload).await?;
    Ok((StatusCode::CREATED, Json(categoria)))
}
