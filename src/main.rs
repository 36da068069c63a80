// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
mod validador;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;
use crate::middleware::errores::anotar_ruta_en_500;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("No se pudo inicializar el estado de la aplicación.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("No se pudieron ejecutar las migraciones.");

    tracing::info!("Migraciones de la base de datos ejecutadas");

    // Siembra el administrador inicial si la instalación está vacía
    app_state
        .auth_service
        .inicializar_admin()
        .await
        .expect("No se pudo crear el usuario administrador inicial.");

    // Rutas públicas
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Todo lo demás exige token; los roles se verifican por handler
    let api_routes = Router::new()
        .route("/auth/me", get(handlers::auth::perfil))
        .route("/dashboard/datos", get(handlers::dashboard::metricas))
        // Clientes
        .route(
            "/clientes",
            get(handlers::clientes::listar).post(handlers::clientes::crear),
        )
        .route("/clientes/buscar", get(handlers::clientes::buscar))
        .route("/clientes/exportar/csv", get(handlers::clientes::exportar_csv))
        .route("/clientes/exportar/excel", get(handlers::clientes::exportar_excel))
        .route("/clientes/exportar/pdf", get(handlers::clientes::exportar_pdf))
        .route(
            "/clientes/{id}",
            get(handlers::clientes::obtener)
                .put(handlers::clientes::actualizar)
                .delete(handlers::clientes::eliminar),
        )
        .route("/clientes/{id}/ventas", get(handlers::clientes::historial_ventas))
        .route(
            "/clientes/{id}/estadisticas",
            get(handlers::clientes::estadisticas),
        )
        // Productos
        .route(
            "/productos",
            get(handlers::productos::listar).post(handlers::productos::crear),
        )
        .route("/productos/activos", get(handlers::productos::listar_activos))
        .route("/productos/buscar", get(handlers::productos::buscar))
        .route("/productos/bajo-stock", get(handlers::productos::listar_bajo_stock))
        .route("/productos/exportar/excel", get(handlers::productos::exportar_excel))
        .route("/productos/exportar/pdf", get(handlers::productos::exportar_pdf))
        .route(
            "/productos/{id}",
            get(handlers::productos::obtener)
                .put(handlers::productos::actualizar)
                .delete(handlers::productos::desactivar),
        )
        .route("/productos/{id}/estadisticas", get(handlers::productos::estadisticas))
        .route("/productos/{id}/stock/entrada", post(handlers::productos::entrada_stock))
        .route("/productos/{id}/stock/salida", post(handlers::productos::salida_stock))
        .route("/productos/{id}/reactivar", post(handlers::productos::reactivar))
        .route(
            "/categorias",
            get(handlers::productos::listar_categorias).post(handlers::productos::crear_categoria),
        )
        // Ventas
        .route(
            "/ventas",
            get(handlers::ventas::listar).post(handlers::ventas::crear),
        )
        .route("/ventas/rango", get(handlers::ventas::listar_por_rango))
        .route("/ventas/exportar/excel", get(handlers::ventas::exportar_excel))
        .route("/ventas/exportar/pdf", get(handlers::ventas::exportar_pdf))
        .route("/ventas/{id}", get(handlers::ventas::obtener))
        .route("/ventas/{id}/anular", post(handlers::ventas::anular))
        .route("/ventas/{id}/comprobante", get(handlers::ventas::comprobante))
        // Reportes
        .route("/reportes/ventas", get(handlers::reportes::resumen_ventas))
        .route("/reportes/clientes", get(handlers::reportes::reporte_clientes))
        // Usuarios
        .route(
            "/usuarios",
            get(handlers::usuarios::listar).post(handlers::usuarios::crear),
        )
        .route("/usuarios/exportar/csv", get(handlers::usuarios::exportar_csv))
        .route(
            "/usuarios/{id}",
            get(handlers::usuarios::obtener).put(handlers::usuarios::actualizar),
        )
        .route("/usuarios/{id}/password", post(handlers::usuarios::cambiar_password))
        .route("/usuarios/{id}/activar", post(handlers::usuarios::activar))
        .route("/usuarios/{id}/desactivar", post(handlers::usuarios::desactivar))
        .route("/usuarios/{id}/roles", put(handlers::usuarios::asignar_roles))
        // Roles
        .route(
            "/roles",
            get(handlers::roles::listar).post(handlers::roles::crear),
        )
        .route(
            "/roles/{nombre}",
            get(handlers::roles::obtener)
                .put(handlers::roles::actualizar)
                .delete(handlers::roles::eliminar),
        )
        .route("/roles/{nombre}/vistas", get(handlers::roles::historial_vistas))
        // Configuración
        .route(
            "/configuracion",
            get(handlers::configuracion::obtener).put(handlers::configuracion::actualizar),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .layer(axum_middleware::from_fn(anotar_ruta_en_500))
        .with_state(app_state);

    let addr = std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("No se pudo iniciar el listener TCP");

    tracing::info!("Servidor escuchando en {}", addr);

    axum::serve(listener, app)
        .await
        .expect("Error en el servidor Axum");
}
