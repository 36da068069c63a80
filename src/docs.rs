// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Autenticación ---
        handlers::auth::login,
        handlers::auth::perfil,

        // --- Clientes ---
        handlers::clientes::listar,
        handlers::clientes::buscar,
        handlers::clientes::obtener,
        handlers::clientes::historial_ventas,
        handlers::clientes::estadisticas,
        handlers::clientes::crear,
        handlers::clientes::actualizar,
        handlers::clientes::eliminar,
        handlers::clientes::exportar_csv,
        handlers::clientes::exportar_excel,
        handlers::clientes::exportar_pdf,

        // --- Productos ---
        handlers::productos::listar,
        handlers::productos::listar_activos,
        handlers::productos::buscar,
        handlers::productos::listar_bajo_stock,
        handlers::productos::obtener,
        handlers::productos::estadisticas,
        handlers::productos::crear,
        handlers::productos::actualizar,
        handlers::productos::entrada_stock,
        handlers::productos::salida_stock,
        handlers::productos::desactivar,
        handlers::productos::reactivar,
        handlers::productos::exportar_excel,
        handlers::productos::exportar_pdf,
        handlers::productos::listar_categorias,
        handlers::productos::crear_categoria,

        // --- Ventas ---
        handlers::ventas::listar,
        handlers::ventas::listar_por_rango,
        handlers::ventas::obtener,
        handlers::ventas::crear,
        handlers::ventas::anular,
        handlers::ventas::comprobante,
        handlers::ventas::exportar_excel,
        handlers::ventas::exportar_pdf,

        // --- Reportes y dashboard ---
        handlers::reportes::resumen_ventas,
        handlers::reportes::reporte_clientes,
        handlers::dashboard::metricas,

        // --- Usuarios ---
        handlers::usuarios::listar,
        handlers::usuarios::obtener,
        handlers::usuarios::crear,
        handlers::usuarios::actualizar,
        handlers::usuarios::cambiar_password,
        handlers::usuarios::activar,
        handlers::usuarios::desactivar,
        handlers::usuarios::asignar_roles,
        handlers::usuarios::exportar_csv,

        // --- Roles ---
        handlers::roles::listar,
        handlers::roles::obtener,
        handlers::roles::crear,
        handlers::roles::actualizar,
        handlers::roles::eliminar,
        handlers::roles::historial_vistas,

        // --- Configuración ---
        handlers::configuracion::obtener,
        handlers::configuracion::actualizar,
    ),
    components(
        schemas(
            // --- Autenticación ---
            models::usuario::LoginPayload,
            models::usuario::AuthResponse,
            models::usuario::Usuario,
            models::usuario::CrearUsuarioPayload,
            models::usuario::ActualizarUsuarioPayload,
            models::usuario::CambiarPasswordPayload,
            models::usuario::AsignarRolesPayload,

            // --- Clientes ---
            models::cliente::Cliente,
            models::cliente::CrearClientePayload,
            models::cliente::ActualizarClientePayload,

            // --- Productos ---
            models::producto::Producto,
            models::producto::Categoria,
            models::producto::CrearProductoPayload,
            models::producto::ActualizarProductoPayload,
            models::producto::AjusteStockPayload,
            models::producto::CrearCategoriaPayload,

            // --- Ventas ---
            models::venta::Venta,
            models::venta::VentaDetalle,
            models::venta::VentaListado,
            models::venta::DetalleListado,
            models::venta::VentaConDetalles,
            models::venta::CrearVentaPayload,
            models::venta::CrearDetallePayload,

            // --- Reportes ---
            models::reporte::Metrica,
            models::reporte::ProductoVendido,
            models::reporte::VentaPorPeriodo,
            models::reporte::VentaPorCategoria,
            models::reporte::VentaPorVendedor,
            models::reporte::VentaResumen,
            models::reporte::ClienteReporte,

            // --- Roles ---
            models::rol::Rol,
            models::rol::RolVista,
            models::rol::CrearRolPayload,
            models::rol::ActualizarRolPayload,

            // --- Configuración ---
            models::configuracion::ConfiguracionSistema,
            models::configuracion::ActualizarConfiguracionPayload,
        )
    ),
    tags(
        (name = "Autenticación", description = "Login y perfil del usuario"),
        (name = "Clientes", description = "Gestión de clientes y sus exportes"),
        (name = "Productos", description = "Catálogo, stock y categorías"),
        (name = "Ventas", description = "Registro, anulación y comprobantes de venta"),
        (name = "Reportes", description = "Reportes agregados para gerencia"),
        (name = "Dashboard", description = "Métricas comparadas por período"),
        (name = "Usuarios", description = "Administración de cuentas"),
        (name = "Roles", description = "Roles, permisos y auditoría de vistas"),
        (name = "Configuración", description = "Parámetros de la empresa y del correo")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
