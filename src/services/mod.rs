pub mod auth;
pub use auth::AuthService;
pub mod cliente_service;
pub use cliente_service::ClienteService;
pub mod producto_service;
pub use producto_service::ProductoService;
pub mod venta_service;
pub use venta_service::VentaService;
pub mod reporte_service;
pub use reporte_service::ReporteService;
pub mod exportacion_service;
pub use exportacion_service::ExportacionService;
pub mod usuario_service;
pub use usuario_service::UsuarioService;
pub mod rol_service;
pub use rol_service::RolService;
pub mod configuracion_service;
pub use configuracion_service::ConfiguracionService;
