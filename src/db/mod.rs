pub mod cliente_repo;
pub use cliente_repo::ClienteRepository;
pub mod producto_repo;
pub use producto_repo::ProductoRepository;
pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;
pub mod rol_repo;
pub use rol_repo::RolRepository;
pub mod venta_repo;
pub use venta_repo::VentaRepository;
pub mod reporte_repo;
pub use reporte_repo::ReporteRepository;
pub mod configuracion_repo;
pub use configuracion_repo::ConfiguracionRepository;
