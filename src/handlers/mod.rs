pub mod auth;
pub mod clientes;
pub mod configuracion;
pub mod dashboard;
pub mod productos;
pub mod reportes;
pub mod roles;
pub mod usuarios;
pub mod ventas;
