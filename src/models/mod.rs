pub mod cliente;
pub mod configuracion;
pub mod producto;
pub mod reporte;
pub mod rol;
pub mod usuario;
pub mod venta;
