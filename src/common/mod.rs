pub mod error;
pub mod paginacion;
