pub mod auth;
pub mod errores;
pub mod rbac;
