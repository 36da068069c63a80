// src/middleware/rbac.rs

// Guardianes de ruta por rol. Cada tipo marcador declara qué roles
// habilitan el acceso; el extractor rechaza con 403 al resto.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::{
        rol::{ROL_ADMIN, ROL_GERENTE, ROL_PRODUCTOS, ROL_VENTAS},
        usuario::Usuario,
    },
};

pub trait RolDef: Send + Sync + 'static {
    fn permitidos() -> &'static [&'static str];
}

pub struct RequiereRol<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequiereRol<T>
where
    T: RolDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let usuario = parts
            .extensions
            .get::<Usuario>()
            .ok_or(AppError::TokenInvalido)?;

        let permitidos = T::permitidos();

        if permitidos.iter().any(|rol| usuario.tiene_rol(rol)) {
            return Ok(RequiereRol(PhantomData));
        }

        Err(AppError::AccesoDenegado(permitidos.join(", ")))
    }
}

// ---
// Marcadores por área funcional
// ---

pub struct AccesoProductos;
impl RolDef for AccesoProductos {
    fn permitidos() -> &'static [&'static str] {
        &[ROL_ADMIN, ROL_PRODUCTOS, ROL_VENTAS]
    }
}

pub struct AccesoVentas;
impl RolDef for AccesoVentas {
    fn permitidos() -> &'static [&'static str] {
        &[ROL_ADMIN, ROL_VENTAS]
    }
}

pub struct AccesoClientes;
impl RolDef for AccesoClientes {
    fn permitidos() -> &'static [&'static str] {
        &[ROL_ADMIN, ROL_VENTAS]
    }
}

pub struct AccesoReportes;
impl RolDef for AccesoReportes {
    fn permitidos() -> &'static [&'static str] {
        &[ROL_ADMIN, ROL_GERENTE]
    }
}

pub struct SoloAdmin;
impl RolDef for SoloAdmin {
    fn permitidos() -> &'static [&'static str] {
        &[ROL_ADMIN]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn usuario_con_roles(roles: &[&str]) -> Usuario {
        Usuario {
            id: Uuid::new_v4(),
            username: "prueba".into(),
            password_hash: "x".into(),
            nombre: "Usuario".into(),
            apellido: "Prueba".into(),
            email: "prueba@correo.cl".into(),
            activo: true,
            fecha_creacion: Utc::now().date_naive(),
            ultimo_acceso: Utc::now().date_naive(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn autorizado<T: RolDef>(usuario: &Usuario) -> bool {
        T::permitidos().iter().any(|rol| usuario.tiene_rol(rol))
    }

    #[test]
    fn admin_entra_a_todas_las_areas() {
        let admin = usuario_con_roles(&[ROL_ADMIN]);
        assert!(autorizado::<AccesoProductos>(&admin));
        assert!(autorizado::<AccesoVentas>(&admin));
        assert!(autorizado::<AccesoClientes>(&admin));
        assert!(autorizado::<AccesoReportes>(&admin));
        assert!(autorizado::<SoloAdmin>(&admin));
    }

    #[test]
    fn ventas_entra_a_productos_pero_no_a_reportes() {
        let vendedor = usuario_con_roles(&[ROL_VENTAS]);
        assert!(autorizado::<AccesoProductos>(&vendedor));
        assert!(autorizado::<AccesoVentas>(&vendedor));
        assert!(!autorizado::<AccesoReportes>(&vendedor));
        assert!(!autorizado::<SoloAdmin>(&vendedor));
    }

    #[test]
    fn gerente_solo_ve_reportes() {
        let gerente = usuario_con_roles(&[ROL_GERENTE]);
        assert!(autorizado::<AccesoReportes>(&gerente));
        assert!(!autorizado::<AccesoVentas>(&gerente));
        assert!(!autorizado::<SoloAdmin>(&gerente));
    }

    #[test]
    fn productos_no_entra_a_ventas() {
        let bodeguero = usuario_con_roles(&[ROL_PRODUCTOS]);
        assert!(autorizado::<AccesoProductos>(&bodeguero));
        assert!(!autorizado::<AccesoVentas>(&bodeguero));
        assert!(!autorizado::<AccesoClientes>(&bodeguero));
    }

    #[test]
    fn sin_roles_no_entra_a_ninguna_area() {
        let pelado = usuario_con_roles(&[]);
        assert!(!autorizado::<AccesoProductos>(&pelado));
        assert!(!autorizado::<AccesoReportes>(&pelado));
    }
}
