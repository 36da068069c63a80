// src/services/rol_service.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    db::RolRepository,
    models::rol::{ActualizarRolPayload, CrearRolPayload, Rol, RolVista, ROL_ADMIN},
};

#[derive(Clone)]
pub struct RolService {
    rol_repo: RolRepository,
}

impl RolService {
    pub fn new(rol_repo: RolRepository) -> Self {
        Self { rol_repo }
    }

    pub async fn listar(&self) -> Result<Vec<Rol>, AppError> {
        self.rol_repo.listar().await
    }

    /// Devuelve el rol y deja constancia de quién lo consultó.
    pub async fn obtener(&self, nombre: &str, consultado_por: &str) -> Result<Rol, AppError> {
        let rol = self
            .rol_repo
            .buscar_por_nombre(nombre)
            .await?
            .ok_or_else(|| AppError::RecursoNoEncontrado(format!("Rol '{}' no encontrado", nombre)))?;

        self.rol_repo.registrar_vista(nombre, consultado_por).await?;
        Ok(rol)
    }

    pub async fn crear(&self, payload: CrearRolPayload) -> Result<Rol, AppError> {
        payload.validate()?;

        let nombre = payload.nombre.trim().to_uppercase();

        self.rol_repo
            .crear(&nombre, payload.descripcion.as_deref(), &payload.permisos)
            .await
    }

    pub async fn actualizar(
        &self,
        nombre: &str,
        payload: ActualizarRolPayload,
    ) -> Result<Rol, AppError> {
        payload.validate()?;

        self.rol_repo
            .actualizar(nombre, payload.descripcion.as_deref(), &payload.permisos)
            .await?
            .ok_or_else(|| AppError::RecursoNoEncontrado(format!("Rol '{}' no encontrado", nombre)))
    }

    /// El rol ADMIN nunca se elimina, y tampoco un rol asignado a usuarios.
    pub async fn eliminar(&self, nombre: &str) -> Result<(), AppError> {
        if nombre == ROL_ADMIN {
            return Err(AppError::Conflicto(
                "El rol ADMIN no puede eliminarse.".to_string(),
            ));
        }

        if self.rol_repo.en_uso(nombre).await? {
            return Err(AppError::Conflicto(format!(
                "El rol '{}' tiene usuarios asignados y no puede eliminarse.",
                nombre
            )));
        }

        let afectadas = self.rol_repo.eliminar(nombre).await?;
        if afectadas == 0 {
            return Err(AppError::RecursoNoEncontrado(format!(
                "Rol '{}' no encontrado",
                nombre
            )));
        }

        Ok(())
    }

    pub async fn historial_vistas(&self, nombre: &str) -> Result<Vec<RolVista>, AppError> {
        if self.rol_repo.buscar_por_nombre(nombre).await?.is_none() {
            return Err(AppError::RecursoNoEncontrado(format!(
                "Rol '{}' no encontrado",
                nombre
            )));
        }

        self.rol_repo.listar_vistas(nombre).await
    }
}
