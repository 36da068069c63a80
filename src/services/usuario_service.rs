// src/services/usuario_service.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{RolRepository, UsuarioRepository},
    models::usuario::{
        ActualizarUsuarioPayload, AsignarRolesPayload, CambiarPasswordPayload,
        CrearUsuarioPayload, Usuario,
    },
    services::AuthService,
};

#[derive(Clone)]
pub struct UsuarioService {
    usuario_repo: UsuarioRepository,
    rol_repo: RolRepository,
    auth: AuthService,
}

impl UsuarioService {
    pub fn new(usuario_repo: UsuarioRepository, rol_repo: RolRepository, auth: AuthService) -> Self {
        Self {
            usuario_repo,
            rol_repo,
            auth,
        }
    }

    pub async fn listar(&self) -> Result<Vec<Usuario>, AppError> {
        self.usuario_repo.listar().await
    }

    pub async fn obtener(&self, id: Uuid) -> Result<Usuario, AppError> {
        self.usuario_repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::RecursoNoEncontrado(format!("Usuario {} no encontrado", id)))
    }

    pub async fn crear(&self, payload: CrearUsuarioPayload) -> Result<Usuario, AppError> {
        payload.validate()?;
        self.validar_roles(&payload.roles).await?;

        let password_hash = self.auth.hashear_password(&payload.password).await?;

        self.usuario_repo
            .crear(
                payload.username.trim(),
                &password_hash,
                payload.nombre.trim(),
                payload.apellido.trim(),
                payload.email.trim(),
                &payload.roles,
            )
            .await
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        payload: ActualizarUsuarioPayload,
    ) -> Result<Usuario, AppError> {
        payload.validate()?;

        self.usuario_repo
            .actualizar(id, payload.nombre.trim(), payload.apellido.trim(), payload.email.trim())
            .await?
            .ok_or_else(|| AppError::RecursoNoEncontrado(format!("Usuario {} no encontrado", id)))
    }

    pub async fn cambiar_password(
        &self,
        id: Uuid,
        payload: CambiarPasswordPayload,
    ) -> Result<(), AppError> {
        payload.validate()?;

        let password_hash = self.auth.hashear_password(&payload.password).await?;

        let afectadas = self.usuario_repo.cambiar_password(id, &password_hash).await?;
        if afectadas == 0 {
            return Err(AppError::RecursoNoEncontrado(format!(
                "Usuario {} no encontrado",
                id
            )));
        }

        Ok(())
    }

    pub async fn cambiar_estado(&self, id: Uuid, activo: bool) -> Result<(), AppError> {
        let afectadas = self.usuario_repo.cambiar_estado(id, activo).await?;
        if afectadas == 0 {
            return Err(AppError::RecursoNoEncontrado(format!(
                "Usuario {} no encontrado",
                id
            )));
        }

        Ok(())
    }

    pub async fn asignar_roles(&self, id: Uuid, payload: AsignarRolesPayload) -> Result<Usuario, AppError> {
        self.validar_roles(&payload.roles).await?;

        if self.usuario_repo.buscar_por_id(id).await?.is_none() {
            return Err(AppError::RecursoNoEncontrado(format!(
                "Usuario {} no encontrado",
                id
            )));
        }

        self.usuario_repo.asignar_roles(id, &payload.roles).await?;
        self.obtener(id).await
    }

    /// Todo rol asignado debe existir en la tabla de roles.
    async fn validar_roles(&self, roles: &[String]) -> Result<(), AppError> {
        for rol in roles {
            if self.rol_repo.buscar_por_nombre(rol).await?.is_none() {
                return Err(AppError::Conflicto(format!("El rol '{}' no existe.", rol)));
            }
        }
        Ok(())
    }
}
