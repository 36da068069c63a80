// src/services/configuracion_service.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    db::ConfiguracionRepository,
    models::configuracion::{ActualizarConfiguracionPayload, ConfiguracionSistema},
};

#[derive(Clone)]
pub struct ConfiguracionService {
    configuracion_repo: ConfiguracionRepository,
}

impl ConfiguracionService {
    pub fn new(configuracion_repo: ConfiguracionRepository) -> Self {
        Self { configuracion_repo }
    }

    /// Devuelve la configuración vigente; la crea con valores por defecto
    /// si el sistema nunca se configuró.
    pub async fn obtener(&self) -> Result<ConfiguracionSistema, AppError> {
        match self.configuracion_repo.obtener().await? {
            Some(config) => Ok(config),
            None => self.configuracion_repo.crear_defecto().await,
        }
    }

    pub async fn actualizar(
        &self,
        payload: ActualizarConfiguracionPayload,
        usuario: &str,
    ) -> Result<ConfiguracionSistema, AppError> {
        payload.validate()?;

        // Garantiza que exista la fila única antes del UPDATE
        self.obtener().await?;

        self.configuracion_repo
            .actualizar(&payload, usuario)
            .await?
            .ok_or_else(|| anyhow::anyhow!("La configuración desapareció durante la actualización").into())
    }
}
