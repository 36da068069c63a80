// src/db/configuracion_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::configuracion::{ActualizarConfiguracionPayload, ConfiguracionSistema},
};

const COLUMNAS: &str = "id, nombre_empresa, direccion_empresa, telefono_empresa, email_contacto, \
                        logo_url, color_primario, smtp_host, smtp_port, smtp_usuario, smtp_password, \
                        smtp_ssl_habilitado, dias_inactividad_alerta, habilitar_notificaciones, \
                        ultima_actualizacion, usuario_actualizacion";

#[derive(Clone)]
pub struct ConfiguracionRepository {
    pool: PgPool,
}

impl ConfiguracionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// La tabla guarda una sola fila; si todavía no existe, el servicio
    /// la crea con valores por defecto.
    pub async fn obtener(&self) -> Result<Option<ConfiguracionSistema>, AppError> {
        let config = sqlx::query_as::<_, ConfiguracionSistema>(&format!(
            "SELECT {COLUMNAS} FROM configuracion_sistema ORDER BY ultima_actualizacion ASC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(config)
    }

    pub async fn crear_defecto(&self) -> Result<ConfiguracionSistema, AppError> {
        let config = sqlx::query_as::<_, ConfiguracionSistema>(&format!(
            r#"
            INSERT INTO configuracion_sistema (nombre_empresa)
            VALUES ('InformViva Gest')
            RETURNING {COLUMNAS}
            "#
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(config)
    }

    pub async fn actualizar(
        &self,
        payload: &ActualizarConfiguracionPayload,
        usuario: &str,
    ) -> Result<Option<ConfiguracionSistema>, AppError> {
        let config = sqlx::query_as::<_, ConfiguracionSistema>(&format!(
            r#"
            UPDATE configuracion_sistema
            SET nombre_empresa = $1, direccion_empresa = $2, telefono_empresa = $3,
                email_contacto = $4, logo_url = $5, color_primario = $6,
                smtp_host = $7, smtp_port = $8, smtp_usuario = $9,
                smtp_password = COALESCE($10, smtp_password),
                smtp_ssl_habilitado = $11, dias_inactividad_alerta = $12,
                habilitar_notificaciones = $13,
                ultima_actualizacion = NOW(), usuario_actualizacion = $14
            RETURNING {COLUMNAS}
            "#
        ))
        .bind(&payload.nombre_empresa)
        .bind(&payload.direccion_empresa)
        .bind(&payload.telefono_empresa)
        .bind(&payload.email_contacto)
        .bind(&payload.logo_url)
        .bind(&payload.color_primario)
        .bind(&payload.smtp_host)
        .bind(payload.smtp_port)
        .bind(&payload.smtp_usuario)
        .bind(&payload.smtp_password)
        .bind(payload.smtp_ssl_habilitado)
        .bind(payload.dias_inactividad_alerta)
        .bind(payload.habilitar_notificaciones)
        .bind(usuario)
        .fetch_optional(&self.pool)
        .await?;

        Ok(config)
    }
}
