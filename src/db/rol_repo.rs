// src/db/rol_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::rol::{Rol, RolVista},
};

#[derive(Clone)]
pub struct RolRepository {
    pool: PgPool,
}

impl RolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn cargar_permisos(&self, rol: &mut Rol) -> Result<(), AppError> {
        let permisos = sqlx::query_scalar::<_, String>(
            "SELECT permiso FROM rol_permisos WHERE rol_id = $1 ORDER BY permiso ASC",
        )
        .bind(rol.id)
        .fetch_all(&self.pool)
        .await?;

        rol.permisos = permisos;
        Ok(())
    }

    pub async fn listar(&self) -> Result<Vec<Rol>, AppError> {
        let mut roles = sqlx::query_as::<_, Rol>(
            "SELECT id, nombre, descripcion FROM roles ORDER BY nombre ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        for rol in roles.iter_mut() {
            self.cargar_permisos(rol).await?;
        }

        Ok(roles)
    }

    pub async fn buscar_por_nombre(&self, nombre: &str) -> Result<Option<Rol>, AppError> {
        let rol = sqlx::query_as::<_, Rol>(
            "SELECT id, nombre, descripcion FROM roles WHERE nombre = $1",
        )
        .bind(nombre)
        .fetch_optional(&self.pool)
        .await?;

        match rol {
            Some(mut r) => {
                self.cargar_permisos(&mut r).await?;
                Ok(Some(r))
            }
            None => Ok(None),
        }
    }

    pub async fn crear(
        &self,
        nombre: &str,
        descripcion: Option<&str>,
        permisos: &[String],
    ) -> Result<Rol, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut rol = sqlx::query_as::<_, Rol>(
            r#"
            INSERT INTO roles (nombre, descripcion)
            VALUES ($1, $2)
            RETURNING id, nombre, descripcion
            "#,
        )
        .bind(nombre)
        .bind(descripcion)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflicto(format!("Ya existe el rol '{}'.", nombre));
                }
            }
            e.into()
        })?;

        for permiso in permisos {
            sqlx::query("INSERT INTO rol_permisos (rol_id, permiso) VALUES ($1, $2)")
                .bind(rol.id)
                .bind(permiso)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        rol.permisos = permisos.to_vec();
        Ok(rol)
    }

    pub async fn actualizar(
        &self,
        nombre: &str,
        descripcion: Option<&str>,
        permisos: &[String],
    ) -> Result<Option<Rol>, AppError> {
        let mut tx = self.pool.begin().await?;

        let rol = sqlx::query_as::<_, Rol>(
            r#"
            UPDATE roles
            SET descripcion = $2
            WHERE nombre = $1
            RETURNING id, nombre, descripcion
            "#,
        )
        .bind(nombre)
        .bind(descripcion)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut rol) = rol else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM rol_permisos WHERE rol_id = $1")
            .bind(rol.id)
            .execute(&mut *tx)
            .await?;

        for permiso in permisos {
            sqlx::query("INSERT INTO rol_permisos (rol_id, permiso) VALUES ($1, $2)")
                .bind(rol.id)
                .bind(permiso)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        rol.permisos = permisos.to_vec();
        Ok(Some(rol))
    }

    pub async fn eliminar(&self, nombre: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM roles WHERE nombre = $1")
            .bind(nombre)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Un rol está en uso si algún usuario lo tiene asignado.
    pub async fn en_uso(&self, nombre: &str) -> Result<bool, AppError> {
        let en_uso = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM usuario_roles WHERE rol = $1)",
        )
        .bind(nombre)
        .fetch_one(&self.pool)
        .await?;

        Ok(en_uso)
    }

    // --- Auditoría de vistas ---

    pub async fn registrar_vista(&self, rol_nombre: &str, usuario: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO rol_vistas (rol_nombre, usuario) VALUES ($1, $2)")
            .bind(rol_nombre)
            .bind(usuario)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn listar_vistas(&self, rol_nombre: &str) -> Result<Vec<RolVista>, AppError> {
        let vistas = sqlx::query_as::<_, RolVista>(
            r#"
            SELECT id, rol_nombre, usuario, fecha_vista
            FROM rol_vistas
            WHERE rol_nombre = $1
            ORDER BY fecha_vista DESC
            LIMIT 100
            "#,
        )
        .bind(rol_nombre)
        .fetch_all(&self.pool)
        .await?;

        Ok(vistas)
    }
}
