// src/db/usuario_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::usuario::Usuario};

const COLUMNAS: &str = "id, username, password_hash, nombre, apellido, email, \
                        activo, fecha_creacion, ultimo_acceso";

#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn cargar_roles(&self, usuario: &mut Usuario) -> Result<(), AppError> {
        let roles = sqlx::query_scalar::<_, String>(
            "SELECT rol FROM usuario_roles WHERE usuario_id = $1 ORDER BY rol ASC",
        )
        .bind(usuario.id)
        .fetch_all(&self.pool)
        .await?;

        usuario.roles = roles;
        Ok(())
    }

    pub async fn listar(&self) -> Result<Vec<Usuario>, AppError> {
        let mut usuarios = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {COLUMNAS} FROM usuarios ORDER BY username ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        for usuario in usuarios.iter_mut() {
            self.cargar_roles(usuario).await?;
        }

        Ok(usuarios)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {COLUMNAS} FROM usuarios WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match usuario {
            Some(mut u) => {
                self.cargar_roles(&mut u).await?;
                Ok(Some(u))
            }
            None => Ok(None),
        }
    }

    pub async fn buscar_por_username(&self, username: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {COLUMNAS} FROM usuarios WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match usuario {
            Some(mut u) => {
                self.cargar_roles(&mut u).await?;
                Ok(Some(u))
            }
            None => Ok(None),
        }
    }

    pub async fn crear(
        &self,
        username: &str,
        password_hash: &str,
        nombre: &str,
        apellido: &str,
        email: &str,
        roles: &[String],
    ) -> Result<Usuario, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut usuario = sqlx::query_as::<_, Usuario>(&format!(
            r#"
            INSERT INTO usuarios (username, password_hash, nombre, apellido, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNAS}
            "#
        ))
        .bind(username)
        .bind(password_hash)
        .bind(nombre)
        .bind(apellido)
        .bind(email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflicto("El nombre de usuario o el correo ya está en uso.".to_string());
                }
            }
            e.into()
        })?;

        for rol in roles {
            sqlx::query("INSERT INTO usuario_roles (usuario_id, rol) VALUES ($1, $2)")
                .bind(usuario.id)
                .bind(rol)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        usuario.roles = roles.to_vec();
        Ok(usuario)
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        nombre: &str,
        apellido: &str,
        email: &str,
    ) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!(
            r#"
            UPDATE usuarios
            SET nombre = $2, apellido = $3, email = $4
            WHERE id = $1
            RETURNING {COLUMNAS}
            "#
        ))
        .bind(id)
        .bind(nombre)
        .bind(apellido)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflicto(format!("El correo '{}' ya está en uso.", email));
                }
            }
            e.into()
        })?;

        match usuario {
            Some(mut u) => {
                self.cargar_roles(&mut u).await?;
                Ok(Some(u))
            }
            None => Ok(None),
        }
    }

    pub async fn cambiar_password(&self, id: Uuid, password_hash: &str) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE usuarios SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn cambiar_estado(&self, id: Uuid, activo: bool) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE usuarios SET activo = $2 WHERE id = $1")
            .bind(id)
            .bind(activo)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Reemplaza el conjunto completo de roles del usuario.
    pub async fn asignar_roles(&self, id: Uuid, roles: &[String]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM usuario_roles WHERE usuario_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for rol in roles {
            sqlx::query("INSERT INTO usuario_roles (usuario_id, rol) VALUES ($1, $2)")
                .bind(id)
                .bind(rol)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn registrar_acceso(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE usuarios SET ultimo_acceso = CURRENT_DATE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
