// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UsuarioRepository,
    models::{
        rol::ROL_ADMIN,
        usuario::{Claims, Usuario},
    },
};

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: UsuarioRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(usuario_repo: UsuarioRepository, jwt_secret: String) -> Self {
        Self {
            usuario_repo,
            jwt_secret,
        }
    }

    /// Crea el administrador inicial si la tabla de usuarios está vacía.
    /// La contraseña por defecto debe cambiarse en el primer ingreso.
    pub async fn inicializar_admin(&self) -> Result<(), AppError> {
        if self.usuario_repo.buscar_por_username("admin").await?.is_some() {
            return Ok(());
        }

        let password_hash =
            tokio::task::spawn_blocking(move || hash("admin123", bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falló la tarea de hashing: {}", e))??;

        self.usuario_repo
            .crear(
                "admin",
                &password_hash,
                "Administrador",
                "Sistema",
                "admin@informviva.cl",
                &[ROL_ADMIN.to_string()],
            )
            .await?;

        tracing::info!("Usuario administrador inicial creado");
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let usuario = self
            .usuario_repo
            .buscar_por_username(username)
            .await?
            .ok_or(AppError::CredencialesInvalidas)?;

        let password = password.to_owned();
        let password_hash = usuario.password_hash.clone();

        // bcrypt es costoso; fuera del runtime async
        let password_valida = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falló la tarea de verificación: {}", e))??;

        if !password_valida {
            return Err(AppError::CredencialesInvalidas);
        }

        if !usuario.activo {
            return Err(AppError::UsuarioInactivo);
        }

        self.usuario_repo.registrar_acceso(usuario.id).await?;
        self.crear_token(usuario.id)
    }

    pub async fn validar_token(&self, token: &str) -> Result<Usuario, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::TokenInvalido)?;

        let usuario = self
            .usuario_repo
            .buscar_por_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::TokenInvalido)?;

        if !usuario.activo {
            return Err(AppError::UsuarioInactivo);
        }

        Ok(usuario)
    }

    pub async fn hashear_password(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_owned();

        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falló la tarea de hashing: {}", e))??;

        Ok(password_hash)
    }

    pub async fn verificar_password(&self, password: &str, hash_actual: &str) -> Result<bool, AppError> {
        let password = password.to_owned();
        let hash_actual = hash_actual.to_owned();

        let valida = tokio::task::spawn_blocking(move || verify(&password, &hash_actual))
            .await
            .map_err(|e| anyhow::anyhow!("Falló la tarea de verificación: {}", e))??;

        Ok(valida)
    }

    fn crear_token(&self, usuario_id: Uuid) -> Result<String, AppError> {
        let ahora = Utc::now();
        let expira = ahora + chrono::Duration::days(7);

        let claims = Claims {
            sub: usuario_id,
            exp: expira.timestamp() as usize,
            iat: ahora.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
