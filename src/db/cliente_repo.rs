// src/db/cliente_repo.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{cliente::Cliente, reporte::ClienteReporte},
};

const COLUMNAS: &str =
    "id, nombre, apellido, email, telefono, direccion, rut, fecha_registro, categoria";

#[derive(Clone)]
pub struct ClienteRepository {
    pool: PgPool,
}

impl ClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar_todos(&self) -> Result<Vec<Cliente>, AppError> {
        let clientes = sqlx::query_as::<_, Cliente>(&format!(
            "SELECT {COLUMNAS} FROM clientes ORDER BY apellido ASC, nombre ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(clientes)
    }

    pub async fn listar_paginados(
        &self,
        pagina: usize,
        tamanio: usize,
    ) -> Result<(Vec<Cliente>, usize), AppError> {
        let clientes = sqlx::query_as::<_, Cliente>(&format!(
            "SELECT {COLUMNAS} FROM clientes ORDER BY apellido ASC, nombre ASC LIMIT $1 OFFSET $2"
        ))
        .bind(tamanio as i64)
        .bind((pagina * tamanio) as i64)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clientes")
            .fetch_one(&self.pool)
            .await?;

        Ok((clientes, total as usize))
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(&format!(
            "SELECT {COLUMNAS} FROM clientes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cliente)
    }

    /// Búsqueda simple por nombre, apellido o email.
    pub async fn buscar_por_texto(&self, texto: &str) -> Result<Vec<Cliente>, AppError> {
        let patron = format!("%{}%", texto);

        let clientes = sqlx::query_as::<_, Cliente>(&format!(
            r#"
            SELECT {COLUMNAS}
            FROM clientes
            WHERE nombre ILIKE $1 OR apellido ILIKE $1 OR email ILIKE $1
            ORDER BY apellido ASC, nombre ASC
            "#
        ))
        .bind(patron)
        .fetch_all(&self.pool)
        .await?;

        Ok(clientes)
    }

    pub async fn crear(
        &self,
        nombre: &str,
        apellido: &str,
        email: &str,
        telefono: Option<&str>,
        direccion: Option<&str>,
        rut: &str,
        categoria: Option<&str>,
    ) -> Result<Cliente, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(&format!(
            r#"
            INSERT INTO clientes (nombre, apellido, email, telefono, direccion, rut, fecha_registro, categoria)
            VALUES ($1, $2, $3, $4, $5, $6, CURRENT_DATE, $7)
            RETURNING {COLUMNAS}
            "#
        ))
        .bind(nombre)
        .bind(apellido)
        .bind(email)
        .bind(telefono)
        .bind(direccion)
        .bind(rut)
        .bind(categoria)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflicto(format!("Ya existe un cliente con el email '{}'.", email));
                }
            }
            e.into()
        })?;

        Ok(cliente)
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        nombre: &str,
        apellido: &str,
        email: &str,
        telefono: Option<&str>,
        direccion: Option<&str>,
        rut: &str,
        categoria: Option<&str>,
    ) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(&format!(
            r#"
            UPDATE clientes
            SET nombre = $2, apellido = $3, email = $4, telefono = $5,
                direccion = $6, rut = $7, categoria = $8
            WHERE id = $1
            RETURNING {COLUMNAS}
            "#
        ))
        .bind(id)
        .bind(nombre)
        .bind(apellido)
        .bind(email)
        .bind(telefono)
        .bind(direccion)
        .bind(rut)
        .bind(categoria)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflicto(format!("Ya existe un cliente con el email '{}'.", email));
                }
            }
            e.into()
        })?;

        Ok(cliente)
    }

    pub async fn eliminar(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn existe_email(&self, email: &str, excluir: Option<Uuid>) -> Result<bool, AppError> {
        let existe = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM clientes WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;

        Ok(existe)
    }

    pub async fn contar_nuevos_entre(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM clientes WHERE fecha_registro BETWEEN $1 AND $2",
        )
        .bind(desde)
        .bind(hasta)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Clientes con al menos una compra no anulada en el rango (o histórica si
    /// no se entrega rango), con sus totales agregados. El promedio por compra
    /// lo completa el servicio.
    pub async fn reporte_compras(
        &self,
        desde: Option<NaiveDate>,
        hasta: Option<NaiveDate>,
    ) -> Result<Vec<ClienteReporte>, AppError> {
        let filas = sqlx::query_as::<_, ClienteReporte>(
            r#"
            SELECT
                c.id,
                c.rut,
                c.nombre || ' ' || c.apellido AS nombre_completo,
                c.email,
                c.fecha_registro,
                COUNT(v.id) AS compras_realizadas,
                COALESCE(SUM(v.total), 0) AS total_compras,
                MAX(v.fecha::date) AS ultima_compra
            FROM clientes c
            JOIN ventas v ON v.cliente_id = c.id AND v.estado <> 'ANULADA'
            WHERE ($1::date IS NULL OR v.fecha::date >= $1)
              AND ($2::date IS NULL OR v.fecha::date <= $2)
            GROUP BY c.id, c.rut, c.nombre, c.apellido, c.email, c.fecha_registro
            ORDER BY total_compras DESC
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas)
    }
}
