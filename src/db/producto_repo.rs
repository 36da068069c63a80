// src/db/producto_repo.rs

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::producto::{Categoria, Producto},
};

const COLUMNAS: &str = "id, codigo, nombre, descripcion, precio, stock, categoria_id, \
                        marca, modelo, activo, fecha_creacion, fecha_actualizacion";

#[derive(Clone)]
pub struct ProductoRepository {
    pool: PgPool,
}

impl ProductoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar_todos(&self) -> Result<Vec<Producto>, AppError> {
        let productos = sqlx::query_as::<_, Producto>(&format!(
            "SELECT {COLUMNAS} FROM productos ORDER BY nombre ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(productos)
    }

    pub async fn listar_activos(&self) -> Result<Vec<Producto>, AppError> {
        let productos = sqlx::query_as::<_, Producto>(&format!(
            "SELECT {COLUMNAS} FROM productos WHERE activo = TRUE ORDER BY nombre ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(productos)
    }

    pub async fn listar_paginados(
        &self,
        pagina: usize,
        tamanio: usize,
    ) -> Result<(Vec<Producto>, usize), AppError> {
        let productos = sqlx::query_as::<_, Producto>(&format!(
            "SELECT {COLUMNAS} FROM productos ORDER BY nombre ASC LIMIT $1 OFFSET $2"
        ))
        .bind(tamanio as i64)
        .bind((pagina * tamanio) as i64)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM productos")
            .fetch_one(&self.pool)
            .await?;

        Ok((productos, total as usize))
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<Producto>, AppError> {
        let producto = sqlx::query_as::<_, Producto>(&format!(
            "SELECT {COLUMNAS} FROM productos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(producto)
    }

    pub async fn buscar_por_codigo(&self, codigo: &str) -> Result<Option<Producto>, AppError> {
        let producto = sqlx::query_as::<_, Producto>(&format!(
            "SELECT {COLUMNAS} FROM productos WHERE codigo = $1"
        ))
        .bind(codigo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(producto)
    }

    pub async fn buscar_por_nombre(&self, nombre: &str) -> Result<Vec<Producto>, AppError> {
        let patron = format!("%{}%", nombre);

        let productos = sqlx::query_as::<_, Producto>(&format!(
            "SELECT {COLUMNAS} FROM productos WHERE nombre ILIKE $1 ORDER BY nombre ASC"
        ))
        .bind(patron)
        .fetch_all(&self.pool)
        .await?;

        Ok(productos)
    }

    pub async fn listar_bajo_stock(&self, umbral: i32) -> Result<Vec<Producto>, AppError> {
        let productos = sqlx::query_as::<_, Producto>(&format!(
            "SELECT {COLUMNAS} FROM productos WHERE activo = TRUE AND stock < $1 ORDER BY stock ASC"
        ))
        .bind(umbral)
        .fetch_all(&self.pool)
        .await?;

        Ok(productos)
    }

    pub async fn existe_codigo(&self, codigo: &str, excluir: Option<Uuid>) -> Result<bool, AppError> {
        let existe = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM productos WHERE codigo = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(codigo)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;

        Ok(existe)
    }

    pub async fn crear(
        &self,
        codigo: &str,
        nombre: &str,
        descripcion: Option<&str>,
        precio: rust_decimal::Decimal,
        stock: i32,
        categoria_id: Option<Uuid>,
        marca: Option<&str>,
        modelo: Option<&str>,
    ) -> Result<Producto, AppError> {
        let producto = sqlx::query_as::<_, Producto>(&format!(
            r#"
            INSERT INTO productos (codigo, nombre, descripcion, precio, stock, categoria_id, marca, modelo)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNAS}
            "#
        ))
        .bind(codigo)
        .bind(nombre)
        .bind(descripcion)
        .bind(precio)
        .bind(stock)
        .bind(categoria_id)
        .bind(marca)
        .bind(modelo)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflicto(format!("Ya existe un producto con el código '{}'.", codigo));
                }
            }
            e.into()
        })?;

        Ok(producto)
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        codigo: &str,
        nombre: &str,
        descripcion: Option<&str>,
        precio: rust_decimal::Decimal,
        stock: i32,
        categoria_id: Option<Uuid>,
        marca: Option<&str>,
        modelo: Option<&str>,
        activo: bool,
    ) -> Result<Option<Producto>, AppError> {
        let producto = sqlx::query_as::<_, Producto>(&format!(
            r#"
            UPDATE productos
            SET codigo = $2, nombre = $3, descripcion = $4, precio = $5, stock = $6,
                categoria_id = $7, marca = $8, modelo = $9, activo = $10,
                fecha_actualizacion = NOW()
            WHERE id = $1
            RETURNING {COLUMNAS}
            "#
        ))
        .bind(id)
        .bind(codigo)
        .bind(nombre)
        .bind(descripcion)
        .bind(precio)
        .bind(stock)
        .bind(categoria_id)
        .bind(marca)
        .bind(modelo)
        .bind(activo)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflicto(format!("Ya existe un producto con el código '{}'.", codigo));
                }
            }
            e.into()
        })?;

        Ok(producto)
    }

    pub async fn actualizar_stock(&self, id: Uuid, nuevo_stock: i32) -> Result<Option<Producto>, AppError> {
        let producto = sqlx::query_as::<_, Producto>(&format!(
            r#"
            UPDATE productos
            SET stock = $2, fecha_actualizacion = NOW()
            WHERE id = $1
            RETURNING {COLUMNAS}
            "#
        ))
        .bind(id)
        .bind(nuevo_stock)
        .fetch_optional(&self.pool)
        .await?;

        Ok(producto)
    }

    pub async fn cambiar_estado(&self, id: Uuid, activo: bool) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE productos SET activo = $2, fecha_actualizacion = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(activo)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // --- Operaciones dentro de la transacción de venta ---

    /// Busca y bloquea la fila del producto para el resto de la transacción.
    pub async fn obtener_para_venta(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Producto>, AppError> {
        let producto = sqlx::query_as::<_, Producto>(&format!(
            "SELECT {COLUMNAS} FROM productos WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(producto)
    }

    /// Descuenta stock solo si alcanza; cero filas afectadas significa
    /// stock insuficiente.
    pub async fn descontar_stock(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        cantidad: i32,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE productos
            SET stock = stock - $2, fecha_actualizacion = NOW()
            WHERE id = $1 AND stock >= $2
            "#,
        )
        .bind(id)
        .bind(cantidad)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Devuelve stock al anular una venta.
    pub async fn restaurar_stock(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        cantidad: i32,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE productos
            SET stock = stock + $2, fecha_actualizacion = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(cantidad)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    // --- Categorías ---

    pub async fn listar_categorias(&self) -> Result<Vec<Categoria>, AppError> {
        let categorias = sqlx::query_as::<_, Categoria>(
            "SELECT id, nombre, descripcion, activa FROM categorias ORDER BY nombre ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categorias)
    }

    pub async fn crear_categoria(
        &self,
        nombre: &str,
        descripcion: Option<&str>,
    ) -> Result<Categoria, AppError> {
        let categoria = sqlx::query_as::<_, Categoria>(
            r#"
            INSERT INTO categorias (nombre, descripcion)
            VALUES ($1, $2)
            RETURNING id, nombre, descripcion, activa
            "#,
        )
        .bind(nombre)
        .bind(descripcion)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflicto(format!("Ya existe la categoría '{}'.", nombre));
                }
            }
            e.into()
        })?;

        Ok(categoria)
    }
}
