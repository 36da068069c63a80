// src/db/venta_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::venta::{DetalleListado, Venta, VentaListado, ESTADO_ANULADA},
};

const COLUMNAS: &str = "id, fecha, cliente_id, vendedor_id, subtotal, impuesto, total, \
                        metodo_pago, observaciones, estado";

// SELECT del listado con los nombres de cliente y vendedor ya resueltos
const LISTADO: &str = r#"
    SELECT
        v.id, v.fecha, v.cliente_id,
        c.nombre || ' ' || c.apellido AS cliente_nombre,
        v.vendedor_id,
        u.nombre || ' ' || u.apellido AS vendedor_nombre,
        v.subtotal, v.impuesto, v.total, v.metodo_pago, v.estado
    FROM ventas v
    JOIN clientes c ON c.id = v.cliente_id
    JOIN usuarios u ON u.id = v.vendedor_id
"#;

#[derive(Clone)]
pub struct VentaRepository {
    pool: PgPool,
}

impl VentaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn listar_paginadas(
        &self,
        pagina: usize,
        tamanio: usize,
    ) -> Result<(Vec<VentaListado>, usize), AppError> {
        let ventas = sqlx::query_as::<_, VentaListado>(&format!(
            "{LISTADO} ORDER BY v.fecha DESC LIMIT $1 OFFSET $2"
        ))
        .bind(tamanio as i64)
        .bind((pagina * tamanio) as i64)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ventas")
            .fetch_one(&self.pool)
            .await?;

        Ok((ventas, total as usize))
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Option<VentaListado>, AppError> {
        let venta = sqlx::query_as::<_, VentaListado>(&format!("{LISTADO} WHERE v.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(venta)
    }

    pub async fn detalles(&self, venta_id: Uuid) -> Result<Vec<DetalleListado>, AppError> {
        let detalles = sqlx::query_as::<_, DetalleListado>(
            r#"
            SELECT
                d.id, d.producto_id,
                p.codigo AS producto_codigo,
                p.nombre AS producto_nombre,
                d.cantidad, d.precio_unitario, d.descuento, d.total
            FROM venta_detalles d
            JOIN productos p ON p.id = d.producto_id
            WHERE d.venta_id = $1
            ORDER BY p.nombre ASC
            "#,
        )
        .bind(venta_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(detalles)
    }

    pub async fn buscar_por_rango(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<VentaListado>, AppError> {
        let ventas = sqlx::query_as::<_, VentaListado>(&format!(
            "{LISTADO} WHERE v.fecha::date BETWEEN $1 AND $2 ORDER BY v.fecha DESC"
        ))
        .bind(desde)
        .bind(hasta)
        .fetch_all(&self.pool)
        .await?;

        Ok(ventas)
    }

    // --- Escrituras dentro de la transacción de venta ---

    pub async fn insertar_venta(
        &self,
        conn: &mut PgConnection,
        fecha: DateTime<Utc>,
        cliente_id: Uuid,
        vendedor_id: Uuid,
        subtotal: Decimal,
        impuesto: Decimal,
        total: Decimal,
        metodo_pago: Option<&str>,
        observaciones: Option<&str>,
    ) -> Result<Venta, AppError> {
        let venta = sqlx::query_as::<_, Venta>(&format!(
            r#"
            INSERT INTO ventas (fecha, cliente_id, vendedor_id, subtotal, impuesto, total, metodo_pago, observaciones)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNAS}
            "#
        ))
        .bind(fecha)
        .bind(cliente_id)
        .bind(vendedor_id)
        .bind(subtotal)
        .bind(impuesto)
        .bind(total)
        .bind(metodo_pago)
        .bind(observaciones)
        .fetch_one(&mut *conn)
        .await?;

        Ok(venta)
    }

    pub async fn insertar_detalle(
        &self,
        conn: &mut PgConnection,
        venta_id: Uuid,
        producto_id: Uuid,
        cantidad: i32,
        precio_unitario: Decimal,
        descuento: Decimal,
        total: Decimal,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO venta_detalles (venta_id, producto_id, cantidad, precio_unitario, descuento, total)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(venta_id)
        .bind(producto_id)
        .bind(cantidad)
        .bind(precio_unitario)
        .bind(descuento)
        .bind(total)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Marca la venta como anulada y bloquea la fila; devuelve la venta
    /// previa al cambio para que el servicio decida si restaurar stock.
    pub async fn obtener_para_anular(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Venta>, AppError> {
        let venta = sqlx::query_as::<_, Venta>(&format!(
            "SELECT {COLUMNAS} FROM ventas WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(venta)
    }

    pub async fn anular(&self, conn: &mut PgConnection, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE ventas SET estado = $2 WHERE id = $1")
            .bind(id)
            .bind(ESTADO_ANULADA)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn detalles_por_venta(
        &self,
        conn: &mut PgConnection,
        venta_id: Uuid,
    ) -> Result<Vec<(Uuid, i32)>, AppError> {
        let filas = sqlx::query_as::<_, (Uuid, i32)>(
            "SELECT producto_id, cantidad FROM venta_detalles WHERE venta_id = $1",
        )
        .bind(venta_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(filas)
    }

    // --- Consultas de integridad referencial ---

    pub async fn existen_por_cliente(&self, cliente_id: Uuid) -> Result<bool, AppError> {
        let existen = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM ventas WHERE cliente_id = $1)",
        )
        .bind(cliente_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(existen)
    }

    pub async fn existen_por_producto(&self, producto_id: Uuid) -> Result<bool, AppError> {
        let existen = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM venta_detalles WHERE producto_id = $1)",
        )
        .bind(producto_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(existen)
    }

    // --- Estadísticas puntuales para las fichas de cliente y producto ---

    pub async fn recientes_por_cliente(
        &self,
        cliente_id: Uuid,
        limite: i64,
    ) -> Result<Vec<VentaListado>, AppError> {
        let ventas = sqlx::query_as::<_, VentaListado>(&format!(
            "{LISTADO} WHERE v.cliente_id = $1 ORDER BY v.fecha DESC LIMIT $2"
        ))
        .bind(cliente_id)
        .bind(limite)
        .fetch_all(&self.pool)
        .await?;

        Ok(ventas)
    }

    pub async fn contar_por_cliente(&self, cliente_id: Uuid) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM ventas WHERE cliente_id = $1 AND estado <> 'ANULADA'",
        )
        .bind(cliente_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn total_por_cliente(&self, cliente_id: Uuid) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total), 0) FROM ventas WHERE cliente_id = $1 AND estado <> 'ANULADA'",
        )
        .bind(cliente_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn unidades_por_producto(&self, producto_id: Uuid) -> Result<i64, AppError> {
        let unidades = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(d.cantidad), 0)::BIGINT
            FROM venta_detalles d
            JOIN ventas v ON v.id = d.venta_id
            WHERE d.producto_id = $1 AND v.estado <> 'ANULADA'
            "#,
        )
        .bind(producto_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(unidades)
    }

    pub async fn ingresos_por_producto(&self, producto_id: Uuid) -> Result<Decimal, AppError> {
        let ingresos = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(d.total), 0)
            FROM venta_detalles d
            JOIN ventas v ON v.id = d.venta_id
            WHERE d.producto_id = $1 AND v.estado <> 'ANULADA'
            "#,
        )
        .bind(producto_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ingresos)
    }
}
