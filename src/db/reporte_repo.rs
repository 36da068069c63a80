// src/db/reporte_repo.rs

// Agregaciones de ventas para el dashboard y los reportes. Todas las
// consultas excluyen las ventas anuladas.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::reporte::{ProductoVendido, VentaPorCategoria, VentaPorPeriodo, VentaPorVendedor},
};

#[derive(Clone)]
pub struct ReporteRepository {
    pool: PgPool,
}

impl ReporteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn total_ventas_entre(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total), 0)
            FROM ventas
            WHERE estado <> 'ANULADA' AND fecha::date BETWEEN $1 AND $2
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn contar_transacciones_entre(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM ventas
            WHERE estado <> 'ANULADA' AND fecha::date BETWEEN $1 AND $2
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn articulos_vendidos_entre(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(d.cantidad), 0)::BIGINT
            FROM venta_detalles d
            JOIN ventas v ON v.id = d.venta_id
            WHERE v.estado <> 'ANULADA' AND v.fecha::date BETWEEN $1 AND $2
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Los diez productos con más unidades vendidas en el rango.
    pub async fn productos_mas_vendidos_entre(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<ProductoVendido>, AppError> {
        let filas = sqlx::query_as::<_, ProductoVendido>(
            r#"
            SELECT
                p.nombre,
                SUM(d.cantidad)::BIGINT AS unidades_vendidas,
                COALESCE(SUM(d.total), 0) AS ingresos
            FROM venta_detalles d
            JOIN ventas v ON v.id = d.venta_id
            JOIN productos p ON p.id = d.producto_id
            WHERE v.estado <> 'ANULADA' AND v.fecha::date BETWEEN $1 AND $2
            GROUP BY p.nombre
            ORDER BY unidades_vendidas DESC
            LIMIT 10
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas)
    }

    /// Total vendido por día dentro del rango, etiquetado "YYYY-MM-DD".
    pub async fn ventas_por_periodo_entre(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<VentaPorPeriodo>, AppError> {
        let filas = sqlx::query_as::<_, VentaPorPeriodo>(
            r#"
            SELECT
                to_char(fecha::date, 'YYYY-MM-DD') AS periodo,
                COALESCE(SUM(total), 0) AS total
            FROM ventas
            WHERE estado <> 'ANULADA' AND fecha::date BETWEEN $1 AND $2
            GROUP BY fecha::date
            ORDER BY fecha::date ASC
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas)
    }

    pub async fn ventas_por_categoria_entre(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<VentaPorCategoria>, AppError> {
        let filas = sqlx::query_as::<_, VentaPorCategoria>(
            r#"
            SELECT
                COALESCE(cat.nombre, 'Sin categoría') AS categoria,
                COALESCE(SUM(d.total), 0) AS total
            FROM venta_detalles d
            JOIN ventas v ON v.id = d.venta_id
            JOIN productos p ON p.id = d.producto_id
            LEFT JOIN categorias cat ON cat.id = p.categoria_id
            WHERE v.estado <> 'ANULADA' AND v.fecha::date BETWEEN $1 AND $2
            GROUP BY cat.nombre
            ORDER BY total DESC
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas)
    }

    pub async fn ventas_por_vendedor_entre(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<VentaPorVendedor>, AppError> {
        let filas = sqlx::query_as::<_, VentaPorVendedor>(
            r#"
            SELECT
                u.nombre || ' ' || u.apellido AS vendedor,
                COALESCE(SUM(v.total), 0) AS total
            FROM ventas v
            JOIN usuarios u ON u.id = v.vendedor_id
            WHERE v.estado <> 'ANULADA' AND v.fecha::date BETWEEN $1 AND $2
            GROUP BY u.nombre, u.apellido
            ORDER BY total DESC
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_all(&self.pool)
        .await?;

        Ok(filas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    async fn sembrar_venta_con_detalle(
        pool: &PgPool,
        fecha: DateTime<Utc>,
        total: Decimal,
        cantidad: i32,
        estado: &str,
    ) {
        let cliente_id: Uuid = sqlx::query_scalar(
            "INSERT INTO clientes (nombre, apellido, email, rut)
             VALUES ('Ana', 'Soto', $1, '12.345.678-5')
             RETURNING id",
        )
        .bind(format!("{}@correo.cl", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap();

        let vendedor_id: Uuid = sqlx::query_scalar(
            "INSERT INTO usuarios (username, password_hash, nombre, apellido, email)
             VALUES ($1, 'hash', 'Pedro', 'Rojas', $2)
             RETURNING id",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(format!("{}@correo.cl", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap();

        let producto_id: Uuid = sqlx::query_scalar(
            "INSERT INTO productos (codigo, nombre, precio, stock)
             VALUES ($1, 'Notebook', 100.00, 10)
             RETURNING id",
        )
        .bind(Uuid::new_v4().to_string())
        .fetch_one(pool)
        .await
        .unwrap();

        let venta_id: Uuid = sqlx::query_scalar(
            "INSERT INTO ventas (fecha, cliente_id, vendedor_id, subtotal, impuesto, total, estado)
             VALUES ($1, $2, $3, $4, 0, $4, $5)
             RETURNING id",
        )
        .bind(fecha)
        .bind(cliente_id)
        .bind(vendedor_id)
        .bind(total)
        .bind(estado)
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO venta_detalles (venta_id, producto_id, cantidad, precio_unitario, total)
             VALUES ($1, $2, $3, 100.00, $4)",
        )
        .bind(venta_id)
        .bind(producto_id)
        .bind(cantidad)
        .bind(total)
        .execute(pool)
        .await
        .unwrap();
    }

    #[sqlx::test]
    async fn las_ventas_anuladas_quedan_fuera_de_las_agregaciones(pool: PgPool) {
        let fecha: DateTime<Utc> = "2024-06-10T12:00:00Z".parse().unwrap();
        let desde = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let hasta = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        sembrar_venta_con_detalle(&pool, fecha, Decimal::new(100_00, 2), 2, "COMPLETADA").await;
        sembrar_venta_con_detalle(&pool, fecha, Decimal::new(50_00, 2), 3, "ANULADA").await;

        let repo = ReporteRepository::new(pool);

        let total = repo.total_ventas_entre(desde, hasta).await.unwrap();
        assert_eq!(total, Decimal::new(100_00, 2));

        let transacciones = repo.contar_transacciones_entre(desde, hasta).await.unwrap();
        assert_eq!(transacciones, 1);

        let articulos = repo.articulos_vendidos_entre(desde, hasta).await.unwrap();
        assert_eq!(articulos, 2);
    }
}
