// src/services/venta_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, paginacion::Pagina},
    db::{ProductoRepository, VentaRepository},
    models::{
        producto::Producto,
        venta::{CrearVentaPayload, VentaConDetalles, VentaListado, TASA_IVA},
    },
};

/// Totales de una venta, calculados a partir de sus líneas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totales {
    pub subtotal: Decimal,
    pub impuesto: Decimal,
    pub total: Decimal,
}

/// Subtotal de una línea: cantidad por precio menos el descuento absoluto.
pub fn total_linea(cantidad: i32, precio_unitario: Decimal, descuento: Decimal) -> Decimal {
    Decimal::from(cantidad) * precio_unitario - descuento
}

/// Impuesto del 19% sobre el subtotal, redondeado a dos decimales con el
/// medio exacto hacia arriba.
pub fn calcular_totales(lineas: &[Decimal]) -> Totales {
    let subtotal: Decimal = lineas.iter().copied().sum();
    let impuesto =
        (subtotal * TASA_IVA).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Totales {
        subtotal,
        impuesto,
        total: subtotal + impuesto,
    }
}

#[derive(Clone)]
pub struct VentaService {
    venta_repo: VentaRepository,
    producto_repo: ProductoRepository,
}

impl VentaService {
    pub fn new(venta_repo: VentaRepository, producto_repo: ProductoRepository) -> Self {
        Self {
            venta_repo,
            producto_repo,
        }
    }

    pub async fn listar_paginadas(
        &self,
        pagina: usize,
        tamanio: usize,
    ) -> Result<Pagina<VentaListado>, AppError> {
        let tamanio = tamanio.max(1);
        let (ventas, total) = self.venta_repo.listar_paginadas(pagina, tamanio).await?;
        Ok(Pagina::desde_consulta(ventas, pagina, tamanio, total))
    }

    pub async fn obtener(&self, id: Uuid) -> Result<VentaConDetalles, AppError> {
        let venta = self
            .venta_repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::RecursoNoEncontrado(format!("Venta {} no encontrada", id)))?;

        let detalles = self.venta_repo.detalles(id).await?;

        Ok(VentaConDetalles { venta, detalles })
    }

    pub async fn buscar_por_rango(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<VentaListado>, AppError> {
        self.venta_repo.buscar_por_rango(desde, hasta).await
    }

    /// Registra la venta completa en una transacción: bloquea cada producto,
    /// descuenta stock y recién entonces inserta la cabecera y las líneas.
    /// Cualquier falla revierte todo.
    pub async fn crear(
        &self,
        vendedor_id: Uuid,
        payload: CrearVentaPayload,
    ) -> Result<VentaConDetalles, AppError> {
        payload.validate()?;

        let mut tx = self.venta_repo.pool().begin().await?;

        // (producto, cantidad, descuento, total de línea)
        let mut lineas: Vec<(Producto, i32, Decimal, Decimal)> =
            Vec::with_capacity(payload.detalles.len());

        for detalle in &payload.detalles {
            let producto = self
                .producto_repo
                .obtener_para_venta(&mut tx, detalle.producto_id)
                .await?
                .ok_or_else(|| {
                    AppError::RecursoNoEncontrado(format!(
                        "Producto {} no encontrado",
                        detalle.producto_id
                    ))
                })?;

            if !producto.activo {
                return Err(AppError::Conflicto(format!(
                    "El producto '{}' está inactivo.",
                    producto.nombre
                )));
            }

            let descuento = detalle.descuento.unwrap_or(Decimal::ZERO);
            if descuento < Decimal::ZERO {
                return Err(AppError::Conflicto(
                    "El descuento no puede ser negativo.".to_string(),
                ));
            }

            let total = total_linea(detalle.cantidad, producto.precio, descuento);
            if total < Decimal::ZERO {
                return Err(AppError::Conflicto(format!(
                    "El descuento supera el valor de la línea de '{}'.",
                    producto.nombre
                )));
            }

            let afectadas = self
                .producto_repo
                .descontar_stock(&mut tx, producto.id, detalle.cantidad)
                .await?;

            if afectadas == 0 {
                return Err(AppError::StockInsuficiente(format!(
                    "Stock insuficiente para '{}': disponible {}, solicitado {}",
                    producto.nombre, producto.stock, detalle.cantidad
                )));
            }

            lineas.push((producto, detalle.cantidad, descuento, total));
        }

        let totales = calcular_totales(
            &lineas.iter().map(|(_, _, _, t)| *t).collect::<Vec<_>>(),
        );

        if totales.subtotal <= Decimal::ZERO {
            return Err(AppError::Conflicto(
                "El total de la venta debe ser mayor que cero.".to_string(),
            ));
        }

        let venta = self
            .venta_repo
            .insertar_venta(
                &mut tx,
                Utc::now(),
                payload.cliente_id,
                vendedor_id,
                totales.subtotal,
                totales.impuesto,
                totales.total,
                payload.metodo_pago.as_deref(),
                payload.observaciones.as_deref(),
            )
            .await?;

        for (producto, cantidad, descuento, total) in &lineas {
            self.venta_repo
                .insertar_detalle(
                    &mut tx,
                    venta.id,
                    producto.id,
                    *cantidad,
                    producto.precio,
                    *descuento,
                    *total,
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!(venta_id = %venta.id, total = %venta.total, "Venta registrada");
        self.obtener(venta.id).await
    }

    /// Anula la venta y devuelve el stock de cada línea. Anular dos veces
    /// es un conflicto, no una operación idempotente.
    pub async fn anular(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.venta_repo.pool().begin().await?;

        let venta = self
            .venta_repo
            .obtener_para_anular(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::RecursoNoEncontrado(format!("Venta {} no encontrada", id)))?;

        if venta.anulada() {
            return Err(AppError::Conflicto(
                "La venta ya se encuentra anulada.".to_string(),
            ));
        }

        let detalles = self.venta_repo.detalles_por_venta(&mut tx, id).await?;

        for (producto_id, cantidad) in detalles {
            self.producto_repo
                .restaurar_stock(&mut tx, producto_id, cantidad)
                .await?;
        }

        self.venta_repo.anular(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(venta_id = %id, "Venta anulada y stock restaurado");
        Ok(())
    }

    pub async fn historial_cliente(&self, cliente_id: Uuid) -> Result<Vec<VentaListado>, AppError> {
        self.venta_repo.recientes_por_cliente(cliente_id, 20).await
    }

    /// Compras realizadas y monto acumulado del cliente, sin las anuladas.
    pub async fn estadisticas_cliente(&self, cliente_id: Uuid) -> Result<(i64, Decimal), AppError> {
        let compras = self.venta_repo.contar_por_cliente(cliente_id).await?;
        let total = self.venta_repo.total_por_cliente(cliente_id).await?;
        Ok((compras, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(valor: i64, escala: u32) -> Decimal {
        Decimal::new(valor, escala)
    }

    #[test]
    fn total_linea_multiplica_y_descuenta() {
        // 3 x $10.000 - $500 = $29.500
        assert_eq!(total_linea(3, dec(10_000, 0), dec(500, 0)), dec(29_500, 0));
    }

    #[test]
    fn totales_aplican_iva_del_19_por_ciento() {
        let totales = calcular_totales(&[dec(10_000, 0)]);
        assert_eq!(totales.subtotal, dec(10_000, 0));
        assert_eq!(totales.impuesto, dec(1_900_00, 2));
        assert_eq!(totales.total, dec(11_900_00, 2));
    }

    #[test]
    fn totales_suman_varias_lineas() {
        let totales = calcular_totales(&[dec(1_000, 0), dec(2_500, 0), dec(500, 0)]);
        assert_eq!(totales.subtotal, dec(4_000, 0));
        assert_eq!(totales.impuesto, dec(760_00, 2));
    }

    #[test]
    fn el_iva_se_redondea_a_dos_decimales() {
        // 333 * 0.19 = 63.27
        let totales = calcular_totales(&[dec(333, 0)]);
        assert_eq!(totales.impuesto, dec(63_27, 2));
    }

    #[test]
    fn el_medio_exacto_del_iva_sube() {
        // 7.50 * 0.19 = 1.425; el medio exacto sube a 1.43, no baja al par
        let totales = calcular_totales(&[dec(7_50, 2)]);
        assert_eq!(totales.impuesto, dec(1_43, 2));
    }

    #[test]
    fn sin_lineas_todo_queda_en_cero() {
        let totales = calcular_totales(&[]);
        assert_eq!(totales.subtotal, Decimal::ZERO);
        assert_eq!(totales.total, Decimal::ZERO);
    }

    use sqlx::PgPool;

    async fn sembrar_cliente(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO clientes (nombre, apellido, email, rut)
             VALUES ('Ana', 'Soto', 'ana.soto@correo.cl', '12.345.678-5')
             RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn sembrar_vendedor(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO usuarios (username, password_hash, nombre, apellido, email)
             VALUES ('vendedor', 'hash', 'Pedro', 'Rojas', 'pedro.rojas@correo.cl')
             RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn sembrar_venta(
        pool: &PgPool,
        cliente_id: Uuid,
        vendedor_id: Uuid,
        total: Decimal,
        estado: &str,
    ) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO ventas (cliente_id, vendedor_id, subtotal, impuesto, total, estado)
             VALUES ($1, $2, $3, 0, $3, $4)
             RETURNING id",
        )
        .bind(cliente_id)
        .bind(vendedor_id)
        .bind(total)
        .bind(estado)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test]
    async fn las_estadisticas_del_cliente_ignoran_las_anuladas(pool: PgPool) {
        let cliente = sembrar_cliente(&pool).await;
        let vendedor = sembrar_vendedor(&pool).await;

        sembrar_venta(&pool, cliente, vendedor, dec(100_00, 2), "COMPLETADA").await;
        sembrar_venta(&pool, cliente, vendedor, dec(50_00, 2), "ANULADA").await;

        let servicio = VentaService::new(
            crate::db::VentaRepository::new(pool.clone()),
            crate::db::ProductoRepository::new(pool),
        );

        let (compras, total) = servicio.estadisticas_cliente(cliente).await.unwrap();
        assert_eq!(compras, 1);
        assert_eq!(total, dec(100_00, 2));
    }
}
