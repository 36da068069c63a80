// src/services/reporte_service.rs

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    common::error::AppError,
    db::{ClienteRepository, ReporteRepository},
    models::reporte::{
        ClienteReporte, Metrica, ProductoVendido, VentaPorCategoria, VentaPorPeriodo, VentaResumen,
    },
};

/// Rango de fechas de un período junto con el período anterior de igual
/// duración, para las comparaciones del dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangoComparado {
    pub desde: NaiveDate,
    pub hasta: NaiveDate,
    pub desde_anterior: NaiveDate,
    pub hasta_anterior: NaiveDate,
}

/// Traduce la etiqueta de período del dashboard a fechas concretas.
/// La semana parte el lunes y el trimestre en enero, abril, julio u octubre.
/// Una etiqueta desconocida cae en "mes".
pub fn resolver_periodo(periodo: &str, hoy: NaiveDate) -> RangoComparado {
    let (desde, hasta) = match periodo {
        "hoy" => (hoy, hoy),
        "semana" => {
            let lunes = hoy - Duration::days(hoy.weekday().num_days_from_monday() as i64);
            (lunes, hoy)
        }
        "trimestre" => {
            let mes_inicio = ((hoy.month() - 1) / 3) * 3 + 1;
            let inicio = NaiveDate::from_ymd_opt(hoy.year(), mes_inicio, 1).unwrap_or(hoy);
            (inicio, hoy)
        }
        "año" | "anio" => {
            let inicio = NaiveDate::from_ymd_opt(hoy.year(), 1, 1).unwrap_or(hoy);
            (inicio, hoy)
        }
        // "mes" y cualquier etiqueta desconocida
        _ => {
            let inicio = NaiveDate::from_ymd_opt(hoy.year(), hoy.month(), 1).unwrap_or(hoy);
            (inicio, hoy)
        }
    };

    // Ventana anterior contigua, de la misma cantidad de días
    let dias = (hasta - desde).num_days() + 1;
    let hasta_anterior = desde - Duration::days(1);
    let desde_anterior = hasta_anterior - Duration::days(dias - 1);

    RangoComparado {
        desde,
        hasta,
        desde_anterior,
        hasta_anterior,
    }
}

/// Cambio porcentual entre dos valores. Con base cercana a cero devuelve
/// 100% si hay valor actual y 0% si tampoco lo hay, para no dividir por cero.
pub fn calcular_porcentaje_cambio(actual: f64, anterior: f64) -> f64 {
    if anterior.abs() < 0.0001 {
        if actual > 0.0 {
            return 100.0;
        }
        return 0.0;
    }

    (actual - anterior) / anterior * 100.0
}

/// Monto promedio por transacción; cero cuando no hubo transacciones.
/// El medio exacto se redondea hacia arriba, no al par.
pub fn ticket_promedio(total: Decimal, transacciones: i64) -> Decimal {
    if transacciones <= 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(transacciones))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Datos completos del dashboard: métricas comparadas contra el período
/// anterior más los desgloses del período vigente.
#[derive(Debug, Clone)]
pub struct DatosDashboard {
    pub ventas: Metrica,
    pub transacciones: Metrica,
    pub ticket_promedio: Metrica,
    pub clientes_nuevos: Metrica,
    pub articulos_vendidos: Metrica,
    pub productos_mas_vendidos: Vec<ProductoVendido>,
    pub ventas_por_periodo: Vec<VentaPorPeriodo>,
    pub ventas_por_categoria: Vec<VentaPorCategoria>,
}

#[derive(Clone)]
pub struct ReporteService {
    reporte_repo: ReporteRepository,
    cliente_repo: ClienteRepository,
}

impl ReporteService {
    pub fn new(reporte_repo: ReporteRepository, cliente_repo: ClienteRepository) -> Self {
        Self {
            reporte_repo,
            cliente_repo,
        }
    }

    /// Resumen completo de ventas del rango, comparado contra el período
    /// inmediatamente anterior de igual duración.
    pub async fn resumen_ventas(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<VentaResumen, AppError> {
        let dias = (hasta - desde).num_days() + 1;
        let hasta_ant = desde - Duration::days(1);
        let desde_ant = hasta_ant - Duration::days(dias - 1);

        let total_ventas = self.reporte_repo.total_ventas_entre(desde, hasta).await?;
        let total_transacciones = self
            .reporte_repo
            .contar_transacciones_entre(desde, hasta)
            .await?;
        let total_articulos = self
            .reporte_repo
            .articulos_vendidos_entre(desde, hasta)
            .await?;
        let clientes_nuevos = self.cliente_repo.contar_nuevos_entre(desde, hasta).await?;

        let ventas_ant = self
            .reporte_repo
            .total_ventas_entre(desde_ant, hasta_ant)
            .await?;
        let transacciones_ant = self
            .reporte_repo
            .contar_transacciones_entre(desde_ant, hasta_ant)
            .await?;
        let clientes_ant = self
            .cliente_repo
            .contar_nuevos_entre(desde_ant, hasta_ant)
            .await?;

        let ticket = ticket_promedio(total_ventas, total_transacciones);
        let ticket_ant = ticket_promedio(ventas_ant, transacciones_ant);

        let mut productos = self
            .reporte_repo
            .productos_mas_vendidos_entre(desde, hasta)
            .await?;

        // Participación de cada producto sobre el total vendido
        let total_f64 = total_ventas.to_f64().unwrap_or(0.0);
        for producto in productos.iter_mut() {
            let ingresos = producto.ingresos.to_f64().unwrap_or(0.0);
            producto.porcentaje_total = if total_f64.abs() < 0.0001 {
                0.0
            } else {
                ingresos / total_f64 * 100.0
            };
        }

        let ventas_por_periodo = self
            .reporte_repo
            .ventas_por_periodo_entre(desde, hasta)
            .await?;
        let ventas_por_categoria = self
            .reporte_repo
            .ventas_por_categoria_entre(desde, hasta)
            .await?;
        let ventas_por_vendedor = self
            .reporte_repo
            .ventas_por_vendedor_entre(desde, hasta)
            .await?;

        Ok(VentaResumen {
            total_ventas,
            total_transacciones,
            total_articulos_vendidos: total_articulos,
            ticket_promedio: ticket,
            clientes_nuevos,
            porcentaje_cambio_ventas: calcular_porcentaje_cambio(
                total_ventas.to_f64().unwrap_or(0.0),
                ventas_ant.to_f64().unwrap_or(0.0),
            ),
            porcentaje_cambio_transacciones: calcular_porcentaje_cambio(
                total_transacciones as f64,
                transacciones_ant as f64,
            ),
            porcentaje_cambio_ticket_promedio: calcular_porcentaje_cambio(
                ticket.to_f64().unwrap_or(0.0),
                ticket_ant.to_f64().unwrap_or(0.0),
            ),
            porcentaje_cambio_clientes_nuevos: calcular_porcentaje_cambio(
                clientes_nuevos as f64,
                clientes_ant as f64,
            ),
            productos_mas_vendidos: productos,
            ventas_por_periodo,
            ventas_por_categoria,
            ventas_por_vendedor,
        })
    }

    /// Métricas y desgloses del dashboard para el período pedido.
    pub async fn metricas_dashboard(
        &self,
        periodo: &str,
        hoy: NaiveDate,
    ) -> Result<DatosDashboard, AppError> {
        let rango = resolver_periodo(periodo, hoy);

        let ventas = self
            .reporte_repo
            .total_ventas_entre(rango.desde, rango.hasta)
            .await?;
        let transacciones = self
            .reporte_repo
            .contar_transacciones_entre(rango.desde, rango.hasta)
            .await?;
        let articulos = self
            .reporte_repo
            .articulos_vendidos_entre(rango.desde, rango.hasta)
            .await?;
        let clientes = self
            .cliente_repo
            .contar_nuevos_entre(rango.desde, rango.hasta)
            .await?;

        let ventas_ant = self
            .reporte_repo
            .total_ventas_entre(rango.desde_anterior, rango.hasta_anterior)
            .await?;
        let transacciones_ant = self
            .reporte_repo
            .contar_transacciones_entre(rango.desde_anterior, rango.hasta_anterior)
            .await?;
        let articulos_ant = self
            .reporte_repo
            .articulos_vendidos_entre(rango.desde_anterior, rango.hasta_anterior)
            .await?;
        let clientes_ant = self
            .cliente_repo
            .contar_nuevos_entre(rango.desde_anterior, rango.hasta_anterior)
            .await?;

        let ticket = ticket_promedio(ventas, transacciones).to_f64().unwrap_or(0.0);
        let ticket_ant = ticket_promedio(ventas_ant, transacciones_ant)
            .to_f64()
            .unwrap_or(0.0);

        let ventas_f64 = ventas.to_f64().unwrap_or(0.0);
        let ventas_ant_f64 = ventas_ant.to_f64().unwrap_or(0.0);

        let mut productos = self
            .reporte_repo
            .productos_mas_vendidos_entre(rango.desde, rango.hasta)
            .await?;

        for producto in productos.iter_mut() {
            let ingresos = producto.ingresos.to_f64().unwrap_or(0.0);
            producto.porcentaje_total = if ventas_f64.abs() < 0.0001 {
                0.0
            } else {
                ingresos / ventas_f64 * 100.0
            };
        }

        let ventas_por_periodo = self
            .reporte_repo
            .ventas_por_periodo_entre(rango.desde, rango.hasta)
            .await?;
        let ventas_por_categoria = self
            .reporte_repo
            .ventas_por_categoria_entre(rango.desde, rango.hasta)
            .await?;

        Ok(DatosDashboard {
            ventas: Metrica {
                valor: ventas_f64,
                porcentaje_cambio: calcular_porcentaje_cambio(ventas_f64, ventas_ant_f64),
            },
            transacciones: Metrica {
                valor: transacciones as f64,
                porcentaje_cambio: calcular_porcentaje_cambio(
                    transacciones as f64,
                    transacciones_ant as f64,
                ),
            },
            ticket_promedio: Metrica {
                valor: ticket,
                porcentaje_cambio: calcular_porcentaje_cambio(ticket, ticket_ant),
            },
            clientes_nuevos: Metrica {
                valor: clientes as f64,
                porcentaje_cambio: calcular_porcentaje_cambio(clientes as f64, clientes_ant as f64),
            },
            articulos_vendidos: Metrica {
                valor: articulos as f64,
                porcentaje_cambio: calcular_porcentaje_cambio(
                    articulos as f64,
                    articulos_ant as f64,
                ),
            },
            productos_mas_vendidos: productos,
            ventas_por_periodo,
            ventas_por_categoria,
        })
    }

    /// Reporte de clientes con sus estadísticas de compra; completa el
    /// promedio por compra que la consulta no calcula.
    pub async fn reporte_clientes(
        &self,
        desde: Option<NaiveDate>,
        hasta: Option<NaiveDate>,
    ) -> Result<Vec<ClienteReporte>, AppError> {
        let mut filas = self.cliente_repo.reporte_compras(desde, hasta).await?;

        for fila in filas.iter_mut() {
            fila.promedio_por_compra =
                ticket_promedio(fila.total_compras, fila.compras_realizadas);
        }

        Ok(filas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fecha(anio: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(anio, mes, dia).unwrap()
    }

    #[test]
    fn porcentaje_con_base_cero_y_valor_actual_es_cien() {
        assert_eq!(calcular_porcentaje_cambio(50.0, 0.0), 100.0);
    }

    #[test]
    fn porcentaje_con_base_cero_y_sin_actual_es_cero() {
        assert_eq!(calcular_porcentaje_cambio(0.0, 0.0), 0.0);
    }

    #[test]
    fn porcentaje_de_crecimiento_normal() {
        assert!((calcular_porcentaje_cambio(150.0, 100.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn porcentaje_de_caida_es_negativo() {
        assert!((calcular_porcentaje_cambio(80.0, 100.0) + 20.0).abs() < 1e-9);
    }

    #[test]
    fn ticket_promedio_sin_transacciones_es_cero() {
        assert_eq!(ticket_promedio(Decimal::new(5000, 0), 0), Decimal::ZERO);
    }

    #[test]
    fn ticket_promedio_redondea_el_medio_hacia_arriba() {
        // 0.25 / 2 = 0.125; el medio exacto sube a 0.13, no baja al par
        assert_eq!(
            ticket_promedio(Decimal::new(25, 2), 2),
            Decimal::new(13, 2)
        );
    }

    #[test]
    fn ticket_promedio_divide_y_redondea() {
        // 10.000 / 3 = 3.333,33
        assert_eq!(
            ticket_promedio(Decimal::new(10_000, 0), 3),
            Decimal::new(3_333_33, 2)
        );
    }

    #[test]
    fn periodo_hoy_compara_contra_ayer() {
        let rango = resolver_periodo("hoy", fecha(2024, 6, 15));
        assert_eq!(rango.desde, fecha(2024, 6, 15));
        assert_eq!(rango.hasta, fecha(2024, 6, 15));
        assert_eq!(rango.desde_anterior, fecha(2024, 6, 14));
        assert_eq!(rango.hasta_anterior, fecha(2024, 6, 14));
    }

    #[test]
    fn la_semana_parte_el_lunes() {
        // 2024-06-15 fue sábado; el lunes de esa semana es el 10
        let rango = resolver_periodo("semana", fecha(2024, 6, 15));
        assert_eq!(rango.desde, fecha(2024, 6, 10));
        assert_eq!(rango.hasta, fecha(2024, 6, 15));
    }

    #[test]
    fn el_mes_parte_el_primero() {
        let rango = resolver_periodo("mes", fecha(2024, 6, 15));
        assert_eq!(rango.desde, fecha(2024, 6, 1));
        // Ventana anterior de igual duración, contigua
        assert_eq!(rango.hasta_anterior, fecha(2024, 5, 31));
        assert_eq!(rango.desde_anterior, fecha(2024, 5, 17));
    }

    #[test]
    fn el_trimestre_parte_en_abril_para_junio() {
        let rango = resolver_periodo("trimestre", fecha(2024, 6, 15));
        assert_eq!(rango.desde, fecha(2024, 4, 1));
    }

    #[test]
    fn el_anio_parte_en_enero() {
        let rango = resolver_periodo("año", fecha(2024, 6, 15));
        assert_eq!(rango.desde, fecha(2024, 1, 1));
    }

    #[test]
    fn etiqueta_desconocida_cae_en_mes() {
        let rango = resolver_periodo("cualquiera", fecha(2024, 6, 15));
        assert_eq!(rango.desde, fecha(2024, 6, 1));
    }

    #[test]
    fn las_ventanas_comparadas_miden_lo_mismo() {
        let rango = resolver_periodo("semana", fecha(2024, 6, 15));
        let actual = (rango.hasta - rango.desde).num_days();
        let anterior = (rango.hasta_anterior - rango.desde_anterior).num_days();
        assert_eq!(actual, anterior);
    }
}
