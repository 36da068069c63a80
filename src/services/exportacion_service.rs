// src/services/exportacion_service.rs

// Exportadores de listados a PDF, Excel y CSV. Todos renderizan en memoria
// y devuelven el buffer listo para la respuesta HTTP.

use chrono::NaiveDate;
use genpdf::{elements, style, Element};
use rust_xlsxwriter::{Format, Workbook};

use crate::{
    common::error::AppError,
    db::ConfiguracionRepository,
    models::{
        cliente::Cliente,
        producto::Producto,
        usuario::Usuario,
        venta::{VentaConDetalles, VentaListado},
    },
};

#[derive(Clone)]
pub struct ExportacionService {
    configuracion_repo: ConfiguracionRepository,
}

impl ExportacionService {
    pub fn new(configuracion_repo: ConfiguracionRepository) -> Self {
        Self { configuracion_repo }
    }

    async fn nombre_empresa(&self) -> Result<String, AppError> {
        let nombre = self
            .configuracion_repo
            .obtener()
            .await?
            .map(|c| c.nombre_empresa)
            .unwrap_or_else(|| "InformViva Gest".to_string());

        Ok(nombre)
    }

    fn documento_base(&self, titulo: &str, empresa: &str) -> Result<genpdf::Document, AppError> {
        let fuentes = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|e| anyhow::anyhow!("No se pudo cargar la fuente: {}", e))?;

        let mut doc = genpdf::Document::new(fuentes);
        doc.set_title(titulo);

        let mut decorador = genpdf::SimplePageDecorator::new();
        decorador.set_margins(10);
        doc.set_page_decorator(decorador);

        doc.push(
            elements::Paragraph::new(empresa)
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new(titulo)
                .styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Generado el {}",
            chrono::Local::now().format("%d/%m/%Y %H:%M")
        )));
        doc.push(elements::Break::new(1.5));

        Ok(doc)
    }

    fn renderizar(doc: genpdf::Document) -> Result<Vec<u8>, AppError> {
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| anyhow::anyhow!("No se pudo renderizar el PDF: {}", e))?;

        Ok(buffer)
    }

    // --- Clientes ---

    pub async fn pdf_clientes(&self, clientes: &[Cliente]) -> Result<Vec<u8>, AppError> {
        let empresa = self.nombre_empresa().await?;
        let mut doc = self.documento_base("Listado de clientes", &empresa)?;

        let mut tabla = elements::TableLayout::new(vec![2, 3, 3, 2]);
        tabla.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let negrita = style::Style::new().bold();
        tabla
            .row()
            .element(elements::Paragraph::new("RUT").styled(negrita))
            .element(elements::Paragraph::new("Nombre").styled(negrita))
            .element(elements::Paragraph::new("Email").styled(negrita))
            .element(elements::Paragraph::new("Registro").styled(negrita))
            .push()
            .map_err(|e| anyhow::anyhow!("Error armando la tabla: {}", e))?;

        for cliente in clientes {
            tabla
                .row()
                .element(elements::Paragraph::new(cliente.rut.clone()))
                .element(elements::Paragraph::new(cliente.nombre_completo()))
                .element(elements::Paragraph::new(cliente.email.clone()))
                .element(elements::Paragraph::new(
                    cliente.fecha_registro.format("%d/%m/%Y").to_string(),
                ))
                .push()
                .map_err(|e| anyhow::anyhow!("Error armando la tabla: {}", e))?;
        }

        doc.push(tabla);
        doc.push(elements::Break::new(1));
        doc.push(elements::Paragraph::new(format!(
            "Total de clientes: {}",
            clientes.len()
        )));

        Self::renderizar(doc)
    }

    pub fn excel_clientes(&self, clientes: &[Cliente]) -> Result<Vec<u8>, AppError> {
        let mut libro = Workbook::new();
        let hoja = libro.add_worksheet();
        let negrita = Format::new().set_bold();

        let cabeceras = ["RUT", "Nombre", "Apellido", "Email", "Teléfono", "Categoría", "Fecha registro"];
        for (col, cabecera) in cabeceras.iter().enumerate() {
            hoja.write_with_format(0, col as u16, *cabecera, &negrita)
                .map_err(|e| anyhow::anyhow!("Error escribiendo el Excel: {}", e))?;
        }

        for (i, cliente) in clientes.iter().enumerate() {
            let fila = (i + 1) as u32;
            hoja.write(fila, 0, &cliente.rut)
                .and_then(|h| h.write(fila, 1, &cliente.nombre))
                .and_then(|h| h.write(fila, 2, &cliente.apellido))
                .and_then(|h| h.write(fila, 3, &cliente.email))
                .and_then(|h| h.write(fila, 4, cliente.telefono.as_deref().unwrap_or("")))
                .and_then(|h| h.write(fila, 5, cliente.categoria.as_deref().unwrap_or("")))
                .and_then(|h| {
                    h.write(fila, 6, cliente.fecha_registro.format("%d/%m/%Y").to_string())
                })
                .map_err(|e| anyhow::anyhow!("Error escribiendo el Excel: {}", e))?;
        }

        let buffer = libro
            .save_to_buffer()
            .map_err(|e| anyhow::anyhow!("Error guardando el Excel: {}", e))?;

        Ok(buffer)
    }

    pub fn csv_clientes(&self, clientes: &[Cliente]) -> String {
        let mut salida = String::from("rut,nombre,apellido,email,telefono,categoria,fecha_registro\n");

        for cliente in clientes {
            salida.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                campo_csv(&cliente.rut),
                campo_csv(&cliente.nombre),
                campo_csv(&cliente.apellido),
                campo_csv(&cliente.email),
                campo_csv(cliente.telefono.as_deref().unwrap_or("")),
                campo_csv(cliente.categoria.as_deref().unwrap_or("")),
                cliente.fecha_registro.format("%Y-%m-%d"),
            ));
        }

        salida
    }

    // --- Productos ---

    pub fn excel_productos(&self, productos: &[Producto]) -> Result<Vec<u8>, AppError> {
        let mut libro = Workbook::new();
        let hoja = libro.add_worksheet();
        let negrita = Format::new().set_bold();

        let cabeceras = ["Código", "Nombre", "Marca", "Precio", "Stock", "Activo"];
        for (col, cabecera) in cabeceras.iter().enumerate() {
            hoja.write_with_format(0, col as u16, *cabecera, &negrita)
                .map_err(|e| anyhow::anyhow!("Error escribiendo el Excel: {}", e))?;
        }

        for (i, producto) in productos.iter().enumerate() {
            let fila = (i + 1) as u32;
            hoja.write(fila, 0, &producto.codigo)
                .and_then(|h| h.write(fila, 1, &producto.nombre))
                .and_then(|h| h.write(fila, 2, producto.marca.as_deref().unwrap_or("")))
                .and_then(|h| h.write(fila, 3, producto.precio.to_string()))
                .and_then(|h| h.write(fila, 4, producto.stock))
                .and_then(|h| h.write(fila, 5, if producto.activo { "Sí" } else { "No" }))
                .map_err(|e| anyhow::anyhow!("Error escribiendo el Excel: {}", e))?;
        }

        let buffer = libro
            .save_to_buffer()
            .map_err(|e| anyhow::anyhow!("Error guardando el Excel: {}", e))?;

        Ok(buffer)
    }

    pub async fn pdf_productos(&self, productos: &[Producto]) -> Result<Vec<u8>, AppError> {
        let empresa = self.nombre_empresa().await?;
        let mut doc = self.documento_base("Listado de productos", &empresa)?;

        let mut tabla = elements::TableLayout::new(vec![2, 4, 2, 1]);
        tabla.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let negrita = style::Style::new().bold();
        tabla
            .row()
            .element(elements::Paragraph::new("Código").styled(negrita))
            .element(elements::Paragraph::new("Nombre").styled(negrita))
            .element(elements::Paragraph::new("Precio").styled(negrita))
            .element(elements::Paragraph::new("Stock").styled(negrita))
            .push()
            .map_err(|e| anyhow::anyhow!("Error armando la tabla: {}", e))?;

        for producto in productos {
            tabla
                .row()
                .element(elements::Paragraph::new(producto.codigo.clone()))
                .element(elements::Paragraph::new(producto.nombre.clone()))
                .element(elements::Paragraph::new(format!("$ {}", producto.precio)))
                .element(elements::Paragraph::new(producto.stock.to_string()))
                .push()
                .map_err(|e| anyhow::anyhow!("Error armando la tabla: {}", e))?;
        }

        doc.push(tabla);
        Self::renderizar(doc)
    }

    // --- Ventas ---

    pub async fn pdf_ventas(
        &self,
        ventas: &[VentaListado],
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<u8>, AppError> {
        let empresa = self.nombre_empresa().await?;
        let titulo = format!(
            "Ventas del {} al {}",
            desde.format("%d/%m/%Y"),
            hasta.format("%d/%m/%Y")
        );
        let mut doc = self.documento_base(&titulo, &empresa)?;

        let mut tabla = elements::TableLayout::new(vec![2, 3, 3, 2, 2]);
        tabla.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let negrita = style::Style::new().bold();
        tabla
            .row()
            .element(elements::Paragraph::new("Fecha").styled(negrita))
            .element(elements::Paragraph::new("Cliente").styled(negrita))
            .element(elements::Paragraph::new("Vendedor").styled(negrita))
            .element(elements::Paragraph::new("Total").styled(negrita))
            .element(elements::Paragraph::new("Estado").styled(negrita))
            .push()
            .map_err(|e| anyhow::anyhow!("Error armando la tabla: {}", e))?;

        let mut total_general = rust_decimal::Decimal::ZERO;

        for venta in ventas {
            if venta.estado != crate::models::venta::ESTADO_ANULADA {
                total_general += venta.total;
            }

            tabla
                .row()
                .element(elements::Paragraph::new(
                    venta.fecha.format("%d/%m/%Y").to_string(),
                ))
                .element(elements::Paragraph::new(venta.cliente_nombre.clone()))
                .element(elements::Paragraph::new(venta.vendedor_nombre.clone()))
                .element(elements::Paragraph::new(format!("$ {}", venta.total)))
                .element(elements::Paragraph::new(venta.estado.clone()))
                .push()
                .map_err(|e| anyhow::anyhow!("Error armando la tabla: {}", e))?;
        }

        doc.push(tabla);
        doc.push(elements::Break::new(1));

        let mut total = elements::Paragraph::new(format!("TOTAL DEL PERÍODO: $ {}", total_general));
        total.set_alignment(genpdf::Alignment::Right);
        doc.push(total.styled(style::Style::new().bold().with_font_size(12)));

        Self::renderizar(doc)
    }

    pub fn excel_ventas(&self, ventas: &[VentaListado]) -> Result<Vec<u8>, AppError> {
        let mut libro = Workbook::new();
        let hoja = libro.add_worksheet();
        let negrita = Format::new().set_bold();

        let cabeceras = ["Fecha", "Cliente", "Vendedor", "Subtotal", "IVA", "Total", "Estado"];
        for (col, cabecera) in cabeceras.iter().enumerate() {
            hoja.write_with_format(0, col as u16, *cabecera, &negrita)
                .map_err(|e| anyhow::anyhow!("Error escribiendo el Excel: {}", e))?;
        }

        for (i, venta) in ventas.iter().enumerate() {
            let fila = (i + 1) as u32;
            hoja.write(fila, 0, venta.fecha.format("%d/%m/%Y %H:%M").to_string())
                .and_then(|h| h.write(fila, 1, &venta.cliente_nombre))
                .and_then(|h| h.write(fila, 2, &venta.vendedor_nombre))
                .and_then(|h| h.write(fila, 3, venta.subtotal.to_string()))
                .and_then(|h| h.write(fila, 4, venta.impuesto.to_string()))
                .and_then(|h| h.write(fila, 5, venta.total.to_string()))
                .and_then(|h| h.write(fila, 6, &venta.estado))
                .map_err(|e| anyhow::anyhow!("Error escribiendo el Excel: {}", e))?;
        }

        let buffer = libro
            .save_to_buffer()
            .map_err(|e| anyhow::anyhow!("Error guardando el Excel: {}", e))?;

        Ok(buffer)
    }

    /// Comprobante de una venta individual, con sus líneas y totales.
    pub async fn pdf_comprobante(&self, venta: &VentaConDetalles) -> Result<Vec<u8>, AppError> {
        let empresa = self.nombre_empresa().await?;
        let titulo = format!("Comprobante de venta {}", venta.venta.id);
        let mut doc = self.documento_base(&titulo, &empresa)?;

        doc.push(elements::Paragraph::new(format!(
            "Fecha: {}",
            venta.venta.fecha.format("%d/%m/%Y %H:%M")
        )));
        doc.push(elements::Paragraph::new(format!(
            "Cliente: {}",
            venta.venta.cliente_nombre
        )));
        doc.push(elements::Paragraph::new(format!(
            "Vendedor: {}",
            venta.venta.vendedor_nombre
        )));
        doc.push(elements::Break::new(1.5));

        let mut tabla = elements::TableLayout::new(vec![4, 1, 2, 2]);
        tabla.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let negrita = style::Style::new().bold();
        tabla
            .row()
            .element(elements::Paragraph::new("Producto").styled(negrita))
            .element(elements::Paragraph::new("Cant.").styled(negrita))
            .element(elements::Paragraph::new("Unitario").styled(negrita))
            .element(elements::Paragraph::new("Total").styled(negrita))
            .push()
            .map_err(|e| anyhow::anyhow!("Error armando la tabla: {}", e))?;

        for detalle in &venta.detalles {
            tabla
                .row()
                .element(elements::Paragraph::new(format!(
                    "[{}] - {}",
                    detalle.producto_codigo, detalle.producto_nombre
                )))
                .element(elements::Paragraph::new(detalle.cantidad.to_string()))
                .element(elements::Paragraph::new(format!("$ {}", detalle.precio_unitario)))
                .element(elements::Paragraph::new(format!("$ {}", detalle.total)))
                .push()
                .map_err(|e| anyhow::anyhow!("Error armando la tabla: {}", e))?;
        }

        doc.push(tabla);
        doc.push(elements::Break::new(1.5));

        doc.push(elements::Paragraph::new(format!(
            "Subtotal: $ {}",
            venta.venta.subtotal
        )));
        doc.push(elements::Paragraph::new(format!(
            "IVA (19%): $ {}",
            venta.venta.impuesto
        )));

        let mut total = elements::Paragraph::new(format!("TOTAL: $ {}", venta.venta.total));
        total.set_alignment(genpdf::Alignment::Right);
        doc.push(total.styled(style::Style::new().bold().with_font_size(12)));

        Self::renderizar(doc)
    }

    // --- Usuarios ---

    pub fn csv_usuarios(&self, usuarios: &[Usuario]) -> String {
        let mut salida = String::from("username,nombre,apellido,email,activo,roles,ultimo_acceso\n");

        for usuario in usuarios {
            salida.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                campo_csv(&usuario.username),
                campo_csv(&usuario.nombre),
                campo_csv(&usuario.apellido),
                campo_csv(&usuario.email),
                usuario.activo,
                campo_csv(&usuario.roles.join("|")),
                usuario.ultimo_acceso.format("%Y-%m-%d"),
            ));
        }

        salida
    }
}

/// Escapa un campo CSV cuando contiene comas, comillas o saltos de línea.
fn campo_csv(valor: &str) -> String {
    if valor.contains(',') || valor.contains('"') || valor.contains('\n') {
        format!("\"{}\"", valor.replace('"', "\"\""))
    } else {
        valor.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campo_simple_queda_igual() {
        assert_eq!(campo_csv("Pérez"), "Pérez");
    }

    #[test]
    fn campo_con_coma_se_encierra_en_comillas() {
        assert_eq!(campo_csv("Pérez, Juan"), "\"Pérez, Juan\"");
    }

    #[test]
    fn las_comillas_internas_se_duplican() {
        assert_eq!(campo_csv("al \"toque\""), "\"al \"\"toque\"\"\"");
    }
}
