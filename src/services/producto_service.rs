// src/services/producto_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, paginacion::Pagina},
    db::{ProductoRepository, VentaRepository},
    models::producto::{
        ActualizarProductoPayload, Categoria, CrearCategoriaPayload, CrearProductoPayload,
        Producto,
    },
};

// Umbral por defecto para la alerta de bajo stock
pub const UMBRAL_BAJO_STOCK: i32 = 5;

#[derive(Clone)]
pub struct ProductoService {
    producto_repo: ProductoRepository,
    venta_repo: VentaRepository,
}

impl ProductoService {
    pub fn new(producto_repo: ProductoRepository, venta_repo: VentaRepository) -> Self {
        Self {
            producto_repo,
            venta_repo,
        }
    }

    pub async fn listar(&self) -> Result<Vec<Producto>, AppError> {
        self.producto_repo.listar_todos().await
    }

    pub async fn listar_activos(&self) -> Result<Vec<Producto>, AppError> {
        self.producto_repo.listar_activos().await
    }

    pub async fn listar_paginados(
        &self,
        pagina: usize,
        tamanio: usize,
    ) -> Result<Pagina<Producto>, AppError> {
        let tamanio = tamanio.max(1);
        let (productos, total) = self.producto_repo.listar_paginados(pagina, tamanio).await?;
        Ok(Pagina::desde_consulta(productos, pagina, tamanio, total))
    }

    pub async fn obtener(&self, id: Uuid) -> Result<Producto, AppError> {
        self.producto_repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::RecursoNoEncontrado(format!("Producto {} no encontrado", id)))
    }

    pub async fn buscar_paginados(
        &self,
        nombre: &str,
        pagina: usize,
        tamanio: usize,
    ) -> Result<Pagina<Producto>, AppError> {
        let productos = self.producto_repo.buscar_por_nombre(nombre).await?;
        Ok(Pagina::paginar(productos, pagina, tamanio))
    }

    pub async fn listar_bajo_stock(&self, umbral: Option<i32>) -> Result<Vec<Producto>, AppError> {
        self.producto_repo
            .listar_bajo_stock(umbral.unwrap_or(UMBRAL_BAJO_STOCK))
            .await
    }

    pub async fn crear(&self, payload: CrearProductoPayload) -> Result<Producto, AppError> {
        payload.validate()?;

        let codigo = normalizar_codigo(&payload.codigo);
        validar_precio(payload.precio)?;

        if self.producto_repo.existe_codigo(&codigo, None).await? {
            return Err(AppError::Conflicto(format!(
                "Ya existe un producto con el código '{}'.",
                codigo
            )));
        }

        self.producto_repo
            .crear(
                &codigo,
                payload.nombre.trim(),
                payload.descripcion.as_deref(),
                payload.precio,
                payload.stock,
                payload.categoria_id,
                payload.marca.as_deref(),
                payload.modelo.as_deref(),
            )
            .await
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        payload: ActualizarProductoPayload,
    ) -> Result<Producto, AppError> {
        payload.validate()?;

        let codigo = normalizar_codigo(&payload.codigo);
        validar_precio(payload.precio)?;

        if self.producto_repo.existe_codigo(&codigo, Some(id)).await? {
            return Err(AppError::Conflicto(format!(
                "Ya existe un producto con el código '{}'.",
                codigo
            )));
        }

        self.producto_repo
            .actualizar(
                id,
                &codigo,
                payload.nombre.trim(),
                payload.descripcion.as_deref(),
                payload.precio,
                payload.stock,
                payload.categoria_id,
                payload.marca.as_deref(),
                payload.modelo.as_deref(),
                payload.activo,
            )
            .await?
            .ok_or_else(|| AppError::RecursoNoEncontrado(format!("Producto {} no encontrado", id)))
    }

    pub async fn ajustar_stock(&self, id: Uuid, delta: i32) -> Result<Producto, AppError> {
        let producto = self.obtener(id).await?;

        let nuevo_stock = producto.stock_resultante(delta).ok_or_else(|| {
            AppError::StockInsuficiente(format!(
                "Stock insuficiente para '{}': disponible {}, solicitado {}",
                producto.nombre,
                producto.stock,
                delta.abs()
            ))
        })?;

        self.producto_repo
            .actualizar_stock(id, nuevo_stock)
            .await?
            .ok_or_else(|| AppError::RecursoNoEncontrado(format!("Producto {} no encontrado", id)))
    }

    /// Baja lógica. Un producto con ventas históricas nunca se borra de la
    /// tabla, solo se desactiva.
    pub async fn desactivar(&self, id: Uuid) -> Result<(), AppError> {
        if self.producto_repo.buscar_por_id(id).await?.is_none() {
            return Err(AppError::RecursoNoEncontrado(format!(
                "Producto {} no encontrado",
                id
            )));
        }

        self.producto_repo.cambiar_estado(id, false).await?;
        Ok(())
    }

    pub async fn reactivar(&self, id: Uuid) -> Result<(), AppError> {
        if self.producto_repo.buscar_por_id(id).await?.is_none() {
            return Err(AppError::RecursoNoEncontrado(format!(
                "Producto {} no encontrado",
                id
            )));
        }

        self.producto_repo.cambiar_estado(id, true).await?;
        Ok(())
    }

    pub async fn estadisticas_venta(&self, id: Uuid) -> Result<(i64, Decimal), AppError> {
        let unidades = self.venta_repo.unidades_por_producto(id).await?;
        let ingresos = self.venta_repo.ingresos_por_producto(id).await?;
        Ok((unidades, ingresos))
    }

    // --- Categorías ---

    pub async fn listar_categorias(&self) -> Result<Vec<Categoria>, AppError> {
        self.producto_repo.listar_categorias().await
    }

    pub async fn crear_categoria(&self, payload: CrearCategoriaPayload) -> Result<Categoria, AppError> {
        payload.validate()?;

        self.producto_repo
            .crear_categoria(payload.nombre.trim(), payload.descripcion.as_deref())
            .await
    }
}

/// Los códigos se guardan sin espacios y en mayúsculas.
fn normalizar_codigo(codigo: &str) -> String {
    codigo.trim().to_uppercase()
}

fn validar_precio(precio: Decimal) -> Result<(), AppError> {
    if precio <= Decimal::ZERO {
        return Err(AppError::ValidationError(precio_invalido()));
    }
    Ok(())
}

fn precio_invalido() -> validator::ValidationErrors {
    let mut errores = validator::ValidationErrors::new();
    let mut error = validator::ValidationError::new("range");
    error.message = Some("El precio debe ser mayor que cero".into());
    errores.add("precio", error);
    errores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn el_codigo_se_normaliza_en_mayusculas() {
        assert_eq!(normalizar_codigo("  ntb-001 "), "NTB-001");
    }

    #[test]
    fn precio_cero_se_rechaza() {
        assert!(validar_precio(Decimal::ZERO).is_err());
    }

    #[test]
    fn precio_negativo_se_rechaza() {
        assert!(validar_precio(Decimal::new(-100, 2)).is_err());
    }

    #[test]
    fn precio_positivo_pasa() {
        assert!(validar_precio(Decimal::new(54999, 2)).is_ok());
    }
}
