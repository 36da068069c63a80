// src/services/cliente_service.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, paginacion::Pagina},
    db::{ClienteRepository, VentaRepository},
    models::cliente::{ActualizarClientePayload, Cliente, CrearClientePayload},
    validador,
};

#[derive(Clone)]
pub struct ClienteService {
    cliente_repo: ClienteRepository,
    venta_repo: VentaRepository,
}

impl ClienteService {
    pub fn new(cliente_repo: ClienteRepository, venta_repo: VentaRepository) -> Self {
        Self {
            cliente_repo,
            venta_repo,
        }
    }

    pub async fn listar(&self) -> Result<Vec<Cliente>, AppError> {
        self.cliente_repo.listar_todos().await
    }

    pub async fn listar_paginados(
        &self,
        pagina: usize,
        tamanio: usize,
    ) -> Result<Pagina<Cliente>, AppError> {
        let tamanio = tamanio.max(1);
        let (clientes, total) = self.cliente_repo.listar_paginados(pagina, tamanio).await?;
        Ok(Pagina::desde_consulta(clientes, pagina, tamanio, total))
    }

    pub async fn obtener(&self, id: Uuid) -> Result<Cliente, AppError> {
        self.cliente_repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::RecursoNoEncontrado(format!("Cliente {} no encontrado", id)))
    }

    /// Búsqueda con el filtro resuelto en la consulta y el recorte de página
    /// hecho en memoria sobre el resultado completo.
    pub async fn buscar_paginados(
        &self,
        texto: &str,
        pagina: usize,
        tamanio: usize,
    ) -> Result<Pagina<Cliente>, AppError> {
        let clientes = self.cliente_repo.buscar_por_texto(texto).await?;
        Ok(Pagina::paginar(clientes, pagina, tamanio))
    }

    pub async fn crear(&self, payload: CrearClientePayload) -> Result<Cliente, AppError> {
        payload.validate()?;

        let rut = self.validar_rut(&payload.rut)?;

        if self.cliente_repo.existe_email(&payload.email, None).await? {
            return Err(AppError::Conflicto(format!(
                "Ya existe un cliente con el email '{}'.",
                payload.email
            )));
        }

        self.cliente_repo
            .crear(
                payload.nombre.trim(),
                payload.apellido.trim(),
                payload.email.trim(),
                payload.telefono.as_deref(),
                payload.direccion.as_deref(),
                &rut,
                payload.categoria.as_deref(),
            )
            .await
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        payload: ActualizarClientePayload,
    ) -> Result<Cliente, AppError> {
        payload.validate()?;

        let rut = self.validar_rut(&payload.rut)?;

        if self.cliente_repo.existe_email(&payload.email, Some(id)).await? {
            return Err(AppError::Conflicto(format!(
                "Ya existe un cliente con el email '{}'.",
                payload.email
            )));
        }

        self.cliente_repo
            .actualizar(
                id,
                payload.nombre.trim(),
                payload.apellido.trim(),
                payload.email.trim(),
                payload.telefono.as_deref(),
                payload.direccion.as_deref(),
                &rut,
                payload.categoria.as_deref(),
            )
            .await?
            .ok_or_else(|| AppError::RecursoNoEncontrado(format!("Cliente {} no encontrado", id)))
    }

    /// Un cliente con ventas registradas no puede eliminarse; queda como
    /// parte del historial comercial.
    pub async fn eliminar(&self, id: Uuid) -> Result<(), AppError> {
        if self.cliente_repo.buscar_por_id(id).await?.is_none() {
            return Err(AppError::RecursoNoEncontrado(format!(
                "Cliente {} no encontrado",
                id
            )));
        }

        if self.venta_repo.existen_por_cliente(id).await? {
            return Err(AppError::Conflicto(
                "No se puede eliminar el cliente porque tiene ventas registradas.".to_string(),
            ));
        }

        self.cliente_repo.eliminar(id).await?;
        Ok(())
    }

    /// Valida el checksum y devuelve el RUT con formato canónico.
    fn validar_rut(&self, rut: &str) -> Result<String, AppError> {
        if !validador::validar(rut) {
            return Err(AppError::RutInvalido(format!(
                "El RUT '{}' no es válido.",
                rut
            )));
        }

        validador::formatear(rut)
            .ok_or_else(|| AppError::RutInvalido(format!("El RUT '{}' no es válido.", rut)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    fn servicio(pool: PgPool) -> ClienteService {
        ClienteService::new(
            ClienteRepository::new(pool.clone()),
            VentaRepository::new(pool),
        )
    }

    async fn sembrar_cliente(pool: &PgPool, nombre: &str, apellido: &str, email: &str) {
        sqlx::query("INSERT INTO clientes (nombre, apellido, email, rut) VALUES ($1, $2, $3, $4)")
            .bind(nombre)
            .bind(apellido)
            .bind(email)
            .bind("12.345.678-5")
            .execute(pool)
            .await
            .unwrap();
    }

    #[sqlx::test]
    async fn la_busqueda_filtrada_se_recorta_por_pagina(pool: PgPool) {
        sembrar_cliente(&pool, "Ana", "Soto", "ana.soto@correo.cl").await;
        sembrar_cliente(&pool, "Bruno", "Soto", "bruno.soto@correo.cl").await;
        sembrar_cliente(&pool, "Carla", "Soto", "carla.soto@correo.cl").await;
        sembrar_cliente(&pool, "Diego", "Rojas", "diego.rojas@correo.cl").await;

        let servicio = servicio(pool);

        let primera = servicio.buscar_paginados("soto", 0, 2).await.unwrap();
        assert_eq!(primera.total_elementos, 3);
        assert_eq!(primera.total_paginas, 2);
        assert_eq!(primera.elementos.len(), 2);

        let segunda = servicio.buscar_paginados("soto", 1, 2).await.unwrap();
        assert_eq!(segunda.elementos.len(), 1);
        assert_eq!(segunda.elementos[0].apellido, "Soto");
    }
}
