// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        ClienteRepository, ConfiguracionRepository, ProductoRepository, ReporteRepository,
        RolRepository, UsuarioRepository, VentaRepository,
    },
    services::{
        AuthService, ClienteService, ConfiguracionService, ExportacionService, ProductoService,
        ReporteService, RolService, UsuarioService, VentaService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub cliente_service: ClienteService,
    pub producto_service: ProductoService,
    pub venta_service: VentaService,
    pub reporte_service: ReporteService,
    pub exportacion_service: ExportacionService,
    pub usuario_service: UsuarioService,
    pub rol_service: RolService,
    pub configuracion_service: ConfiguracionService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL debe estar definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET debe estar definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("Conexión con la base de datos establecida");

        // --- Grafo de dependencias ---
        let cliente_repo = ClienteRepository::new(db_pool.clone());
        let producto_repo = ProductoRepository::new(db_pool.clone());
        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let rol_repo = RolRepository::new(db_pool.clone());
        let venta_repo = VentaRepository::new(db_pool.clone());
        let reporte_repo = ReporteRepository::new(db_pool.clone());
        let configuracion_repo = ConfiguracionRepository::new(db_pool.clone());

        let auth_service = AuthService::new(usuario_repo.clone(), jwt_secret);
        let cliente_service = ClienteService::new(cliente_repo.clone(), venta_repo.clone());
        let producto_service = ProductoService::new(producto_repo.clone(), venta_repo.clone());
        let venta_service = VentaService::new(venta_repo.clone(), producto_repo.clone());
        let reporte_service = ReporteService::new(reporte_repo.clone(), cliente_repo.clone());
        let exportacion_service = ExportacionService::new(configuracion_repo.clone());
        let usuario_service =
            UsuarioService::new(usuario_repo.clone(), rol_repo.clone(), auth_service.clone());
        let rol_service = RolService::new(rol_repo);
        let configuracion_service = ConfiguracionService::new(configuracion_repo);

        Ok(Self {
            db_pool,
            auth_service,
            cliente_service,
            producto_service,
            venta_service,
            reporte_service,
            exportacion_service,
            usuario_service,
            rol_service,
            configuracion_service,
        })
    }
}
