use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use petpals::{
    AppState, Config, IdentityVerifier, InMemoryPetStore, PetStore, PgPetStore,
    RemoteIdentityVerifier, StaticIdentityVerifier, configure_api,
};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "petpals"
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petpals=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(std::io::Error::other)?;

    info!("Starting PetPals server on {}:{}", config.host, config.port);

    let store: Arc<dyn PetStore> = match &config.database_url {
        Some(database_url) => {
            let db_pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await
                .map_err(std::io::Error::other)?;

            info!("Database connection pool established");

            sqlx::migrate!("./migrations")
                .run(&db_pool)
                .await
                .map_err(std::io::Error::other)?;

            info!("Database migrations completed");
            Arc::new(PgPetStore::new(db_pool))
        }
        None => {
            warn!("DATABASE_URL not set. Listings are kept in memory and lost on restart.");
            Arc::new(InMemoryPetStore::new())
        }
    };

    let verifier: Arc<dyn IdentityVerifier> = match &config.identity_api_key {
        Some(api_key) => {
            let verifier = RemoteIdentityVerifier::new(
                &config.identity_base_url,
                api_key.clone(),
                Duration::from_secs(config.identity_timeout_secs),
            )
            .map_err(std::io::Error::other)?;
            info!("Identity verification via {}", config.identity_base_url);
            Arc::new(verifier)
        }
        None => {
            let verifier = StaticIdentityVerifier::from_pairs(&config.static_tokens)
                .map_err(std::io::Error::other)?;
            warn!(
                "IDENTITY_API_KEY not set. Accepting {} static token(s) from STATIC_TOKENS.",
                verifier.len()
            );
            Arc::new(verifier)
        }
    };

    let server_addr = format!("{}:{}", config.host, config.port);

    let app_state = web::Data::new(AppState {
        store,
        verifier,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .route("/health", web::get().to(health_check))
            .configure(configure_api)
    })
    .bind(&server_addr)?
    .run()
    .await
}
