//! PetPals - pet fostering marketplace
//!
//! Listing search, creation and owner-only status changes behind a small
//! HTTP API. The store and identity verifier are injected through
//! [`AppState`] so every layer can run against fakes.

use std::sync::Arc;

use actix_web::web;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::AppError;

pub use models::{
    CreatePetRequest, NewPetListing, PetListing, PetQuery, PetStatus, PetType, UpdateStatusRequest,
};

pub use services::{
    AuthenticatedUser, IdentityError, IdentityVerifier, InMemoryPetStore, ListingError,
    ListingFilter, ListingService, PetStore, PgPetStore, RemoteIdentityVerifier,
    StaticIdentityVerifier, StoreError,
};

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<dyn PetStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

/// Mount the `/api` scope with JSON and query error handling
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(web::scope("/api").configure(handlers::configure_pet_routes));
}
