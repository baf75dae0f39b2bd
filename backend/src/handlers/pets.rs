//! Pet listing handlers
//!
//! HTTP handlers for browsing, posting and updating pet listings.

use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::error::AppError;
use crate::models::{CreatePetRequest, PetQuery, UpdateStatusRequest};
use crate::services::identity::AuthenticatedUser;
use crate::services::listing::{ListingError, ListingService};

/// GET /api/pets
///
/// Browse pending listings. No authentication.
///
/// Query Parameters (all optional, combined with AND):
/// - type: `Dog` or `Cat`
/// - fosterDuration: maximum foster length in days (inclusive)
/// - location: case-insensitive substring of the pickup location
/// - fosterStartDate: `YYYY-MM-DD`; keeps listings starting within one month either side
pub async fn list_pets(
    state: web::Data<AppState>,
    query: web::Query<PetQuery>,
) -> Result<HttpResponse, AppError> {
    let service = ListingService::new(state.store.clone());

    let pets = service
        .search(&query.into_inner())
        .await
        .map_err(map_listing_error)?;

    Ok(HttpResponse::Ok().json(pets))
}

/// POST /api/pets
///
/// Post a new listing owned by the caller. The listing always starts `pending`.
pub async fn create_pet(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CreatePetRequest>,
) -> Result<HttpResponse, AppError> {
    let service = ListingService::new(state.store.clone());

    let pet = service
        .create(&user.user_id, body.into_inner())
        .await
        .map_err(map_listing_error)?;

    Ok(HttpResponse::Created().json(pet))
}

/// GET /api/my-pets
///
/// Every listing the caller owns, matched or not.
pub async fn list_my_pets(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = ListingService::new(state.store.clone());

    let pets = service
        .list_for_owner(&user.user_id)
        .await
        .map_err(map_listing_error)?;

    Ok(HttpResponse::Ok().json(pets))
}

/// PUT /api/pets/{petId}/status
///
/// Change the match status of a listing. Only its owner may do this.
pub async fn update_pet_status(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let pet_id = path.into_inner();
    let request = body.into_inner();
    let service = ListingService::new(state.store.clone());

    let pet = service
        .update_status(&pet_id, request.status.as_deref(), &user.user_id)
        .await
        .map_err(map_listing_error)?;

    Ok(HttpResponse::Ok().json(pet))
}

/// Map listing errors to application errors
fn map_listing_error(e: ListingError) -> AppError {
    match e {
        ListingError::Validation(msg) => AppError::Validation(msg),
        ListingError::InvalidFilter(e) => AppError::Validation(e.to_string()),
        ListingError::NotFound(id) => AppError::NotFound(format!("pet {id}")),
        ListingError::NotOwner { pet_id, .. } => {
            AppError::Forbidden(format!("You do not own pet {pet_id}"))
        }
        ListingError::Store(e) => AppError::Store(e),
    }
}

/// Configure pet listing routes
pub fn configure_pet_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/my-pets", web::get().to(list_my_pets)).service(
        web::scope("/pets")
            .route("", web::get().to(list_pets))
            .route("", web::post().to(create_pet))
            .route("/{petId}/status", web::put().to(update_pet_status)),
    );
}
