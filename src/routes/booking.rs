use actix_web::{delete, get, patch, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::ApiError;
use crate::middleware::{AdminUser, AuthUser};
use crate::models::dto::{BookingCreateRequest, BookingUpdateRequest};
use crate::services::booking_service::BookingService;

// --- Points utilisateur ---

/// POST /api/booking - Réserver une voiture (PROTÉGÉE)
/// Le contrôle d'admission compare le solde au prix journalier de la
/// voiture ; le user_id du payload est ignoré.
#[post("")]
pub async fn create_booking(
    auth_user: AuthUser,
    body: web::Json<BookingCreateRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let booking = BookingService::create(
        db.get_ref(),
        auth_user.user_id,
        auth_user.balance,
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Created().json(booking))
}

/// GET /api/booking - Mes réservations avec l'agrégat voiture (PROTÉGÉE)
#[get("")]
pub async fn get_user_bookings(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let bookings = BookingService::list_for_user(db.get_ref(), auth_user.user_id).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

/// GET /api/booking/{booking_id} - Une réservation (propriétaire ou admin)
#[get("/{booking_id}")]
pub async fn get_user_booking(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let booking = BookingService::get_for_actor(
        db.get_ref(),
        path.into_inner(),
        auth_user.user_id,
        auth_user.is_admin(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(booking))
}

// --- Points admin ---

/// GET /api/booking/admin/all - Toutes les réservations (ADMIN)
#[get("/admin/all")]
pub async fn get_all_bookings(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let bookings = BookingService::list_all(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

/// GET /api/booking/admin/{booking_id} - N'importe quelle réservation (ADMIN)
#[get("/admin/{booking_id}")]
pub async fn get_any_booking(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let booking = BookingService::get_any(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(booking))
}

/// PATCH /api/booking/admin/{booking_id} - Mise à jour partielle (ADMIN)
/// Ni l'ordre des dates ni la disponibilité ne sont revalidés.
#[patch("/admin/{booking_id}")]
pub async fn update_any_booking(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<BookingUpdateRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let booking =
        BookingService::update_any(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(booking))
}

/// DELETE /api/booking/admin/{booking_id} - Supprimer une réservation (ADMIN)
#[delete("/admin/{booking_id}")]
pub async fn delete_any_booking(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    BookingService::delete_any(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn booking_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/booking")
            .service(create_booking)
            .service(get_user_bookings)
            .service(get_all_bookings)
            .service(get_any_booking)
            .service(update_any_booking)
            .service(delete_any_booking)
            .service(get_user_booking),
    );
}
