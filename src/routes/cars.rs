use actix_web::{delete, get, patch, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AdminUser;
use crate::models::dto::{CarCreateRequest, CarListQuery, CarUpdateRequest};
use crate::services::car_service::CarService;

/// POST /api/cars - Créer une voiture (ADMIN)
#[post("")]
pub async fn create_car(
    _admin: AdminUser,
    body: web::Json<CarCreateRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let car = CarService::create(db.get_ref(), body.into_inner()).await?;
    let response = CarService::get(db.get_ref(), car.id).await?;
    Ok(HttpResponse::Created().json(response))
}

/// GET /api/cars - Lister les voitures avec filtres (PUBLIC)
/// Filtres: brand_id, model (sous-chaîne insensible à la casse),
/// min_price/max_price inclusifs, limit (<= 1000, défaut 100), offset.
#[get("")]
pub async fn get_all_cars(
    query: web::Query<CarListQuery>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = query.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let cars = CarService::list(db.get_ref(), &query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(cars))
}

/// GET /api/cars/{car_id} - Une voiture avec références et images (PUBLIC)
#[get("/{car_id}")]
pub async fn get_car(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let car = CarService::get(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(car))
}

/// PATCH /api/cars/{car_id} - Mise à jour partielle (ADMIN)
#[patch("/{car_id}")]
pub async fn update_car(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<CarUpdateRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let car = CarService::update(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(car))
}

/// DELETE /api/cars/{car_id} - Supprimer une voiture sans réservation (ADMIN)
#[delete("/{car_id}")]
pub async fn delete_car(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    CarService::delete(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn car_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cars")
            .service(create_car)
            .service(get_all_cars)
            .service(get_car)
            .service(update_car)
            .service(delete_car),
    );
}
