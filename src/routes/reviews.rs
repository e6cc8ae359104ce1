use actix_web::{delete, get, post, web, HttpResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::car::Entity as Cars;
use crate::models::car_review::{self, Column as ReviewColumn, Entity as CarReviews};

// DTO pour la création d'un avis
#[derive(Deserialize, Validate)]
pub struct CarReviewCreateRequest {
    pub car_id: i32,
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
    pub image_url: Option<String>,
}

/// POST /api/car-reviews - Déposer un avis sur une voiture (PROTÉGÉE)
#[post("")]
pub async fn create_car_review(
    auth_user: AuthUser,
    body: web::Json<CarReviewCreateRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let body = body.into_inner();

    let car = Cars::find_by_id(body.car_id).one(db.get_ref()).await?;
    if car.is_none() {
        return Err(ApiError::NotFound("Car not found".to_string()));
    }

    let new_review = car_review::ActiveModel {
        user_id: Set(Some(auth_user.user_id)),
        car_id: Set(body.car_id),
        text: Set(body.text),
        image_url: Set(body.image_url),
        ..Default::default()
    };
    let review = new_review.insert(db.get_ref()).await?;

    Ok(HttpResponse::Created().json(review))
}

/// GET /api/car-reviews/car/{car_id} - Avis d'une voiture (PUBLIC)
#[get("/car/{car_id}")]
pub async fn get_car_reviews(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let car_id = path.into_inner();

    let car = Cars::find_by_id(car_id).one(db.get_ref()).await?;
    if car.is_none() {
        return Err(ApiError::NotFound("Car not found".to_string()));
    }

    let reviews = CarReviews::find()
        .filter(ReviewColumn::CarId.eq(car_id))
        .order_by_asc(ReviewColumn::Id)
        .all(db.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(reviews))
}

/// GET /api/car-reviews/{review_id} - Un avis par id (PUBLIC)
#[get("/{review_id}")]
pub async fn get_car_review(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let review = CarReviews::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Review not found".to_string()))?;

    Ok(HttpResponse::Ok().json(review))
}

/// DELETE /api/car-reviews/{review_id} - Supprimer son avis (auteur ou admin)
#[delete("/{review_id}")]
pub async fn delete_car_review(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let review = CarReviews::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Review not found".to_string()))?;

    if review.user_id != Some(auth_user.user_id) && !auth_user.is_admin() {
        return Err(ApiError::Forbidden("Not enough permissions".to_string()));
    }

    CarReviews::delete_by_id(review.id).exec(db.get_ref()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn review_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/car-reviews")
            .service(create_car_review)
            .service(get_car_reviews)
            .service(get_car_review)
            .service(delete_car_review),
    );
}
