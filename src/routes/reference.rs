// Handlers génériques des six familles de tables de référence.
// Une seule implémentation, six scopes montés dans reference_routes.

use actix_web::{web, HttpResponse, Scope};
use sea_orm::{DatabaseConnection, IntoActiveModel};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AdminUser;
use crate::models::{car_body, car_brand, drive_type, engine_type, rental_class, transmission};
use crate::services::reference_service::{ReferenceEntity, ReferenceService};

#[derive(Deserialize, Validate)]
pub struct ReferenceCreateRequest {
    #[validate(length(min = 1, max = 32))]
    pub name: String,
}

#[derive(Deserialize, Validate)]
pub struct ReferenceUpdateRequest {
    #[validate(length(min = 1, max = 32))]
    pub name: Option<String>,
}

/// POST /api/<kind> - Créer une entrée (ADMIN)
async fn create_reference<E>(
    _admin: AdminUser,
    body: web::Json<ReferenceCreateRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError>
where
    E: ReferenceEntity + 'static,
    E::Model: Serialize + IntoActiveModel<<E as crate::services::reference_service::ReferenceEntity>::ActiveModel> + 'static,
{
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let row = ReferenceService::create::<E>(db.get_ref(), body.into_inner().name).await?;
    Ok(HttpResponse::Created().json(row))
}

/// GET /api/<kind> - Lister toutes les entrées (PUBLIC)
async fn list_references<E>(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApiError>
where
    E: ReferenceEntity + 'static,
    E::Model: Serialize + 'static,
{
    let rows = ReferenceService::list::<E>(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /api/<kind>/{id} - Récupérer une entrée (PUBLIC)
async fn get_reference<E>(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError>
where
    E: ReferenceEntity + 'static,
    E::Model: Serialize + 'static,
{
    let row = ReferenceService::get::<E>(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(row))
}

/// PATCH /api/<kind>/{id} - Renommer une entrée (ADMIN)
async fn update_reference<E>(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<ReferenceUpdateRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError>
where
    E: ReferenceEntity + 'static,
    E::Model: Serialize + IntoActiveModel<<E as crate::services::reference_service::ReferenceEntity>::ActiveModel> + 'static,
{
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let row =
        ReferenceService::update::<E>(db.get_ref(), path.into_inner(), body.into_inner().name)
            .await?;
    Ok(HttpResponse::Ok().json(row))
}

/// DELETE /api/<kind>/{id} - Supprimer une entrée sans voiture associée (ADMIN)
async fn delete_reference<E>(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError>
where
    E: ReferenceEntity + 'static,
{
    ReferenceService::delete::<E>(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

fn reference_scope<E>(path: &str) -> Scope
where
    E: ReferenceEntity + 'static,
    E::Model: Serialize + IntoActiveModel<<E as crate::services::reference_service::ReferenceEntity>::ActiveModel> + 'static,
{
    web::scope(path)
        .route("", web::post().to(create_reference::<E>))
        .route("", web::get().to(list_references::<E>))
        .route("/{id}", web::get().to(get_reference::<E>))
        .route("/{id}", web::patch().to(update_reference::<E>))
        .route("/{id}", web::delete().to(delete_reference::<E>))
}

pub fn reference_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(reference_scope::<car_brand::Entity>("/car-brands"))
        .service(reference_scope::<transmission::Entity>("/transmissions"))
        .service(reference_scope::<car_body::Entity>("/car-bodies"))
        .service(reference_scope::<engine_type::Entity>("/engine-types"))
        .service(reference_scope::<drive_type::Entity>("/drive-types"))
        .service(reference_scope::<rental_class::Entity>("/rental-classes"));
}
