use actix_multipart::Multipart;
use actix_web::{delete, get, post, web, HttpResponse};
use futures::TryStreamExt;
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::AdminUser;
use crate::services::image_service::ImageService;

#[derive(Deserialize)]
pub struct CarImageQuery {
    pub car_id: i32,
}

/// POST /api/car-images?car_id= - Uploader une image (ADMIN, multipart)
#[post("")]
pub async fn create_car_image(
    _admin: AdminUser,
    query: web::Query<CarImageQuery>,
    mut payload: Multipart,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    // 1. Extraire le premier champ fichier du multipart
    let mut original_name: Option<String> = None;
    let mut bytes: Vec<u8> = Vec::new();
    let mut file_found = false;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|name| name.to_string());

        // On ne s'intéresse qu'aux champs fichiers
        let Some(filename) = filename else {
            continue;
        };
        original_name = Some(filename);

        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
        {
            bytes.extend_from_slice(&chunk);
        }

        file_found = true;
        break;
    }

    if !file_found {
        return Err(ApiError::BadRequest("No file provided".to_string()));
    }

    // 2. Écrire le fichier et enregistrer la ligne
    let image = ImageService::create(
        db.get_ref(),
        &config.media_root,
        query.car_id,
        original_name.as_deref(),
        &bytes,
    )
    .await?;

    Ok(HttpResponse::Created().json(image))
}

/// GET /api/car-images/car/{car_id} - Images d'une voiture (PUBLIC)
#[get("/car/{car_id}")]
pub async fn get_car_images(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let images = ImageService::list_for_car(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(images))
}

/// GET /api/car-images/{image_id} - Une image par id (PUBLIC)
#[get("/{image_id}")]
pub async fn get_car_image(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let image = ImageService::get(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(image))
}

/// DELETE /api/car-images/{image_id} - Supprimer image + fichier (ADMIN)
/// Le fichier part en premier; si sa suppression échoue la ligne reste.
#[delete("/{image_id}")]
pub async fn delete_car_image(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, ApiError> {
    ImageService::delete(db.get_ref(), &config.media_root, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn car_image_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/car-images")
            .service(create_car_image)
            .service(get_car_images)
            .service(get_car_image)
            .service(delete_car_image),
    );
}
