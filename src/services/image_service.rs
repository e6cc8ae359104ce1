use std::path::Path;

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{car, car_image};

/// Longueur du préfixe UUID utilisé dans les noms de fichiers
const FILENAME_PREFIX_LEN: usize = 25;

pub struct ImageService;

impl ImageService {
    /// Nom de fichier unique: 25 premiers caractères d'un UUID v4 +
    /// extension d'origine (si présente).
    pub fn unique_filename(original_name: Option<&str>) -> String {
        let ext = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let id = Uuid::new_v4().to_string();
        format!("{}{}", &id[..FILENAME_PREFIX_LEN], ext)
    }

    /// Écrit le fichier sous <media_root>/car_images/ puis enregistre la
    /// ligne pointant sur l'URL relative.
    pub async fn create(
        db: &DatabaseConnection,
        media_root: &str,
        car_id: i32,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<car_image::Model, ApiError> {
        let car = car::Entity::find_by_id(car_id).one(db).await?;
        if car.is_none() {
            return Err(ApiError::NotFound("Car not found".to_string()));
        }

        let filename = Self::unique_filename(original_name);
        let dir = Path::new(media_root).join("car_images");
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join(&filename), bytes)?;

        let image_url = format!("/media/car_images/{}", filename);
        let new_image = car_image::ActiveModel {
            image_url: Set(image_url),
            car_id: Set(car_id),
            ..Default::default()
        };

        Ok(new_image.insert(db).await?)
    }

    pub async fn list_for_car(
        db: &DatabaseConnection,
        car_id: i32,
    ) -> Result<Vec<car_image::Model>, ApiError> {
        let car = car::Entity::find_by_id(car_id).one(db).await?;
        if car.is_none() {
            return Err(ApiError::NotFound("Car not found".to_string()));
        }

        Ok(car_image::Entity::find()
            .filter(car_image::Column::CarId.eq(car_id))
            .all(db)
            .await?)
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<car_image::Model, ApiError> {
        car_image::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Image not found".to_string()))
    }

    /// Supprime le fichier PUIS la ligne. Si la suppression du fichier
    /// échoue, la ligne est conservée et l'erreur remonte en 500.
    /// Un fichier déjà absent n'est pas une erreur.
    pub async fn delete(
        db: &DatabaseConnection,
        media_root: &str,
        id: i32,
    ) -> Result<(), ApiError> {
        let image = Self::get(db, id).await?;

        let relative = image.image_url.trim_start_matches("/media/");
        let file_path = Path::new(media_root).join(relative);
        if file_path.exists() {
            std::fs::remove_file(&file_path)
                .map_err(|e| ApiError::Internal(format!("Failed to delete file: {}", e)))?;
        }

        car_image::Entity::delete_by_id(image.id).exec(db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_keeps_extension() {
        let name = ImageService::unique_filename(Some("photo.jpg"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), FILENAME_PREFIX_LEN + 4);
    }

    #[test]
    fn test_filename_without_extension() {
        let name = ImageService::unique_filename(Some("photo"));
        assert_eq!(name.len(), FILENAME_PREFIX_LEN);
    }

    #[test]
    fn test_filename_without_original_name() {
        let name = ImageService::unique_filename(None);
        assert_eq!(name.len(), FILENAME_PREFIX_LEN);
    }

    #[test]
    fn test_filenames_are_unique() {
        let a = ImageService::unique_filename(Some("photo.png"));
        let b = ImageService::unique_filename(Some("photo.png"));
        assert_ne!(a, b);
    }
}
