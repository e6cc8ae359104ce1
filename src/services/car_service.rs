use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use rust_decimal::Decimal;

use crate::error::ApiError;
use crate::models::dto::{CarCreateRequest, CarListQuery, CarResponse, CarUpdateRequest};
use crate::models::{
    booking, car, car_body, car_brand, car_image, drive_type, engine_type, rental_class,
    transmission,
};
use crate::services::reference_service::ReferenceService;

pub struct CarService;

impl CarService {
    /// Crée une voiture. Chacune des six FK doit pointer vers une entrée
    /// de référence existante.
    pub async fn create(
        db: &DatabaseConnection,
        data: CarCreateRequest,
    ) -> Result<car::Model, ApiError> {
        if data.price <= Decimal::ZERO {
            return Err(ApiError::BadRequest(
                "Price must be greater than 0".to_string(),
            ));
        }

        Self::validate_references(
            db,
            Some(data.car_brand_id),
            Some(data.transmission_id),
            Some(data.body_id),
            Some(data.engine_type_id),
            Some(data.drive_id),
            Some(data.rental_class_id),
        )
        .await?;

        let new_car = car::ActiveModel {
            car_brand_id: Set(data.car_brand_id),
            model: Set(data.model),
            transmission_id: Set(data.transmission_id),
            body_id: Set(data.body_id),
            year: Set(data.year),
            engine_type_id: Set(data.engine_type_id),
            drive_id: Set(data.drive_id),
            mileage: Set(data.mileage),
            price: Set(data.price),
            rental_class_id: Set(data.rental_class_id),
            seats: Set(data.seats),
            trunk_volume: Set(data.trunk_volume),
            ..Default::default()
        };

        Ok(new_car.insert(db).await?)
    }

    /// Construit la requête de listing avec tous les filtres appliqués.
    /// Isolée pour être vérifiable sans base de données.
    pub fn list_query(filters: &CarListQuery) -> Select<car::Entity> {
        let mut query = car::Entity::find();

        if let Some(brand_id) = filters.brand_id {
            query = query.filter(car::Column::CarBrandId.eq(brand_id));
        }
        if let Some(model) = &filters.model {
            // Sous-chaîne insensible à la casse
            query = query.filter(
                Expr::col((car::Entity, car::Column::Model)).ilike(format!("%{}%", model)),
            );
        }
        if let Some(min_price) = filters.min_price {
            query = query.filter(car::Column::Price.gte(min_price));
        }
        if let Some(max_price) = filters.max_price {
            query = query.filter(car::Column::Price.lte(max_price));
        }

        query
            .order_by_asc(car::Column::Id)
            .limit(filters.limit)
            .offset(filters.offset)
    }

    pub async fn list(
        db: &DatabaseConnection,
        filters: &CarListQuery,
    ) -> Result<Vec<CarResponse>, ApiError> {
        let cars = Self::list_query(filters).all(db).await?;
        Self::with_relations(db, cars).await
    }

    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<CarResponse, ApiError> {
        let car = car::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Car not found".to_string()))?;

        let mut responses = Self::with_relations(db, vec![car]).await?;
        // with_relations préserve la cardinalité de l'entrée
        responses
            .pop()
            .ok_or_else(|| ApiError::Internal("Failed to load car relations".to_string()))
    }

    /// Mise à jour partielle. Les FK présentes sont revalidées comme à la
    /// création ; les champs absents restent intacts.
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        data: CarUpdateRequest,
    ) -> Result<CarResponse, ApiError> {
        let current = car::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Car not found".to_string()))?;

        if let Some(price) = data.price {
            if price <= Decimal::ZERO {
                return Err(ApiError::BadRequest(
                    "Price must be greater than 0".to_string(),
                ));
            }
        }

        Self::validate_references(
            db,
            data.car_brand_id,
            data.transmission_id,
            data.body_id,
            data.engine_type_id,
            data.drive_id,
            data.rental_class_id,
        )
        .await?;

        let mut row: car::ActiveModel = current.into();
        let mut changed = false;

        if let Some(v) = data.car_brand_id {
            row.car_brand_id = Set(v);
            changed = true;
        }
        if let Some(v) = data.model {
            row.model = Set(v);
            changed = true;
        }
        if let Some(v) = data.transmission_id {
            row.transmission_id = Set(v);
            changed = true;
        }
        if let Some(v) = data.body_id {
            row.body_id = Set(v);
            changed = true;
        }
        if let Some(v) = data.year {
            row.year = Set(v);
            changed = true;
        }
        if let Some(v) = data.engine_type_id {
            row.engine_type_id = Set(v);
            changed = true;
        }
        if let Some(v) = data.drive_id {
            row.drive_id = Set(v);
            changed = true;
        }
        if let Some(v) = data.mileage {
            row.mileage = Set(v);
            changed = true;
        }
        if let Some(v) = data.price {
            row.price = Set(v);
            changed = true;
        }
        if let Some(v) = data.rental_class_id {
            row.rental_class_id = Set(v);
            changed = true;
        }
        if let Some(v) = data.seats {
            row.seats = Set(Some(v));
            changed = true;
        }
        if let Some(v) = data.trunk_volume {
            row.trunk_volume = Set(Some(v));
            changed = true;
        }

        if changed {
            row.update(db).await?;
        }

        Self::get(db, id).await
    }

    /// Suppression, refusée tant que des réservations existent pour la
    /// voiture. Images et avis partent en cascade (politique FK).
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), ApiError> {
        let car = car::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Car not found".to_string()))?;

        let has_booking = booking::Entity::find()
            .filter(booking::Column::CarId.eq(id))
            .one(db)
            .await?;
        if has_booking.is_some() {
            return Err(ApiError::Conflict(
                "Cannot delete car with active bookings".to_string(),
            ));
        }

        car::Entity::delete_by_id(car.id).exec(db).await?;
        Ok(())
    }

    /// Résout les six références et les images de chaque voiture
    /// (une requête par association, pas de N+1).
    pub async fn with_relations(
        db: &DatabaseConnection,
        cars: Vec<car::Model>,
    ) -> Result<Vec<CarResponse>, ApiError> {
        if cars.is_empty() {
            return Ok(Vec::new());
        }

        let brands = cars.load_one(car_brand::Entity, db).await?;
        let transmissions = cars.load_one(transmission::Entity, db).await?;
        let bodies = cars.load_one(car_body::Entity, db).await?;
        let engine_types = cars.load_one(engine_type::Entity, db).await?;
        let drives = cars.load_one(drive_type::Entity, db).await?;
        let rental_classes = cars.load_one(rental_class::Entity, db).await?;
        let images = cars.load_many(car_image::Entity, db).await?;

        let responses = cars
            .into_iter()
            .enumerate()
            .map(|(i, car)| {
                CarResponse::from_parts(
                    car,
                    brands.get(i).cloned().flatten(),
                    transmissions.get(i).cloned().flatten(),
                    bodies.get(i).cloned().flatten(),
                    engine_types.get(i).cloned().flatten(),
                    drives.get(i).cloned().flatten(),
                    rental_classes.get(i).cloned().flatten(),
                    images.get(i).cloned().unwrap_or_default(),
                )
            })
            .collect();

        Ok(responses)
    }

    /// Vérifie l'existence des références fournies, dans l'ordre des
    /// colonnes de la table. `None` = champ absent, pas de vérification.
    async fn validate_references(
        db: &DatabaseConnection,
        car_brand_id: Option<i32>,
        transmission_id: Option<i32>,
        body_id: Option<i32>,
        engine_type_id: Option<i32>,
        drive_id: Option<i32>,
        rental_class_id: Option<i32>,
    ) -> Result<(), ApiError> {
        if let Some(id) = car_brand_id {
            ReferenceService::ensure_exists::<car_brand::Entity>(db, id).await?;
        }
        if let Some(id) = transmission_id {
            ReferenceService::ensure_exists::<transmission::Entity>(db, id).await?;
        }
        if let Some(id) = body_id {
            ReferenceService::ensure_exists::<car_body::Entity>(db, id).await?;
        }
        if let Some(id) = engine_type_id {
            ReferenceService::ensure_exists::<engine_type::Entity>(db, id).await?;
        }
        if let Some(id) = drive_id {
            ReferenceService::ensure_exists::<drive_type::Entity>(db, id).await?;
        }
        if let Some(id) = rental_class_id {
            ReferenceService::ensure_exists::<rental_class::Entity>(db, id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

    fn create_request() -> CarCreateRequest {
        CarCreateRequest {
            car_brand_id: 1,
            model: "Civic".to_string(),
            transmission_id: 2,
            body_id: 3,
            year: 2021,
            engine_type_id: 4,
            drive_id: 5,
            mileage: 30000,
            price: Decimal::new(7500, 2),
            rental_class_id: 6,
            seats: Some(5),
            trunk_volume: Some(420),
        }
    }

    fn car_fixture(id: i32) -> car::Model {
        car::Model {
            id,
            car_brand_id: 1,
            model: "Civic".to_string(),
            transmission_id: 2,
            body_id: 3,
            year: 2021,
            engine_type_id: 4,
            drive_id: 5,
            mileage: 30000,
            price: Decimal::new(7500, 2),
            rental_class_id: 6,
            seats: Some(5),
            trunk_volume: Some(420),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_price() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let mut data = create_request();
        data.price = Decimal::ZERO;

        let err = CarService::create(&db, data).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_create_names_missing_reference() {
        // marque, transmission et carrosserie existent, la motorisation non
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![car_brand::Model {
                id: 1,
                name: "Honda".to_string(),
            }]])
            .append_query_results([vec![transmission::Model {
                id: 2,
                name: "Automatic".to_string(),
            }]])
            .append_query_results([vec![car_body::Model {
                id: 3,
                name: "Sedan".to_string(),
            }]])
            .append_query_results([Vec::<engine_type::Model>::new()])
            .into_connection();

        let err = CarService::create(&db, create_request()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Engine type with the specified ID does not exist"
        );
    }

    #[tokio::test]
    async fn test_delete_with_booking_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![car_fixture(10)]])
            .append_query_results([vec![booking::Model {
                id: 1,
                user_id: 7,
                car_id: 10,
                date_start: chrono::Utc::now().fixed_offset(),
                date_end: chrono::Utc::now().fixed_offset(),
            }]])
            .into_connection();

        let err = CarService::delete(&db, 10).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.to_string(), "Cannot delete car with active bookings");
    }

    #[test]
    fn test_list_query_applies_all_filters() {
        let filters = CarListQuery {
            brand_id: Some(1),
            model: Some("civic".to_string()),
            min_price: Some(Decimal::new(10000, 2)),
            max_price: Some(Decimal::new(20000, 2)),
            limit: 100,
            offset: 0,
        };

        let sql = CarService::list_query(&filters)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains("ILIKE"));
        assert!(sql.contains("%civic%"));
        assert!(sql.contains("\"car_brand_id\" = 1"));
        assert!(sql.contains(">="));
        assert!(sql.contains("<="));
        assert!(sql.contains("LIMIT 100"));
        assert!(sql.contains("OFFSET 0"));
    }

    #[test]
    fn test_list_query_without_filters_only_paginates() {
        let filters = CarListQuery {
            brand_id: None,
            model: None,
            min_price: None,
            max_price: None,
            limit: 100,
            offset: 40,
        };

        let sql = CarService::list_query(&filters)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("LIMIT 100"));
        assert!(sql.contains("OFFSET 40"));
    }
}
