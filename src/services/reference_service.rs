// Contrat CRUD générique des tables de référence (marque, transmission,
// carrosserie, motorisation, transmission intégrale, classe de location).
// La logique n'existe qu'une seule fois ici ; chaque table fournit sa
// configuration via une implémentation de ReferenceEntity.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, SqlErr,
};

use crate::error::ApiError;
use crate::models::{car, car_body, car_brand, drive_type, engine_type, rental_class, transmission};

/// Description d'une table de référence. Les implémentations ne portent que
/// de la configuration (colonnes, nom affiché, FK côté `car`).
pub trait ReferenceEntity: EntityTrait {
    type ActiveModel: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Default + Send + 'static;

    /// Nom affiché dans les messages d'erreur ("Car brand", ...)
    const DISPLAY_NAME: &'static str;
    const ID: Self::Column;
    const NAME: Self::Column;
    /// Colonne de `car` qui référence cette table
    const CAR_FK: car::Column;
}

impl ReferenceEntity for car_brand::Entity {
    type ActiveModel = car_brand::ActiveModel;
    const DISPLAY_NAME: &'static str = "Car brand";
    const ID: car_brand::Column = car_brand::Column::Id;
    const NAME: car_brand::Column = car_brand::Column::Name;
    const CAR_FK: car::Column = car::Column::CarBrandId;
}

impl ReferenceEntity for transmission::Entity {
    type ActiveModel = transmission::ActiveModel;
    const DISPLAY_NAME: &'static str = "Transmission";
    const ID: transmission::Column = transmission::Column::Id;
    const NAME: transmission::Column = transmission::Column::Name;
    const CAR_FK: car::Column = car::Column::TransmissionId;
}

impl ReferenceEntity for car_body::Entity {
    type ActiveModel = car_body::ActiveModel;
    const DISPLAY_NAME: &'static str = "Car body";
    const ID: car_body::Column = car_body::Column::Id;
    const NAME: car_body::Column = car_body::Column::Name;
    const CAR_FK: car::Column = car::Column::BodyId;
}

impl ReferenceEntity for engine_type::Entity {
    type ActiveModel = engine_type::ActiveModel;
    const DISPLAY_NAME: &'static str = "Engine type";
    const ID: engine_type::Column = engine_type::Column::Id;
    const NAME: engine_type::Column = engine_type::Column::Name;
    const CAR_FK: car::Column = car::Column::EngineTypeId;
}

impl ReferenceEntity for drive_type::Entity {
    type ActiveModel = drive_type::ActiveModel;
    const DISPLAY_NAME: &'static str = "Drive type";
    const ID: drive_type::Column = drive_type::Column::Id;
    const NAME: drive_type::Column = drive_type::Column::Name;
    const CAR_FK: car::Column = car::Column::DriveId;
}

impl ReferenceEntity for rental_class::Entity {
    type ActiveModel = rental_class::ActiveModel;
    const DISPLAY_NAME: &'static str = "Rental class";
    const ID: rental_class::Column = rental_class::Column::Id;
    const NAME: rental_class::Column = rental_class::Column::Name;
    const CAR_FK: car::Column = car::Column::RentalClassId;
}

pub struct ReferenceService;

impl ReferenceService {
    /// Crée une entrée. Refuse les doublons de nom, soit par la
    /// pré-vérification, soit par la contrainte d'unicité si deux créations
    /// concurrentes passent la pré-vérification en même temps.
    pub async fn create<E>(db: &DatabaseConnection, name: String) -> Result<E::Model, ApiError>
    where
        E: ReferenceEntity,
        E::Model: IntoActiveModel<<E as ReferenceEntity>::ActiveModel>,
    {
        let existing = E::find()
            .filter(E::NAME.eq(name.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(Self::name_conflict::<E>());
        }

        let mut row = <<E as ReferenceEntity>::ActiveModel as std::default::Default>::default();
        row.set(E::NAME, name.into());

        match row.insert(db).await {
            Ok(model) => Ok(model),
            Err(err) => Err(Self::translate_unique::<E>(err)),
        }
    }

    pub async fn list<E>(db: &DatabaseConnection) -> Result<Vec<E::Model>, ApiError>
    where
        E: ReferenceEntity,
    {
        Ok(E::find().all(db).await?)
    }

    pub async fn get<E>(db: &DatabaseConnection, id: i32) -> Result<E::Model, ApiError>
    where
        E: ReferenceEntity,
    {
        E::find()
            .filter(E::ID.eq(id))
            .one(db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("{} not found", E::DISPLAY_NAME)))
    }

    /// Mise à jour partielle. Le renommage vers un nom déjà pris par une
    /// AUTRE entrée est un conflit ; renommer vers son propre nom passe.
    pub async fn update<E>(
        db: &DatabaseConnection,
        id: i32,
        name: Option<String>,
    ) -> Result<E::Model, ApiError>
    where
        E: ReferenceEntity,
        E::Model: IntoActiveModel<<E as ReferenceEntity>::ActiveModel>,
    {
        let current = Self::get::<E>(db, id).await?;

        let Some(name) = name else {
            // Aucun champ fourni: rien à appliquer
            return Ok(current);
        };

        let taken = E::find()
            .filter(E::NAME.eq(name.as_str()))
            .filter(E::ID.ne(id))
            .one(db)
            .await?;
        if taken.is_some() {
            return Err(Self::name_conflict::<E>());
        }

        let mut row = <<E as ReferenceEntity>::ActiveModel as std::default::Default>::default();
        row.set(E::ID, id.into());
        row.set(E::NAME, name.into());

        match row.update(db).await {
            Ok(model) => Ok(model),
            Err(DbErr::RecordNotUpdated) => {
                Err(ApiError::NotFound(format!("{} not found", E::DISPLAY_NAME)))
            }
            Err(err) => Err(Self::translate_unique::<E>(err)),
        }
    }

    /// Suppression, refusée tant qu'au moins une voiture référence l'entrée.
    pub async fn delete<E>(db: &DatabaseConnection, id: i32) -> Result<(), ApiError>
    where
        E: ReferenceEntity,
    {
        Self::get::<E>(db, id).await?;

        let dependent = car::Entity::find()
            .filter(E::CAR_FK.eq(id))
            .one(db)
            .await?;
        if dependent.is_some() {
            return Err(ApiError::Conflict(format!(
                "Cannot delete {} with associated cars",
                E::DISPLAY_NAME.to_lowercase()
            )));
        }

        E::delete_many().filter(E::ID.eq(id)).exec(db).await?;
        Ok(())
    }

    /// Vérifie qu'un id de référence existe, pour la validation des FK
    /// d'une voiture. L'absence est une 400 qui nomme la table fautive.
    pub async fn ensure_exists<E>(db: &DatabaseConnection, id: i32) -> Result<(), ApiError>
    where
        E: ReferenceEntity,
    {
        let found = E::find().filter(E::ID.eq(id)).one(db).await?;
        if found.is_none() {
            return Err(ApiError::BadRequest(format!(
                "{} with the specified ID does not exist",
                E::DISPLAY_NAME
            )));
        }
        Ok(())
    }

    fn name_conflict<E: ReferenceEntity>() -> ApiError {
        ApiError::Conflict(format!("{} with this name already exists", E::DISPLAY_NAME))
    }

    fn translate_unique<E: ReferenceEntity>(err: DbErr) -> ApiError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::name_conflict::<E>(),
            _ => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn brand(id: i32, name: &str) -> car_brand::Model {
        car_brand::Model {
            id,
            name: name.to_string(),
        }
    }

    fn car_fixture(id: i32, brand_id: i32) -> car::Model {
        car::Model {
            id,
            car_brand_id: brand_id,
            model: "Civic".to_string(),
            transmission_id: 1,
            body_id: 1,
            year: 2020,
            engine_type_id: 1,
            drive_id: 1,
            mileage: 45000,
            price: rust_decimal::Decimal::new(7500, 2),
            rental_class_id: 1,
            seats: Some(5),
            trunk_volume: None,
        }
    }

    #[tokio::test]
    async fn test_create_returns_new_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<car_brand::Model>::new()])
            .append_query_results([vec![brand(1, "Honda")]])
            .into_connection();

        let created = ReferenceService::create::<car_brand::Entity>(&db, "Honda".to_string())
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Honda");
    }

    #[tokio::test]
    async fn test_create_duplicate_name_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![brand(1, "Honda")]])
            .into_connection();

        let err = ReferenceService::create::<car_brand::Entity>(&db, "Honda".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.to_string(), "Car brand with this name already exists");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<car_brand::Model>::new()])
            .into_connection();

        let err = ReferenceService::get::<car_brand::Entity>(&db, 99)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rename_to_taken_name_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // l'entrée mise à jour existe
            .append_query_results([vec![brand(1, "Honda")]])
            // une AUTRE entrée détient déjà le nom cible
            .append_query_results([vec![brand(2, "Toyota")]])
            .into_connection();

        let err = ReferenceService::update::<car_brand::Entity>(&db, 1, Some("Toyota".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_rename_to_own_name_succeeds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![brand(1, "Honda")]])
            // la vérification d'unicité exclut la ligne elle-même
            .append_query_results([Vec::<car_brand::Model>::new()])
            .append_query_results([vec![brand(1, "Honda")]])
            .into_connection();

        let updated = ReferenceService::update::<car_brand::Entity>(&db, 1, Some("Honda".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.name, "Honda");
    }

    #[tokio::test]
    async fn test_update_without_fields_returns_current_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![brand(1, "Honda")]])
            .into_connection();

        let updated = ReferenceService::update::<car_brand::Entity>(&db, 1, None)
            .await
            .unwrap();
        assert_eq!(updated.name, "Honda");
    }

    #[tokio::test]
    async fn test_delete_with_dependent_car_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![brand(1, "Honda")]])
            .append_query_results([vec![car_fixture(10, 1)]])
            .into_connection();

        let err = ReferenceService::delete::<car_brand::Entity>(&db, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(
            err.to_string(),
            "Cannot delete car brand with associated cars"
        );
    }

    #[tokio::test]
    async fn test_delete_without_dependents_succeeds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![brand(1, "Honda")]])
            .append_query_results([Vec::<car::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        ReferenceService::delete::<car_brand::Entity>(&db, 1)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_ensure_exists_names_the_missing_reference() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<engine_type::Model>::new()])
            .into_connection();

        let err = ReferenceService::ensure_exists::<engine_type::Entity>(&db, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(
            err.to_string(),
            "Engine type with the specified ID does not exist"
        );
    }
}
