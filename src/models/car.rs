use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "car")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub car_brand_id: i32,
    pub model: String,
    pub transmission_id: i32,
    pub body_id: i32,
    pub year: i32,
    pub engine_type_id: i32,
    pub drive_id: i32,
    pub mileage: i32,
    /// Prix de location par jour
    pub price: Decimal,
    pub rental_class_id: i32,
    pub seats: Option<i32>,
    pub trunk_volume: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::car_brand::Entity",
        from = "Column::CarBrandId",
        to = "super::car_brand::Column::Id"
    )]
    CarBrand,

    #[sea_orm(
        belongs_to = "super::transmission::Entity",
        from = "Column::TransmissionId",
        to = "super::transmission::Column::Id"
    )]
    Transmission,

    #[sea_orm(
        belongs_to = "super::car_body::Entity",
        from = "Column::BodyId",
        to = "super::car_body::Column::Id"
    )]
    Body,

    #[sea_orm(
        belongs_to = "super::engine_type::Entity",
        from = "Column::EngineTypeId",
        to = "super::engine_type::Column::Id"
    )]
    EngineType,

    #[sea_orm(
        belongs_to = "super::drive_type::Entity",
        from = "Column::DriveId",
        to = "super::drive_type::Column::Id"
    )]
    Drive,

    #[sea_orm(
        belongs_to = "super::rental_class::Entity",
        from = "Column::RentalClassId",
        to = "super::rental_class::Column::Id"
    )]
    RentalClass,

    #[sea_orm(has_many = "super::car_image::Entity")]
    CarImage,

    #[sea_orm(has_many = "super::car_review::Entity")]
    CarReview,

    #[sea_orm(has_many = "super::booking::Entity")]
    Booking,
}

impl Related<super::car_brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarBrand.def()
    }
}

impl Related<super::transmission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transmission.def()
    }
}

impl Related<super::car_body::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Body.def()
    }
}

impl Related<super::engine_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EngineType.def()
    }
}

impl Related<super::drive_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drive.def()
    }
}

impl Related<super::rental_class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalClass.def()
    }
}

impl Related<super::car_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarImage.def()
    }
}

impl Related<super::car_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarReview.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
