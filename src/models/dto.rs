// Data Transfer Objects pour les requêtes/réponses agrégées de l'API.
// Les DTOs simples (auth, références) vivent dans leurs fichiers de routes.

use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use validator::Validate;

use super::{booking, car, car_body, car_brand, car_image, drive_type, engine_type, rental_class, transmission};

// ---------------------------------------------------------------------------
// Cars
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CarCreateRequest {
    pub car_brand_id: i32,
    #[validate(length(min = 1, max = 128))]
    pub model: String,
    pub transmission_id: i32,
    pub body_id: i32,
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    pub engine_type_id: i32,
    pub drive_id: i32,
    #[validate(range(min = 0))]
    pub mileage: i32,
    pub price: Decimal,
    pub rental_class_id: i32,
    pub seats: Option<i32>,
    pub trunk_volume: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CarUpdateRequest {
    pub car_brand_id: Option<i32>,
    #[validate(length(min = 1, max = 128))]
    pub model: Option<String>,
    pub transmission_id: Option<i32>,
    pub body_id: Option<i32>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    pub engine_type_id: Option<i32>,
    pub drive_id: Option<i32>,
    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
    pub price: Option<Decimal>,
    pub rental_class_id: Option<i32>,
    pub seats: Option<i32>,
    pub trunk_volume: Option<i32>,
}

fn default_limit() -> u64 {
    100
}

#[derive(Debug, Deserialize, Validate)]
pub struct CarListQuery {
    pub brand_id: Option<i32>,
    /// Filtre par modèle, sous-chaîne insensible à la casse
    pub model: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    #[serde(default = "default_limit")]
    #[validate(range(max = 1000))]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Voiture avec toutes ses références et images résolues,
/// la forme renvoyée par GET /api/cars.
#[derive(Debug, Clone, Serialize)]
pub struct CarResponse {
    pub id: i32,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub price: Decimal,
    pub seats: Option<i32>,
    pub trunk_volume: Option<i32>,
    pub car_brand: Option<car_brand::Model>,
    pub transmission: Option<transmission::Model>,
    pub body: Option<car_body::Model>,
    pub engine_type: Option<engine_type::Model>,
    pub drive: Option<drive_type::Model>,
    pub rental_class: Option<rental_class::Model>,
    pub images: Vec<car_image::Model>,
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct BookingCreateRequest {
    pub car_id: i32,
    pub date_start: DateTimeWithTimeZone,
    pub date_end: DateTimeWithTimeZone,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingUpdateRequest {
    pub car_id: Option<i32>,
    pub date_start: Option<DateTimeWithTimeZone>,
    pub date_end: Option<DateTimeWithTimeZone>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: i32,
    pub user_id: i32,
    pub car_id: i32,
    pub date_start: DateTimeWithTimeZone,
    pub date_end: DateTimeWithTimeZone,
    pub car: Option<CarResponse>,
}

impl BookingResponse {
    pub fn from_model(b: booking::Model, car: Option<CarResponse>) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            car_id: b.car_id,
            date_start: b.date_start,
            date_end: b.date_end,
            car,
        }
    }
}

impl CarResponse {
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        car: car::Model,
        car_brand: Option<car_brand::Model>,
        transmission: Option<transmission::Model>,
        body: Option<car_body::Model>,
        engine_type: Option<engine_type::Model>,
        drive: Option<drive_type::Model>,
        rental_class: Option<rental_class::Model>,
        images: Vec<car_image::Model>,
    ) -> Self {
        Self {
            id: car.id,
            model: car.model,
            year: car.year,
            mileage: car.mileage,
            price: car.price,
            seats: car.seats,
            trunk_volume: car.trunk_volume,
            car_brand,
            transmission,
            body,
            engine_type,
            drive,
            rental_class,
            images,
        }
    }
}
