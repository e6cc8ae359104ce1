pub mod booking_service;
pub mod car_service;
pub mod image_service;
pub mod reference_service;
