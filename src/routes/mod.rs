pub mod auth;
pub mod booking;
pub mod car_images;
pub mod cars;
pub mod health;
pub mod reference;
pub mod reviews;
pub mod users;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(users::user_routes)
            .configure(reference::reference_routes)
            .configure(cars::car_routes)
            .configure(car_images::car_image_routes)
            .configure(booking::booking_routes)
            .configure(reviews::review_routes),
    );
}
