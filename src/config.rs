// Configuration du processus, construite une seule fois au démarrage
// et partagée via web::Data (pas de global mutable).

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub media_root: String,
    pub cors_allowed_origin: String,
    /// Durée de vie d'un access token en secondes (86400 = 24h)
    pub access_token_lifetime_secs: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file");

        Self {
            database_url,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            media_root: env::var("MEDIA_ROOT")
                .unwrap_or_else(|_| "static/media".to_string()),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            access_token_lifetime_secs: env::var("ACCESS_TOKEN_LIFETIME_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86400),
        }
    }
}
