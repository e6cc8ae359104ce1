use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::users::UserRole;
use crate::utils::token;

/// Structure qui contient les infos de l'utilisateur authentifié
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub role: UserRole,
    pub balance: Decimal,
    /// Token brut présenté par le client (utile pour le logout)
    pub token: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Implémentation de FromRequest pour AuthUser
/// Cela permet à Actix-Web d'extraire automatiquement AuthUser des requêtes
impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extraire le header Authorization
            let auth_header = req
                .headers()
                .get("Authorization")
                .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

            // 2. Convertir le header en string
            let auth_str = auth_header
                .to_str()
                .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

            // 3. Extraire le token (format: "Bearer <token>")
            let raw_token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
                ApiError::Unauthorized(
                    "Invalid Authorization format (expected: Bearer <token>)".to_string(),
                )
            })?;

            // 4. Résoudre le token en utilisateur via la BD
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| ApiError::Internal("Database connection is not set up".to_string()))?;
            let config = req
                .app_data::<web::Data<AppConfig>>()
                .ok_or_else(|| ApiError::Internal("Application config is not set up".to_string()))?;

            let user =
                token::authenticate(db.get_ref(), raw_token, config.access_token_lifetime_secs)
                    .await?;

            // 5. Créer et retourner AuthUser
            Ok(AuthUser {
                user_id: user.id,
                email: user.email,
                role: user.role,
                balance: user.balance,
                token: raw_token.to_string(),
            })
        })
    }
}

/// Extracteur réservé aux administrateurs.
/// Refuse avec 403 tout utilisateur dont le rôle n'est pas admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = AuthUser::from_request(req, payload);

        Box::pin(async move {
            let user = fut.await?;
            if !user.is_admin() {
                return Err(ApiError::Forbidden(
                    "Only admin can perform this action".to_string(),
                ));
            }
            Ok(AdminUser(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::models::{access_tokens, users};

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: String::new(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8000,
            media_root: "static/media".to_string(),
            cors_allowed_origin: "*".to_string(),
            access_token_lifetime_secs: 86400,
        }
    }

    fn mock_db(role: UserRole) -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![access_tokens::Model {
                token: "t".to_string(),
                user_id: 7,
                created_at: Utc::now().fixed_offset(),
            }]])
            .append_query_results([vec![users::Model {
                id: 7,
                email: "user@getcar.dev".to_string(),
                hashed_password: "pbkdf2:sha256:260000$x$y".to_string(),
                phone: "+79990001122".to_string(),
                full_name: "Test User".to_string(),
                created_at: Utc::now().fixed_offset(),
                updated_at: Utc::now().fixed_offset(),
                role,
                balance: Decimal::ZERO,
                is_active: true,
                is_superuser: false,
                is_verified: true,
            }]])
            .into_connection()
    }

    #[actix_web::test]
    async fn test_missing_header_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(web::Data::new(mock_db(UserRole::User)))
            .app_data(web::Data::new(test_config()))
            .to_http_request();

        let err = AuthUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[actix_web::test]
    async fn test_auth_user_resolves_token() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer t"))
            .app_data(web::Data::new(mock_db(UserRole::User)))
            .app_data(web::Data::new(test_config()))
            .to_http_request();

        let user = AuthUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(user.user_id, 7);
        assert!(!user.is_admin());
        assert_eq!(user.token, "t");
    }

    #[actix_web::test]
    async fn test_admin_extractor_rejects_regular_user() {
        // Un utilisateur valide mais non admin: 403, peu importe le payload
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer t"))
            .app_data(web::Data::new(mock_db(UserRole::User)))
            .app_data(web::Data::new(test_config()))
            .to_http_request();

        let err = AdminUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[actix_web::test]
    async fn test_admin_extractor_accepts_admin() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer t"))
            .app_data(web::Data::new(mock_db(UserRole::Admin)))
            .app_data(web::Data::new(test_config()))
            .to_http_request();

        let admin = AdminUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert!(admin.0.is_admin());
    }
}
