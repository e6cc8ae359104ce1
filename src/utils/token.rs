use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Utc};
use rand::Rng;
use sea_orm::{DatabaseConnection, EntityTrait, ModelTrait};

use crate::error::ApiError;
use crate::models::access_tokens::{self, Entity as AccessTokens};
use crate::models::users;

const TOKEN_BYTES: usize = 32;

/// Génère un bearer token opaque (43 caractères URL-safe).
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Résout un bearer token en utilisateur.
/// Le token doit exister en BD, ne pas être expiré (created_at + lifetime)
/// et appartenir à un compte actif.
pub async fn authenticate(
    db: &DatabaseConnection,
    token: &str,
    lifetime_secs: i64,
) -> Result<users::Model, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid or expired token".to_string());

    let row = AccessTokens::find_by_id(token.to_string())
        .one(db)
        .await?
        .ok_or_else(invalid)?;

    let expires_at = row.created_at + Duration::seconds(lifetime_secs);
    if expires_at < Utc::now().fixed_offset() {
        return Err(invalid());
    }

    let user = row
        .find_related(users::Entity)
        .one(db)
        .await?
        .ok_or_else(invalid)?;

    if !user.is_active {
        return Err(invalid());
    }

    Ok(user)
}

/// Révoque un token (logout). Sans effet si le token n'existe plus.
pub async fn revoke(db: &DatabaseConnection, token: &str) -> Result<(), ApiError> {
    AccessTokens::delete_by_id(token.to_string()).exec(db).await?;
    Ok(())
}

/// Insère un nouveau token pour un utilisateur et le retourne.
pub async fn issue(db: &DatabaseConnection, user_id: i32) -> Result<String, ApiError> {
    use sea_orm::{ActiveModelTrait, Set};

    let token = generate_token();
    let row = access_tokens::ActiveModel {
        token: Set(token.clone()),
        user_id: Set(user_id),
        created_at: Set(Utc::now().fixed_offset()),
    };
    row.insert(db).await?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use rust_decimal::Decimal;

    fn test_user() -> users::Model {
        users::Model {
            id: 7,
            email: "user@getcar.dev".to_string(),
            hashed_password: "pbkdf2:sha256:260000$x$y".to_string(),
            phone: "+79990001122".to_string(),
            full_name: "Test User".to_string(),
            created_at: Utc::now().fixed_offset(),
            updated_at: Utc::now().fixed_offset(),
            role: users::UserRole::User,
            balance: Decimal::new(10000, 2),
            is_active: true,
            is_superuser: false,
            is_verified: true,
        }
    }

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 43);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[tokio::test]
    async fn test_authenticate_valid_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![access_tokens::Model {
                token: "abc".to_string(),
                user_id: 7,
                created_at: Utc::now().fixed_offset(),
            }]])
            .append_query_results([vec![test_user()]])
            .into_connection();

        let user = authenticate(&db, "abc", 86400).await.unwrap();
        assert_eq!(user.id, 7);
    }

    #[tokio::test]
    async fn test_authenticate_expired_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![access_tokens::Model {
                token: "abc".to_string(),
                user_id: 7,
                created_at: Utc::now().fixed_offset() - Duration::seconds(90000),
            }]])
            .into_connection();

        let err = authenticate(&db, "abc", 86400).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<access_tokens::Model>::new()])
            .into_connection();

        let err = authenticate(&db, "missing", 86400).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
