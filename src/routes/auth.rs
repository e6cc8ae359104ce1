use actix_web::{post, web, HttpResponse};
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::email_verification_tokens::{
    self, Column as VerificationTokenColumn, Entity as EmailVerificationTokens,
};
use crate::models::password_reset_tokens::{
    self, Column as ResetTokenColumn, Entity as PasswordResetTokens,
};
use crate::models::users::{self, Column as UserColumn, Entity as Users, UserRole};
use crate::utils::{password, token};

// DTO pour l'inscription
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub phone: String,
    pub full_name: String,
}

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// DTO pour la vérification email
#[derive(Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

// Réponse après login
#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /api/auth/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    // 1. Vérifier si l'email est déjà pris
    let existing = Users::find()
        .filter(UserColumn::Email.eq(body.email.as_str()))
        .one(db.get_ref())
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    // 2. Hash du mot de passe
    let hashed_password = password::hash_password(&body.password)
        .map_err(ApiError::Internal)?;

    // 3. Créer l'utilisateur (role user, solde 0, non vérifié)
    let now = Utc::now().fixed_offset();
    let new_user = users::ActiveModel {
        email: Set(body.email.clone()),
        hashed_password: Set(hashed_password),
        phone: Set(body.phone.clone()),
        full_name: Set(body.full_name.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        role: Set(UserRole::User),
        balance: Set(rust_decimal::Decimal::ZERO),
        is_active: Set(true),
        is_superuser: Set(false),
        is_verified: Set(false),
        ..Default::default()
    };

    let user = match new_user.insert(db.get_ref()).await {
        Ok(user) => user,
        // Deux inscriptions concurrentes avec le même email: la contrainte
        // d'unicité tranche, même réponse que la pré-vérification
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                return Err(ApiError::Conflict(
                    "User with this email already exists".to_string(),
                ));
            }
            _ => return Err(err.into()),
        },
    };

    log::warn!("User {} has registered.", user.id);

    Ok(HttpResponse::Created().json(user))
}

/// POST /api/auth/login - Se connecter, émet un bearer token (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    // 1. Trouver l'utilisateur
    let user = Users::find()
        .filter(UserColumn::Email.eq(body.email.as_str()))
        .one(db.get_ref())
        .await?
        .ok_or_else(invalid)?;

    // 2. Vérifier le mot de passe
    let is_valid = password::verify_password(&body.password, &user.hashed_password)
        .map_err(ApiError::Internal)?;
    if !is_valid || !user.is_active {
        return Err(invalid());
    }

    // 3. Émettre le token
    let access_token = token::issue(db.get_ref(), user.id).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// POST /api/auth/logout - Révoquer le token présenté (PROTÉGÉE)
#[post("/logout")]
pub async fn logout(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    token::revoke(db.get_ref(), &auth_user.token).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/auth/request-verify-token - Demander la vérification email (PROTÉGÉE)
#[post("/request-verify-token")]
pub async fn request_verify_token(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let now = Utc::now().fixed_offset();
    let verification_token = Uuid::new_v4().to_string();

    let row = email_verification_tokens::ActiveModel {
        user_id: Set(auth_user.user_id),
        token: Set(verification_token.clone()),
        expires_at: Set(now + Duration::hours(24)),
        used: Set(false),
        created_at: Set(now),
        ..Default::default()
    };
    row.insert(db.get_ref()).await?;

    log::warn!(
        "Verification requested for user {}. Verification token: {}",
        auth_user.user_id,
        verification_token
    );

    Ok(HttpResponse::Accepted().finish())
}

/// POST /api/auth/verify - Consommer un token de vérification (PUBLIC)
#[post("/verify")]
pub async fn verify(
    body: web::Json<VerifyRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let bad_token = || ApiError::BadRequest("Invalid or expired verification token".to_string());

    // 1. Le token doit exister, ne pas être consommé ni expiré
    let token_row = EmailVerificationTokens::find()
        .filter(VerificationTokenColumn::Token.eq(body.token.as_str()))
        .filter(VerificationTokenColumn::Used.eq(false))
        .one(db.get_ref())
        .await?
        .ok_or_else(bad_token)?;

    if token_row.expires_at < Utc::now().fixed_offset() {
        return Err(bad_token());
    }

    let user = Users::find_by_id(token_row.user_id)
        .one(db.get_ref())
        .await?
        .ok_or_else(bad_token)?;

    if user.is_verified {
        return Err(ApiError::BadRequest("User is already verified".to_string()));
    }

    // 2. Marquer l'utilisateur vérifié, consommer le token
    let mut user_row: users::ActiveModel = user.into();
    user_row.is_verified = Set(true);
    user_row.updated_at = Set(Utc::now().fixed_offset());
    let user = user_row.update(db.get_ref()).await?;

    let mut consumed: email_verification_tokens::ActiveModel = token_row.into();
    consumed.used = Set(true);
    consumed.update(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// POST /api/auth/forgot-password - Demander un reset (PUBLIC)
/// Répond toujours 202 pour ne pas révéler l'existence d'un compte.
#[post("/forgot-password")]
pub async fn forgot_password(
    body: web::Json<ForgotPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let user = Users::find()
        .filter(UserColumn::Email.eq(body.email.as_str()))
        .one(db.get_ref())
        .await?;

    if let Some(user) = user {
        let now = Utc::now().fixed_offset();
        let reset_token = Uuid::new_v4().to_string();

        let row = password_reset_tokens::ActiveModel {
            user_id: Set(user.id),
            token: Set(reset_token.clone()),
            expires_at: Set(now + Duration::hours(1)),
            used: Set(false),
            created_at: Set(now),
            ..Default::default()
        };
        row.insert(db.get_ref()).await?;

        log::warn!("User {} has forgot password. Reset token: {}", user.id, reset_token);
    }

    Ok(HttpResponse::Accepted().finish())
}

/// POST /api/auth/reset-password - Consommer un token de reset (PUBLIC)
#[post("/reset-password")]
pub async fn reset_password(
    body: web::Json<ResetPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let bad_token = || ApiError::BadRequest("Invalid or expired reset token".to_string());

    let token_row = PasswordResetTokens::find()
        .filter(ResetTokenColumn::Token.eq(body.token.as_str()))
        .filter(ResetTokenColumn::Used.eq(false))
        .one(db.get_ref())
        .await?
        .ok_or_else(bad_token)?;

    if token_row.expires_at < Utc::now().fixed_offset() {
        return Err(bad_token());
    }

    let user = Users::find_by_id(token_row.user_id)
        .one(db.get_ref())
        .await?
        .ok_or_else(bad_token)?;

    let hashed_password = password::hash_password(&body.password)
        .map_err(ApiError::Internal)?;

    let mut user_row: users::ActiveModel = user.into();
    user_row.hashed_password = Set(hashed_password);
    user_row.updated_at = Set(Utc::now().fixed_offset());
    user_row.update(db.get_ref()).await?;

    let mut consumed: password_reset_tokens::ActiveModel = token_row.into();
    consumed.used = Set(true);
    consumed.update(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Password has been reset"
    })))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(logout)
            .service(request_verify_token)
            .service(verify)
            .service(forgot_password)
            .service(reset_password),
    );
}
