use actix_web::{get, patch, post, web, HttpResponse};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::{AdminUser, AuthUser};
use crate::models::ban_log::{self, Column as BanLogColumn, Entity as BanLogs};
use crate::models::users::{self, Column as UserColumn, Entity as Users};

// DTO pour la mise à jour du profil
#[derive(Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_name: Option<String>,
}

// DTO pour un bannissement
#[derive(Deserialize, Validate)]
pub struct BanCreateRequest {
    #[validate(length(min = 1, max = 250))]
    pub reason: String,
    pub date_start: sea_orm::entity::prelude::DateTimeWithTimeZone,
    pub date_end: sea_orm::entity::prelude::DateTimeWithTimeZone,
}

/// GET /api/users/me - Profil de l'utilisateur courant (PROTÉGÉE)
#[get("/me")]
pub async fn get_me(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    // L'extracteur ne porte que l'essentiel, on recharge la ligne complète
    let user = Users::find_by_id(auth_user.user_id)
        .one(db.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(user))
}

/// PATCH /api/users/me - Mise à jour partielle du profil (PROTÉGÉE)
#[patch("/me")]
pub async fn update_me(
    auth_user: AuthUser,
    body: web::Json<UpdateMeRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let user = Users::find_by_id(auth_user.user_id)
        .one(db.get_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let body = body.into_inner();

    // Changement d'email: vérifier qu'il n'est pas déjà pris par un autre compte
    if let Some(email) = &body.email {
        if *email != user.email {
            let taken = Users::find()
                .filter(UserColumn::Email.eq(email.as_str()))
                .filter(UserColumn::Id.ne(user.id))
                .one(db.get_ref())
                .await?;
            if taken.is_some() {
                return Err(ApiError::Conflict(
                    "User with this email already exists".to_string(),
                ));
            }
        }
    }

    let mut row: users::ActiveModel = user.clone().into();
    let mut changed = false;

    if let Some(email) = body.email {
        row.email = Set(email);
        changed = true;
    }
    if let Some(phone) = body.phone {
        row.phone = Set(phone);
        changed = true;
    }
    if let Some(full_name) = body.full_name {
        row.full_name = Set(full_name);
        changed = true;
    }

    if !changed {
        return Ok(HttpResponse::Ok().json(user));
    }

    row.updated_at = Set(Utc::now().fixed_offset());
    let updated = row.update(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// POST /api/users/{user_id}/ban - Bannir un utilisateur (ADMIN)
/// Le ban est un enregistrement d'historique, rien ne l'applique.
#[post("/{user_id}/ban")]
pub async fn ban_user(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<BanCreateRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let user_id = path.into_inner();
    let user = Users::find_by_id(user_id).one(db.get_ref()).await?;
    if user.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let body = body.into_inner();
    let new_ban = ban_log::ActiveModel {
        user_id: Set(user_id),
        reason: Set(body.reason),
        date_start: Set(body.date_start),
        date_end: Set(body.date_end),
        ..Default::default()
    };
    let ban = new_ban.insert(db.get_ref()).await?;

    Ok(HttpResponse::Created().json(ban))
}

/// GET /api/users/{user_id}/bans - Historique des bans d'un utilisateur (ADMIN)
#[get("/{user_id}/bans")]
pub async fn list_user_bans(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let user = Users::find_by_id(user_id).one(db.get_ref()).await?;
    if user.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let bans = BanLogs::find()
        .filter(BanLogColumn::UserId.eq(user_id))
        .order_by_asc(BanLogColumn::Id)
        .all(db.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(bans))
}

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(get_me)
            .service(update_me)
            .service(ban_user)
            .service(list_user_bans),
    );
}
