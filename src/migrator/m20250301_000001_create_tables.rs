//! Migration to create the full getcar schema.
//!
//! Les politiques ON DELETE et les contraintes d'unicité vivent ici,
//! et uniquement ici.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(User::Email)
                            .string_len(320)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(User::HashedPassword)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(ColumnDef::new(User::Phone).string().not_null())
                    .col(ColumnDef::new(User::FullName).string().not_null())
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(User::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(User::Role)
                            .string_len(16)
                            .not_null()
                            .default("user"),
                    )
                    .col(
                        ColumnDef::new(User::Balance)
                            .decimal_len(12, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(User::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(User::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(User::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Access tokens (bearer, opaques)
        manager
            .create_table(
                Table::create()
                    .table(AccessToken::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccessToken::Token)
                            .string_len(43)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccessToken::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(AccessToken::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_access_token_user")
                            .from(AccessToken::Table, AccessToken::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Tokens de vérification email
        manager
            .create_table(
                Table::create()
                    .table(EmailVerificationToken::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmailVerificationToken::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmailVerificationToken::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailVerificationToken::Token)
                            .string_len(36)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(EmailVerificationToken::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailVerificationToken::Used)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(EmailVerificationToken::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_email_verification_token_user")
                            .from(EmailVerificationToken::Table, EmailVerificationToken::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Tokens de reset password
        manager
            .create_table(
                Table::create()
                    .table(PasswordResetToken::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PasswordResetToken::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetToken::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetToken::Token)
                            .string_len(36)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetToken::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PasswordResetToken::Used)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PasswordResetToken::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_password_reset_token_user")
                            .from(PasswordResetToken::Table, PasswordResetToken::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Ban log
        manager
            .create_table(
                Table::create()
                    .table(BanLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BanLog::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BanLog::UserId).integer().not_null())
                    .col(ColumnDef::new(BanLog::Reason).string_len(250).not_null())
                    .col(
                        ColumnDef::new(BanLog::DateStart)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BanLog::DateEnd)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ban_log_user")
                            .from(BanLog::Table, BanLog::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Tables de référence: id + nom unique (<= 32)
        for (table, name) in [
            (Reference::CarBrand, "car_brand"),
            (Reference::Transmission, "transmission"),
            (Reference::CarBody, "car_body"),
            (Reference::EngineType, "engine_type"),
            (Reference::DriveType, "drive_type"),
            (Reference::RentalClass, "rental_class"),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Reference::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Reference::Name)
                                .string_len(32)
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            let index_name = format!("idx_{}_name", name);
            manager
                .create_index(
                    Index::create()
                        .name(index_name.as_str())
                        .table(table)
                        .col(Reference::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        // Cars
        manager
            .create_table(
                Table::create()
                    .table(Car::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Car::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Car::CarBrandId).integer().not_null())
                    .col(ColumnDef::new(Car::Model).string_len(128).not_null())
                    .col(ColumnDef::new(Car::TransmissionId).integer().not_null())
                    .col(ColumnDef::new(Car::BodyId).integer().not_null())
                    .col(ColumnDef::new(Car::Year).integer().not_null())
                    .col(ColumnDef::new(Car::EngineTypeId).integer().not_null())
                    .col(ColumnDef::new(Car::DriveId).integer().not_null())
                    .col(ColumnDef::new(Car::Mileage).integer().not_null())
                    .col(ColumnDef::new(Car::Price).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Car::RentalClassId).integer().not_null())
                    .col(ColumnDef::new(Car::Seats).integer().null())
                    .col(ColumnDef::new(Car::TrunkVolume).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_car_brand")
                            .from(Car::Table, Car::CarBrandId)
                            .to(Reference::CarBrand, Reference::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_transmission")
                            .from(Car::Table, Car::TransmissionId)
                            .to(Reference::Transmission, Reference::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_body")
                            .from(Car::Table, Car::BodyId)
                            .to(Reference::CarBody, Reference::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_engine_type")
                            .from(Car::Table, Car::EngineTypeId)
                            .to(Reference::EngineType, Reference::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_drive_type")
                            .from(Car::Table, Car::DriveId)
                            .to(Reference::DriveType, Reference::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_rental_class")
                            .from(Car::Table, Car::RentalClassId)
                            .to(Reference::RentalClass, Reference::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Images de voitures
        manager
            .create_table(
                Table::create()
                    .table(CarImage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CarImage::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CarImage::ImageUrl).string().not_null())
                    .col(ColumnDef::new(CarImage::CarId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_image_car")
                            .from(CarImage::Table, CarImage::CarId)
                            .to(Car::Table, Car::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_car_image_car_id")
                    .table(CarImage::Table)
                    .col(CarImage::CarId)
                    .to_owned(),
            )
            .await?;

        // Avis
        manager
            .create_table(
                Table::create()
                    .table(CarReview::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CarReview::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CarReview::UserId).integer().null())
                    .col(ColumnDef::new(CarReview::CarId).integer().not_null())
                    .col(ColumnDef::new(CarReview::Text).text().not_null())
                    .col(ColumnDef::new(CarReview::ImageUrl).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_review_user")
                            .from(CarReview::Table, CarReview::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_car_review_car")
                            .from(CarReview::Table, CarReview::CarId)
                            .to(Car::Table, Car::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Réservations
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Booking::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Booking::UserId).integer().not_null())
                    .col(ColumnDef::new(Booking::CarId).integer().not_null())
                    .col(
                        ColumnDef::new(Booking::DateStart)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Booking::DateEnd)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_car")
                            .from(Booking::Table, Booking::CarId)
                            .to(Car::Table, Car::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_user_id")
                    .table(Booking::Table)
                    .col(Booking::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_car_id")
                    .table(Booking::Table)
                    .col(Booking::CarId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CarReview::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CarImage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Car::Table).to_owned())
            .await?;
        for table in [
            Reference::RentalClass,
            Reference::DriveType,
            Reference::EngineType,
            Reference::CarBody,
            Reference::Transmission,
            Reference::CarBrand,
        ] {
            manager.drop_table(Table::drop().table(table).to_owned()).await?;
        }
        manager
            .drop_table(Table::drop().table(BanLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PasswordResetToken::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmailVerificationToken::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccessToken::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Email,
    HashedPassword,
    Phone,
    FullName,
    CreatedAt,
    UpdatedAt,
    Role,
    Balance,
    IsActive,
    IsSuperuser,
    IsVerified,
}

#[derive(DeriveIden)]
enum AccessToken {
    Table,
    Token,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum EmailVerificationToken {
    Table,
    Id,
    UserId,
    Token,
    ExpiresAt,
    Used,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PasswordResetToken {
    Table,
    Id,
    UserId,
    Token,
    ExpiresAt,
    Used,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BanLog {
    Table,
    Id,
    UserId,
    Reason,
    DateStart,
    DateEnd,
}

/// Les six tables de référence partagent la même forme (id + name).
#[derive(DeriveIden, Clone, Copy)]
enum Reference {
    CarBrand,
    Transmission,
    CarBody,
    EngineType,
    DriveType,
    RentalClass,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Car {
    Table,
    Id,
    CarBrandId,
    Model,
    TransmissionId,
    BodyId,
    Year,
    EngineTypeId,
    DriveId,
    Mileage,
    Price,
    RentalClassId,
    Seats,
    TrunkVolume,
}

#[derive(DeriveIden)]
enum CarImage {
    Table,
    Id,
    ImageUrl,
    CarId,
}

#[derive(DeriveIden)]
enum CarReview {
    Table,
    Id,
    UserId,
    CarId,
    Text,
    ImageUrl,
}

#[derive(DeriveIden)]
enum Booking {
    Table,
    Id,
    UserId,
    CarId,
    DateStart,
    DateEnd,
}
