// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - users : Utilisateurs (role admin/user, solde)
//   - access_tokens : Tokens bearer opaques (login/logout)
//   - email_verification_tokens : Tokens de vérification email (expire 24h)
//   - password_reset_tokens : Tokens de reset password (expire 1h)
//   - ban_log : Historique des bannissements
//   - car_brand / transmission / car_body / engine_type / drive_type /
//     rental_class : Tables de référence (id + nom unique)
//   - car : Catalogue des voitures (6 FK vers les tables de référence)
//   - car_image : Images des voitures (fichier sous MEDIA_ROOT)
//   - car_review : Avis utilisateurs sur les voitures
//   - booking : Réservations (date_start/date_end, création conditionnée
//     par le solde)
//   - dto : Data Transfer Objects pour les réponses API agrégées
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les relations entre tables sont définies dans chaque modèle
//   - Les politiques ON DELETE vivent dans src/migrator
//
// ============================================================================

pub mod users;
pub mod access_tokens;
pub mod email_verification_tokens;
pub mod password_reset_tokens;
pub mod ban_log;
pub mod car_brand;
pub mod transmission;
pub mod car_body;
pub mod engine_type;
pub mod drive_type;
pub mod rental_class;
pub mod car;
pub mod car_image;
pub mod car_review;
pub mod booking;
pub mod dto;
