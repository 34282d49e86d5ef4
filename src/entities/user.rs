//! User entity - one row per chat-platform identity ever seen by the bot.
//!
//! Users are created on their first observed message and never deleted; the
//! only mutation is a display-name refresh when the platform name changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Chat-platform user ID (Discord user id)
    #[sea_orm(unique)]
    pub platform_user_id: i64,
    /// Display name as last seen on the platform
    pub username: Option<String>,
    /// When this user was first observed
    pub first_seen_at: DateTimeUtc,
}

/// Users are referenced by `platform_user_id` lookups, never by relation
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
