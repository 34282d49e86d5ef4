//! Bot state entity - chat-scoped key-value pairs for cross-call memory.
//!
//! Used for the recently-suggested-items list and per-user reference photo
//! URLs (`ref_photo:<platform_user_id>`). Logical uniqueness on
//! `(chat_id, key)` is enforced by the upsert in [`crate::core::ledger`];
//! writes are last-write-wins and values carry no TTL, so writers bound
//! their own payloads.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bot state database model - stores chat-scoped key-value pairs
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bot_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Chat the value is scoped to
    pub chat_id: i64,
    /// State key (e.g. `"recent_items"`)
    pub key: String,
    /// State value stored as string
    pub value: String,
    /// When this value was last written
    pub updated_at: DateTimeUtc,
}

/// `BotState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
