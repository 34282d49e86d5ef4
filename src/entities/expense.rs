//! Expense entity - one recorded spending event.
//!
//! Rows are immutable once created; the only deletions are the owner's
//! same-day undo and the admin chat-wide purge. `category` is resolved at
//! creation time and never re-resolved when the alias table changes later.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Platform user ID of the spender
    pub user_id: i64,
    /// Chat (group) this expense was posted in
    pub chat_id: i64,
    /// Monetary amount, positive, rounded to 2 places at creation
    pub amount: f64,
    /// Currency label (canonical `₽` unless another glyph was detected)
    pub currency: String,
    /// Category label resolved at creation time, never empty
    pub category: String,
    /// Free-text remainder of the message, if any
    pub note: Option<String>,
    /// When the expense was recorded
    pub created_at: DateTimeUtc,
}

/// Expenses are queried by `user_id`/`chat_id` lookups, never by relation
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
