//! Category entity - admin-managed categories overlaying the built-in table.
//!
//! `aliases` is a pipe-delimited list (`"пиво|вино|бар"`), deduplicated and
//! sorted on write, NULL when the category has no aliases beyond its name.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Category name, unique
    #[sea_orm(unique)]
    pub name: String,
    /// Pipe-delimited alias list, or NULL
    pub aliases: Option<String>,
}

/// Categories stand alone; expenses store the category label by value
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
