//! Database connection and table creation.
//!
//! `SQLite` via `SeaORM`. Tables are created at startup from the entity
//! definitions with `Schema::create_table_from_entity`, so the schema always
//! matches the Rust structs without hand-written SQL; there is no migration
//! logic beyond "create tables if absent".

use crate::entities::{BotState, Category, Expense, User, WishlistItem};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database at the given URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Idempotent: `if_not_exists` makes repeated startups a no-op against an
/// existing database.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut expense_table = schema.create_table_from_entity(Expense);
    let mut category_table = schema.create_table_from_entity(Category);
    let mut bot_state_table = schema.create_table_from_entity(BotState);
    let mut wishlist_table = schema.create_table_from_entity(WishlistItem);

    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(expense_table.if_not_exists())).await?;
    db.execute(builder.build(category_table.if_not_exists())).await?;
    db.execute(builder.build(bot_state_table.if_not_exists())).await?;
    db.execute(builder.build(wishlist_table.if_not_exists())).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        BotStateModel, CategoryModel, ExpenseModel, UserModel, WishlistItemModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<ExpenseModel> = Expense::find().limit(1).all(&db).await?;
        let _: Vec<CategoryModel> = Category::find().limit(1).all(&db).await?;
        let _: Vec<BotStateModel> = BotState::find().limit(1).all(&db).await?;
        let _: Vec<WishlistItemModel> = WishlistItem::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<ExpenseModel> = Expense::find().limit(1).all(&db).await?;
        Ok(())
    }
}
