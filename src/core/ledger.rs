//! Transactional ledger operations.
//!
//! Every logical operation here opens one database transaction, commits
//! exactly once on success, and rolls back (by drop) on any failure, which
//! then propagates to the caller. Concurrent writers are serialized by the
//! store's own isolation; there is no application-level locking. Two
//! simultaneous undos from the same user cannot double-delete because
//! deletion is by the row id selected inside the same transaction - the
//! loser simply finds nothing and reports a no-op.

use crate::core::round_money;
use crate::core::stats::Clock;
use crate::entities::{
    BotState, BotStateColumn, Expense, ExpenseColumn, User, UserColumn, WishlistItem,
    WishlistItemColumn, bot_state, expense, user, wishlist_item,
};
use crate::errors::{Error, Result};
use rand::seq::SliceRandom;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

/// Creates the user on first sight, refreshes the display name otherwise.
pub async fn ensure_user(
    db: &DatabaseConnection,
    platform_user_id: i64,
    username: Option<&str>,
) -> Result<user::Model> {
    let txn = db.begin().await?;
    let existing = User::find()
        .filter(UserColumn::PlatformUserId.eq(platform_user_id))
        .one(&txn)
        .await?;

    let model = match existing {
        Some(model) => {
            let needs_refresh =
                username.is_some() && model.username.as_deref() != username;
            if needs_refresh {
                let mut active = model.into_active_model();
                active.username = Set(username.map(ToString::to_string));
                active.update(&txn).await?
            } else {
                model
            }
        }
        None => {
            info!("First message from user {platform_user_id}, creating row");
            user::ActiveModel {
                platform_user_id: Set(platform_user_id),
                username: Set(username.map(ToString::to_string)),
                first_seen_at: Set(chrono::Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        }
    };
    txn.commit().await?;
    Ok(model)
}

/// Looks a user up by platform id.
pub async fn get_user(
    db: &DatabaseConnection,
    platform_user_id: i64,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(UserColumn::PlatformUserId.eq(platform_user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Records an expense.
///
/// Rejects non-finite and non-positive amounts; the stored amount is rounded
/// to 2 places. The category must already be resolved and non-empty.
pub async fn add_expense(
    db: &DatabaseConnection,
    user_id: i64,
    chat_id: i64,
    amount: f64,
    currency: &str,
    category: &str,
    note: Option<&str>,
) -> Result<expense::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    if category.trim().is_empty() {
        return Err(Error::Config {
            message: "Expense category cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;
    let inserted = expense::ActiveModel {
        user_id: Set(user_id),
        chat_id: Set(chat_id),
        amount: Set(round_money(amount)),
        currency: Set(currency.to_string()),
        category: Set(category.to_string()),
        note: Set(note.map(ToString::to_string)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(
        "Recorded expense id {} for user {} in chat {}: {:.2} {} '{}'",
        inserted.id, user_id, chat_id, inserted.amount, inserted.currency, inserted.category
    );
    Ok(inserted)
}

/// Deletes the caller's most recent expense created since local-day start.
///
/// Returns the deleted row, or `None` when there is nothing to undo today.
pub async fn undo_last_today(
    db: &DatabaseConnection,
    user_id: i64,
    clock: &Clock,
) -> Result<Option<expense::Model>> {
    let day_start = clock.day_start();
    let txn = db.begin().await?;
    let last = Expense::find()
        .filter(ExpenseColumn::UserId.eq(user_id))
        .filter(ExpenseColumn::CreatedAt.gte(day_start))
        .order_by_desc(ExpenseColumn::Id)
        .one(&txn)
        .await?;

    let Some(last) = last else {
        debug!("Nothing to undo today for user {user_id}");
        return Ok(None);
    };

    Expense::delete_by_id(last.id).exec(&txn).await?;
    txn.commit().await?;

    info!("Undid expense id {} for user {}", last.id, user_id);
    Ok(Some(last))
}

/// Deletes every expense recorded for a chat. Admin-gated at the command
/// layer. Returns the number of rows removed.
pub async fn purge_chat(db: &DatabaseConnection, chat_id: i64) -> Result<u64> {
    let txn = db.begin().await?;
    let result = Expense::delete_many()
        .filter(ExpenseColumn::ChatId.eq(chat_id))
        .exec(&txn)
        .await?;
    txn.commit().await?;

    info!("Purged {} expenses from chat {}", result.rows_affected, chat_id);
    Ok(result.rows_affected)
}

/// Reads a chat-scoped state value.
pub async fn get_state(
    db: &DatabaseConnection,
    chat_id: i64,
    key: &str,
) -> Result<Option<String>> {
    Ok(BotState::find()
        .filter(BotStateColumn::ChatId.eq(chat_id))
        .filter(BotStateColumn::Key.eq(key))
        .one(db)
        .await?
        .map(|m| m.value))
}

/// Writes a chat-scoped state value, last-write-wins per (chat, key).
pub async fn set_state(
    db: &DatabaseConnection,
    chat_id: i64,
    key: &str,
    value: &str,
) -> Result<()> {
    let txn = db.begin().await?;
    let existing = BotState::find()
        .filter(BotStateColumn::ChatId.eq(chat_id))
        .filter(BotStateColumn::Key.eq(key))
        .one(&txn)
        .await?;

    match existing {
        Some(model) => {
            let mut active = model.into_active_model();
            active.value = Set(value.to_string());
            active.updated_at = Set(chrono::Utc::now());
            active.update(&txn).await?;
        }
        None => {
            bot_state::ActiveModel {
                chat_id: Set(chat_id),
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(chrono::Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }
    txn.commit().await?;
    Ok(())
}

/// Appends an item to the user's wishlist.
pub async fn add_wishlist_item(
    db: &DatabaseConnection,
    user_id: i64,
    item: &str,
) -> Result<wishlist_item::Model> {
    let item = item.trim();
    if item.is_empty() {
        return Err(Error::Config {
            message: "Wishlist item cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;
    let inserted = wishlist_item::ActiveModel {
        user_id: Set(user_id),
        item: Set(item.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    Ok(inserted)
}

/// Lists the user's wishlist items, oldest first.
pub async fn list_wishlist(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<wishlist_item::Model>> {
    WishlistItem::find()
        .filter(WishlistItemColumn::UserId.eq(user_id))
        .order_by_asc(WishlistItemColumn::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Removes one of the user's wishlist items by id. Returns whether a row was
/// actually removed; someone else's id is a no-op `false`, never an error.
pub async fn remove_wishlist_item(
    db: &DatabaseConnection,
    user_id: i64,
    item_id: i64,
) -> Result<bool> {
    let txn = db.begin().await?;
    let result = WishlistItem::delete_many()
        .filter(WishlistItemColumn::Id.eq(item_id))
        .filter(WishlistItemColumn::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    txn.commit().await?;
    Ok(result.rows_affected > 0)
}

/// Picks a uniformly random item from the user's wishlist.
pub async fn random_wishlist_item(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Option<wishlist_item::Model>> {
    let items = list_wishlist(db, user_id).await?;
    Ok(items.choose(&mut rand::thread_rng()).cloned())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{insert_expense_at, setup_test_db, test_clock};
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};

    const CHAT: i64 = 100;

    #[tokio::test]
    async fn test_ensure_user_creates_once() -> Result<()> {
        let db = setup_test_db().await?;

        let first = ensure_user(&db, 7, Some("vova")).await?;
        let second = ensure_user(&db, 7, Some("vova")).await?;
        assert_eq!(first.id, second.id);
        assert_eq!(second.username.as_deref(), Some("vova"));

        let all = User::find().all(&db).await?;
        assert_eq!(all.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_user_refreshes_username() -> Result<()> {
        let db = setup_test_db().await?;

        ensure_user(&db, 7, Some("vova")).await?;
        let updated = ensure_user(&db, 7, Some("vladimir")).await?;
        assert_eq!(updated.username.as_deref(), Some("vladimir"));

        // missing username does not erase the stored one
        let kept = ensure_user(&db, 7, None).await?;
        assert_eq!(kept.username.as_deref(), Some("vladimir"));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_expense_rounds_and_stores() -> Result<()> {
        let db = setup_test_db().await?;

        let expense =
            add_expense(&db, 7, CHAT, 99.999, "₽", "food", Some("суши")).await?;
        assert_eq!(expense.amount, 100.0);
        assert_eq!(expense.currency, "₽");
        assert_eq!(expense.category, "food");
        assert_eq!(expense.note.as_deref(), Some("суши"));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_expense_rejects_bad_amounts() -> Result<()> {
        // validation fires before any query, so a mock connection suffices
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = add_expense(&db, 7, CHAT, bad, "₽", "food", None).await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })), "amount: {bad}");
        }

        let result = add_expense(&db, 7, CHAT, 10.0, "₽", "  ", None).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_undo_last_today() -> Result<()> {
        let db = setup_test_db().await?;
        let clock = test_clock();

        insert_expense_at(&db, 7, CHAT, 100.0, "food", clock.now - Duration::hours(2)).await?;
        insert_expense_at(&db, 7, CHAT, 200.0, "alcohol", clock.now - Duration::hours(1)).await?;

        let undone = undo_last_today(&db, 7, &clock).await?.unwrap();
        assert_eq!(undone.amount, 200.0);

        let undone = undo_last_today(&db, 7, &clock).await?.unwrap();
        assert_eq!(undone.amount, 100.0);

        // nothing left today
        assert!(undo_last_today(&db, 7, &clock).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_undo_ignores_yesterday_and_other_users() -> Result<()> {
        let db = setup_test_db().await?;
        let clock = test_clock();

        // yesterday in the reference zone
        insert_expense_at(&db, 7, CHAT, 500.0, "food", clock.day_start() - Duration::minutes(5))
            .await?;
        // someone else's expense today
        insert_expense_at(&db, 8, CHAT, 300.0, "food", clock.now - Duration::hours(1)).await?;

        assert!(undo_last_today(&db, 7, &clock).await?.is_none());

        let remaining = Expense::find().all(&db).await?;
        assert_eq!(remaining.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_purge_chat_scoped() -> Result<()> {
        let db = setup_test_db().await?;
        let clock = test_clock();

        insert_expense_at(&db, 7, CHAT, 100.0, "food", clock.now).await?;
        insert_expense_at(&db, 8, CHAT, 200.0, "food", clock.now).await?;
        insert_expense_at(&db, 7, CHAT + 1, 300.0, "food", clock.now).await?;

        let removed = purge_chat(&db, CHAT).await?;
        assert_eq!(removed, 2);

        let remaining = Expense::find().all(&db).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].chat_id, CHAT + 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_state_upsert_last_write_wins() -> Result<()> {
        let db = setup_test_db().await?;

        assert_eq!(get_state(&db, CHAT, "recent_items").await?, None);

        set_state(&db, CHAT, "recent_items", "[\"a\"]").await?;
        set_state(&db, CHAT, "recent_items", "[\"b\"]").await?;
        assert_eq!(
            get_state(&db, CHAT, "recent_items").await?.as_deref(),
            Some("[\"b\"]")
        );

        // one row per (chat, key)
        let rows = BotState::find().all(&db).await?;
        assert_eq!(rows.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_state_is_chat_scoped() -> Result<()> {
        let db = setup_test_db().await?;

        set_state(&db, CHAT, "k", "one").await?;
        set_state(&db, CHAT + 1, "k", "two").await?;

        assert_eq!(get_state(&db, CHAT, "k").await?.as_deref(), Some("one"));
        assert_eq!(get_state(&db, CHAT + 1, "k").await?.as_deref(), Some("two"));
        Ok(())
    }

    #[tokio::test]
    async fn test_wishlist_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;

        let first = add_wishlist_item(&db, 7, "шлем").await?;
        add_wishlist_item(&db, 7, "перчатки").await?;
        add_wishlist_item(&db, 8, "чужое").await?;

        let items = list_wishlist(&db, 7).await?;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item, "шлем");

        // removal is owner-scoped
        assert!(!remove_wishlist_item(&db, 8, first.id).await?);
        assert!(remove_wishlist_item(&db, 7, first.id).await?);
        assert!(!remove_wishlist_item(&db, 7, first.id).await?);

        let items = list_wishlist(&db, 7).await?;
        assert_eq!(items.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_wishlist_rejects_empty_item() -> Result<()> {
        let db = setup_test_db().await?;
        let result = add_wishlist_item(&db, 7, "   ").await;
        assert!(matches!(result, Err(Error::Config { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_random_wishlist_item() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(random_wishlist_item(&db, 7).await?.is_none());

        add_wishlist_item(&db, 7, "шлем").await?;
        let picked = random_wishlist_item(&db, 7).await?.unwrap();
        assert_eq!(picked.item, "шлем");
        Ok(())
    }
}
