//! Period-bounded statistics aggregation.
//!
//! All day/week/month boundaries are computed in one configured reference
//! time zone and queried in UTC. The clock (now / zone / week start) is an
//! explicit parameter everywhere so tests supply fixed instants instead of
//! racing the wall clock.

use crate::config::settings::Settings;
use crate::core::round_money;
use crate::entities::{Expense, ExpenseColumn};
use crate::errors::Result;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use std::collections::HashMap;

/// Aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// From the most recent week-start day through now
    Week,
    /// From day 1 of the current month through now
    Month,
    /// From the epoch through now
    All,
}

/// The reference clock all boundaries are derived from.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    /// The instant "now"
    pub now: DateTime<Utc>,
    /// Reference time zone for local-day boundaries
    pub tz: Tz,
    /// Weekday the week period starts on
    pub week_start: Weekday,
}

impl Clock {
    /// A clock at the current instant using the configured zone and week start.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            now: Utc::now(),
            tz: settings.timezone,
            week_start: settings.week_start,
        }
    }

    /// Start of the current local day, as a UTC instant.
    #[must_use]
    pub fn day_start(&self) -> DateTime<Utc> {
        local_midnight(self.now.with_timezone(&self.tz).date_naive(), self.tz)
    }
}

/// UTC instant of local midnight on `day`. A DST gap at midnight falls
/// forward to the earliest valid instant of that day.
fn local_midnight(day: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map_or_else(|| Utc.from_utc_datetime(&naive), |dt| dt.with_timezone(&Utc))
}

/// Computes the `[start, end]` UTC bounds for a period.
#[must_use]
pub fn period_bounds(period: Period, clock: &Clock) -> (DateTime<Utc>, DateTime<Utc>) {
    match period {
        Period::Week => {
            let local_today = clock.now.with_timezone(&clock.tz).date_naive();
            let days_back = i64::from(
                (local_today.weekday().num_days_from_monday() + 7
                    - clock.week_start.num_days_from_monday())
                    % 7,
            );
            let start_day = local_today - Duration::days(days_back);
            (local_midnight(start_day, clock.tz), clock.now)
        }
        Period::Month => {
            let local_today = clock.now.with_timezone(&clock.tz).date_naive();
            let first = local_today.with_day(1).unwrap_or(local_today);
            (local_midnight(first, clock.tz), clock.now)
        }
        Period::All => (DateTime::<Utc>::UNIX_EPOCH, clock.now),
    }
}

/// Total spent in a chat within a period. Zero rows sum to 0, not an error.
pub async fn sum_by_period(
    db: &DatabaseConnection,
    chat_id: i64,
    period: Period,
    clock: &Clock,
) -> Result<f64> {
    let (start, end) = period_bounds(period, clock);
    let total: Option<Option<f64>> = Expense::find()
        .select_only()
        .column_as(ExpenseColumn::Amount.sum(), "total")
        .filter(ExpenseColumn::ChatId.eq(chat_id))
        .filter(ExpenseColumn::CreatedAt.gte(start))
        .filter(ExpenseColumn::CreatedAt.lte(end))
        .into_tuple()
        .one(db)
        .await?;
    Ok(round_money(total.flatten().unwrap_or(0.0)))
}

/// Per-user totals for a chat within a period. Only users with at least one
/// expense in the period appear in the map.
pub async fn sum_by_user(
    db: &DatabaseConnection,
    chat_id: i64,
    period: Period,
    clock: &Clock,
) -> Result<HashMap<i64, f64>> {
    let (start, end) = period_bounds(period, clock);
    let rows: Vec<(i64, Option<f64>)> = Expense::find()
        .select_only()
        .column(ExpenseColumn::UserId)
        .column_as(ExpenseColumn::Amount.sum(), "total")
        .filter(ExpenseColumn::ChatId.eq(chat_id))
        .filter(ExpenseColumn::CreatedAt.gte(start))
        .filter(ExpenseColumn::CreatedAt.lte(end))
        .group_by(ExpenseColumn::UserId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(user_id, total)| (user_id, round_money(total.unwrap_or(0.0))))
        .collect())
}

/// Top categories by summed amount descending; ties break by category name
/// ascending so the ordering is stable.
pub async fn top_categories(
    db: &DatabaseConnection,
    chat_id: i64,
    period: Period,
    limit: u64,
    clock: &Clock,
) -> Result<Vec<(String, f64)>> {
    let (start, end) = period_bounds(period, clock);
    let rows: Vec<(String, Option<f64>)> = Expense::find()
        .select_only()
        .column(ExpenseColumn::Category)
        .column_as(ExpenseColumn::Amount.sum(), "total")
        .filter(ExpenseColumn::ChatId.eq(chat_id))
        .filter(ExpenseColumn::CreatedAt.gte(start))
        .filter(ExpenseColumn::CreatedAt.lte(end))
        .group_by(ExpenseColumn::Category)
        .order_by_desc(ExpenseColumn::Amount.sum())
        .order_by_asc(ExpenseColumn::Category)
        .limit(limit)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(category, total)| (category, round_money(total.unwrap_or(0.0))))
        .collect())
}

/// Total spent in a chat over all time.
pub async fn total_all_time(db: &DatabaseConnection, chat_id: i64) -> Result<f64> {
    let total: Option<Option<f64>> = Expense::find()
        .select_only()
        .column_as(ExpenseColumn::Amount.sum(), "total")
        .filter(ExpenseColumn::ChatId.eq(chat_id))
        .into_tuple()
        .one(db)
        .await?;
    Ok(round_money(total.flatten().unwrap_or(0.0)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{insert_expense_at, setup_test_db, test_clock};

    const CHAT: i64 = 100;

    #[test]
    fn test_week_bounds_default_monday() {
        // Thursday 2025-05-15 12:00 Moscow
        let clock = test_clock();
        let (start, end) = period_bounds(Period::Week, &clock);
        // Monday 2025-05-12 00:00 MSK == 2025-05-11 21:00 UTC
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 5, 11, 21, 0, 0).unwrap());
        assert_eq!(end, clock.now);
    }

    #[test]
    fn test_week_bounds_on_week_start_day_is_today() {
        // A Monday noon: the week started this morning
        let clock = Clock {
            now: Utc.with_ymd_and_hms(2025, 5, 12, 9, 0, 0).unwrap(),
            ..test_clock()
        };
        let (start, _) = period_bounds(Period::Week, &clock);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 5, 11, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_week_bounds_configured_sunday_start() {
        let clock = Clock {
            week_start: Weekday::Sun,
            ..test_clock()
        };
        let (start, _) = period_bounds(Period::Week, &clock);
        // Sunday 2025-05-11 00:00 MSK == 2025-05-10 21:00 UTC
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 5, 10, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_month_bounds() {
        let clock = test_clock();
        let (start, _) = period_bounds(Period::Month, &clock);
        // 2025-05-01 00:00 MSK == 2025-04-30 21:00 UTC
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 4, 30, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_all_bounds_start_at_epoch() {
        let clock = test_clock();
        let (start, _) = period_bounds(Period::All, &clock);
        assert_eq!(start, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[tokio::test]
    async fn test_sum_by_period_adds_in_window_rows() -> Result<()> {
        let db = setup_test_db().await?;
        let clock = test_clock();
        let in_window = clock.now - Duration::hours(1);

        insert_expense_at(&db, 1, CHAT, 100.0, "food", in_window).await?;
        insert_expense_at(&db, 1, CHAT, 200.0, "food", in_window).await?;
        insert_expense_at(&db, 2, CHAT, 300.0, "alcohol", in_window).await?;

        let total = sum_by_period(&db, CHAT, Period::Week, &clock).await?;
        assert_eq!(total, 600.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_sum_by_period_empty_is_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let total = sum_by_period(&db, CHAT, Period::Week, &test_clock()).await?;
        assert_eq!(total, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_sum_by_period_excludes_out_of_window_rows() -> Result<()> {
        let db = setup_test_db().await?;
        let clock = test_clock();

        insert_expense_at(&db, 1, CHAT, 100.0, "food", clock.now - Duration::hours(1)).await?;
        // before this week's Monday
        insert_expense_at(&db, 1, CHAT, 999.0, "food", clock.now - Duration::days(10)).await?;
        // other chat
        insert_expense_at(&db, 1, CHAT + 1, 50.0, "food", clock.now - Duration::hours(1)).await?;

        let total = sum_by_period(&db, CHAT, Period::Week, &clock).await?;
        assert_eq!(total, 100.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_sum_by_user_only_active_users() -> Result<()> {
        let db = setup_test_db().await?;
        let clock = test_clock();
        let in_window = clock.now - Duration::hours(2);

        insert_expense_at(&db, 1, CHAT, 100.0, "food", in_window).await?;
        insert_expense_at(&db, 1, CHAT, 150.0, "food", in_window).await?;
        insert_expense_at(&db, 2, CHAT, 300.0, "alcohol", in_window).await?;

        let per_user = sum_by_user(&db, CHAT, Period::Month, &clock).await?;
        assert_eq!(per_user.len(), 2);
        assert_eq!(per_user[&1], 250.0);
        assert_eq!(per_user[&2], 300.0);
        assert!(!per_user.contains_key(&3));
        Ok(())
    }

    #[tokio::test]
    async fn test_top_categories_order_and_limit() -> Result<()> {
        let db = setup_test_db().await?;
        let clock = test_clock();
        let in_window = clock.now - Duration::hours(2);

        insert_expense_at(&db, 1, CHAT, 500.0, "alcohol", in_window).await?;
        insert_expense_at(&db, 1, CHAT, 200.0, "food", in_window).await?;
        insert_expense_at(&db, 2, CHAT, 100.0, "food", in_window).await?;
        insert_expense_at(&db, 2, CHAT, 100.0, "transport", in_window).await?;

        let top = top_categories(&db, CHAT, Period::Month, 2, &clock).await?;
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], ("alcohol".to_string(), 500.0));
        assert_eq!(top[1], ("food".to_string(), 300.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_top_categories_ties_break_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        let clock = test_clock();
        let in_window = clock.now - Duration::hours(2);

        insert_expense_at(&db, 1, CHAT, 100.0, "food", in_window).await?;
        insert_expense_at(&db, 1, CHAT, 100.0, "alcohol", in_window).await?;

        let top = top_categories(&db, CHAT, Period::Month, 5, &clock).await?;
        assert_eq!(top[0].0, "alcohol");
        assert_eq!(top[1].0, "food");
        Ok(())
    }

    #[tokio::test]
    async fn test_total_all_time_ignores_periods() -> Result<()> {
        let db = setup_test_db().await?;
        let clock = test_clock();

        insert_expense_at(&db, 1, CHAT, 100.0, "food", clock.now - Duration::days(400)).await?;
        insert_expense_at(&db, 1, CHAT, 50.0, "food", clock.now - Duration::hours(1)).await?;

        let total = total_all_time(&db, CHAT).await?;
        assert_eq!(total, 150.0);
        Ok(())
    }
}
