//! Engagement streak tracking
//!
//! Computes consecutive-day streaks and the current-week activity bitmap
//! from raw activity timestamps across all three record kinds. The streak is
//! derived state: it is recomputed from the full timestamp set on every
//! request rather than maintained incrementally, which makes the computation
//! idempotent and removes any cache-invalidation concerns.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::BTreeSet;

use crate::models::StreakState;

/// Compute streak state from activity timestamps relative to `today`.
///
/// - `current_streak_days` walks backward one calendar day at a time
///   starting at `today`; a day with no activity stops the walk, so a user
///   with no activity today has a current streak of 0.
/// - `longest_streak_days` is the maximum consecutive-day run over the full
///   history (single ascending scan).
/// - `weekly_bitmap` flags each day of the current Sunday-to-Saturday week
///   that has at least one activity. When the most recent activity falls in
///   a different ISO week-of-year than `today`, the bitmap is all-false.
pub fn compute_streaks(timestamps: &[DateTime<Utc>], today: NaiveDate) -> StreakState {
    let dates: BTreeSet<NaiveDate> = timestamps.iter().map(|ts| ts.date_naive()).collect();

    if dates.is_empty() {
        return StreakState::empty();
    }

    StreakState {
        current_streak_days: current_streak(&dates, today),
        longest_streak_days: longest_streak(&dates),
        weekly_bitmap: weekly_bitmap(&dates, today),
    }
}

fn current_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while dates.contains(&day) {
        streak += 1;
        day = day - Duration::days(1);
    }
    streak
}

fn longest_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for &date in dates {
        run = match previous {
            Some(prev) if date - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }

    longest
}

fn weekly_bitmap(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> [bool; 7] {
    let mut bitmap = [false; 7];

    // Stale check: any activity in a different ISO week than today resets
    // the bitmap entirely.
    let last_activity = match dates.iter().next_back() {
        Some(&date) => date,
        None => return bitmap,
    };
    if last_activity.iso_week() != today.iso_week() && last_activity < today {
        // The Sunday-indexed scan below also has to agree; a last activity
        // outside the current Sun-Sat span never marks anything anyway, but
        // an explicitly stale week short-circuits to all-false.
        if !same_sunday_week(last_activity, today) {
            return bitmap;
        }
    }

    let sunday = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
    for offset in 0..7 {
        let day = sunday + Duration::days(offset);
        bitmap[offset as usize] = dates.contains(&day);
    }

    bitmap
}

fn same_sunday_week(a: NaiveDate, b: NaiveDate) -> bool {
    let sunday_of = |d: NaiveDate| d - Duration::days(d.weekday().num_days_from_sunday() as i64);
    sunday_of(a) == sunday_of(b)
}
