//! Dashboard aggregation service
//!
//! Builds fixed-window daily activity series over the borrow ledger. Days
//! with no activity are filled with zero, so a series always has exactly one
//! entry per day of the window, which charting consumers rely on.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{
    api::dashboard::{AdminDashboard, AdminDashboardSummary, MemberDashboard, TeacherDashboard},
    error::AppResult,
    models::borrow::BorrowStatus,
    repository::Repository,
};

/// Window lengths in days, per audience
pub const MEMBER_WINDOW_DAYS: usize = 30;
pub const TEACHER_WINDOW_DAYS: usize = 15;
pub const ADMIN_WINDOW_DAYS: usize = 180;

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Personal activity over the last 30 days
    pub async fn member_dashboard(&self, email: &str) -> AppResult<MemberDashboard> {
        let window = window_days(Utc::now().date_naive(), MEMBER_WINDOW_DAYS);
        let since = window_start(&window);

        let borrowed = self.repository.borrows.borrowed_per_day(since, Some(email)).await?;
        let returned = self.repository.borrows.returned_per_day(since, Some(email)).await?;

        let borrowed_series = zero_filled(&window, &borrowed);
        let returned_series = zero_filled(&window, &returned);
        let total_borrowed = borrowed_series.iter().sum();
        let total_returned = returned_series.iter().sum();

        Ok(MemberDashboard {
            labels: labels(&window),
            borrowed_series,
            returned_series,
            total_borrowed,
            total_returned,
        })
    }

    /// Teacher activity over the last 15 days, with reading-time summary
    pub async fn teacher_dashboard(&self, email: &str) -> AppResult<TeacherDashboard> {
        let window = window_days(Utc::now().date_naive(), TEACHER_WINDOW_DAYS);
        let since = window_start(&window);

        let borrowed = self.repository.borrows.borrowed_per_day(since, Some(email)).await?;

        let total_ever_borrowed = self.repository.borrows.count_all(Some(email)).await?;
        let currently_borrowed = self.repository.borrows.count_active(Some(email)).await?;
        let total_returned = self
            .repository
            .borrows
            .count_by_status(BorrowStatus::Returned, Some(email))
            .await?;
        let pairs = self.repository.borrows.reading_pairs_for_user(email).await?;

        Ok(TeacherDashboard {
            labels: labels(&window),
            borrowed_series: zero_filled(&window, &borrowed),
            total_ever_borrowed,
            currently_borrowed,
            total_returned,
            average_reading_days: average_reading_days(&pairs),
        })
    }

    /// Library-wide activity over the last 180 days
    pub async fn admin_dashboard(&self) -> AppResult<AdminDashboard> {
        let window = window_days(Utc::now().date_naive(), ADMIN_WINDOW_DAYS);
        let since = window_start(&window);

        let borrowed = self.repository.borrows.borrowed_per_day(since, None).await?;
        let pending = self.repository.borrows.pending_per_day(since).await?;
        let returned = self.repository.borrows.returned_per_day(since, None).await?;

        let borrowed_series = zero_filled(&window, &borrowed);
        let pending_series = zero_filled(&window, &pending);
        let returned_series = zero_filled(&window, &returned);

        let borrows_last_30_days = borrowed_series.iter().rev().take(30).sum();

        let summary = AdminDashboardSummary {
            total_books: self.repository.books.count_all().await?,
            available_books: self.repository.books.count_available().await?,
            total_copies: self.repository.books.sum_available_copies().await?,
            books_on_loan: self
                .repository
                .borrows
                .count_by_status(BorrowStatus::Borrowed, None)
                .await?,
            active_borrows: self.repository.borrows.count_active(None).await?,
            pending_borrow_requests: self
                .repository
                .borrows
                .count_by_status(BorrowStatus::PendingBorrow, None)
                .await?,
            total_borrows_ever: self.repository.borrows.count_all(None).await?,
            borrows_last_30_days,
        };

        Ok(AdminDashboard {
            labels: labels(&window),
            borrowed_series,
            pending_series,
            returned_series,
            summary,
        })
    }
}

/// The full ordered list of calendar days ending at `end`, oldest first
fn window_days(end: NaiveDate, len: usize) -> Vec<NaiveDate> {
    (0..len)
        .rev()
        .map(|i| end - Duration::days(i as i64))
        .collect()
}

/// Start of the window as a UTC instant
fn window_start(window: &[NaiveDate]) -> DateTime<Utc> {
    window[0]
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_local_timezone(Utc)
        .unwrap()
}

/// `YYYY-MM-DD` labels for the window
fn labels(window: &[NaiveDate]) -> Vec<String> {
    window.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect()
}

/// Align sparse day buckets onto the window, defaulting absent days to zero.
/// The output length always equals the window length.
fn zero_filled(window: &[NaiveDate], buckets: &[(String, i64)]) -> Vec<i64> {
    window
        .iter()
        .map(|day| {
            let key = day.format("%Y-%m-%d").to_string();
            buckets
                .iter()
                .find(|(bucket, _)| *bucket == key)
                .map(|(_, count)| *count)
                .unwrap_or(0)
        })
        .collect()
}

/// Mean reading time in whole days over (borrowed-at, returned-at) pairs,
/// rounded; zero when nothing has been returned yet
fn average_reading_days(pairs: &[(DateTime<Utc>, DateTime<Utc>)]) -> i64 {
    if pairs.is_empty() {
        return 0;
    }
    let total_days: f64 = pairs
        .iter()
        .map(|(borrowed, returned)| (*returned - *borrowed).num_seconds() as f64 / 86_400.0)
        .sum();
    (total_days / pairs.len() as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn window_is_contiguous_and_ends_today() {
        let window = window_days(day("2024-03-10"), 5);
        assert_eq!(window.len(), 5);
        assert_eq!(window.first(), Some(&day("2024-03-06")));
        assert_eq!(window.last(), Some(&day("2024-03-10")));
    }

    #[test]
    fn window_spans_month_boundaries() {
        let window = window_days(day("2024-03-02"), 4);
        assert_eq!(
            window,
            vec![
                day("2024-02-28"),
                day("2024-02-29"),
                day("2024-03-01"),
                day("2024-03-02"),
            ]
        );
    }

    #[test]
    fn series_length_matches_window_even_when_sparse() {
        let window = window_days(day("2024-03-10"), 30);
        let buckets = vec![("2024-03-01".to_string(), 4)];
        let series = zero_filled(&window, &buckets);
        assert_eq!(series.len(), 30);
        assert_eq!(series.iter().sum::<i64>(), 4);
    }

    #[test]
    fn empty_history_fills_all_zeros() {
        let window = window_days(day("2024-03-10"), 30);
        let series = zero_filled(&window, &[]);
        assert_eq!(series.len(), 30);
        assert!(series.iter().all(|&count| count == 0));
    }

    #[test]
    fn buckets_land_on_their_day() {
        let window = window_days(day("2024-03-03"), 3);
        let buckets = vec![
            ("2024-03-01".to_string(), 2),
            ("2024-03-03".to_string(), 7),
            // Outside the window, must be ignored
            ("2024-02-01".to_string(), 9),
        ];
        assert_eq!(zero_filled(&window, &buckets), vec![2, 0, 7]);
    }

    #[test]
    fn average_reading_days_empty_is_zero() {
        assert_eq!(average_reading_days(&[]), 0);
    }

    #[test]
    fn average_reading_days_rounds_mean() {
        let at = |d: u32, h: u32| Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap();
        // 4 days and 7 days -> mean 5.5 -> rounds to 6
        let pairs = vec![(at(1, 0), at(5, 0)), (at(1, 0), at(8, 0))];
        assert_eq!(average_reading_days(&pairs), 6);
    }
}
