//! Summary figures shown above tables and on the dashboard.

use crate::models::{
    Comment, CommentStatus, DashboardStats, Payment, PaymentStatus, Reservation, ReservationStatus, StatusLabel,
};
use crate::store::Store;

/// Dashboard counters computed from the live store.
pub fn dashboard(store: &Store) -> DashboardStats {
    DashboardStats {
        total_users: store.users.len() as u64,
        total_tourists: store.tourists.len() as u64,
        total_reservations: store.reservations.len() as u64,
        total_revenue: store
            .payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
            .map(|p| p.amount)
            .sum(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaymentStats {
    pub collected: f64,
    pub completed: usize,
    pub pending: usize,
    pub failed: usize,
    pub commission: f64,
}

pub fn payments(records: &[Payment]) -> PaymentStats {
    records.iter().fold(PaymentStats::default(), |mut stats, p| {
        match p.status {
            PaymentStatus::Completed => {
                stats.completed += 1;
                stats.collected += p.amount;
                stats.commission += p.commission;
            }
            PaymentStatus::Pending => stats.pending += 1,
            PaymentStatus::Failed => stats.failed += 1,
            PaymentStatus::Refunded => {}
        }
        stats
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CommentStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Mean rating rounded to one decimal, 0 when there are no comments.
    pub average_rating: f64,
}

pub fn comments(records: &[Comment]) -> CommentStats {
    let count = |status| records.iter().filter(|c| c.status == status).count();
    let average_rating = if records.is_empty() {
        0.0
    } else {
        let sum: u32 = records.iter().map(|c| u32::from(c.rating)).sum();
        (f64::from(sum) / records.len() as f64 * 10.0).round() / 10.0
    };
    CommentStats {
        total: records.len(),
        pending: count(CommentStatus::Pending),
        approved: count(CommentStatus::Approved),
        rejected: count(CommentStatus::Rejected),
        average_rating,
    }
}

/// Reservation count for every status, in status order.
pub fn reservations(records: &[Reservation]) -> Vec<(ReservationStatus, usize)> {
    ReservationStatus::ALL
        .iter()
        .map(|status| (*status, records.iter().filter(|r| r.status == *status).count()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_dashboard_from_seed() {
        let stats = dashboard(&Store::seeded());
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.total_tourists, 5);
        assert_eq!(stats.total_reservations, 5);
        assert_eq!(stats.total_revenue, 10000.0);
    }

    #[test]
    fn test_payment_stats() {
        let stats = payments(&seed::payments());
        assert_eq!(stats.collected, 10000.0);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.commission, 300.0);
    }

    #[test]
    fn test_comment_stats() {
        let stats = comments(&seed::comments());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.approved, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.average_rating, 3.8);

        assert_eq!(comments(&[]).average_rating, 0.0);
    }

    #[test]
    fn test_reservation_counts() {
        let counts = reservations(&seed::reservations());
        assert_eq!(
            counts,
            vec![
                (ReservationStatus::Pending, 1),
                (ReservationStatus::Confirmed, 2),
                (ReservationStatus::Cancelled, 1),
                (ReservationStatus::Completed, 1),
            ]
        );
    }
}
