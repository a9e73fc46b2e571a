use std::collections::BTreeMap;

use crate::models::{
    Currency, Paginated, Payment, PaymentStatus, Refund, Subscription, SubscriptionStatus,
};

/// How many rows of each list the dashboard samples.
pub const STATS_SAMPLE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    /// As reported by the service, not limited to the sample.
    pub total_payments: u64,
    pub succeeded_payments: usize,
    pub sampled_payments: usize,
    /// Succeeded volume in minor units, per currency.
    pub volume: BTreeMap<Currency, i64>,
    pub active_subscriptions: usize,
    pub total_refunds: u64,
}

impl DashboardStats {
    pub fn compute(
        payments: &Paginated<Payment>,
        subscriptions: &Paginated<Subscription>,
        refunds: &Paginated<Refund>,
    ) -> Self {
        let mut volume = BTreeMap::new();
        let mut succeeded_payments = 0;
        for payment in payments
            .data
            .iter()
            .filter(|p| p.status == PaymentStatus::Succeeded)
        {
            succeeded_payments += 1;
            *volume.entry(payment.currency).or_insert(0) += payment.amount;
        }

        let active_subscriptions = subscriptions
            .data
            .iter()
            .filter(|s| {
                matches!(
                    s.status,
                    SubscriptionStatus::Active | SubscriptionStatus::Trialing
                )
            })
            .count();

        Self {
            total_payments: payments.total,
            succeeded_payments,
            sampled_payments: payments.data.len(),
            volume,
            active_subscriptions,
            total_refunds: refunds.total,
        }
    }

    /// Percentage of sampled payments that succeeded, one decimal (`"0"` when none).
    pub fn success_rate(&self) -> String {
        if self.sampled_payments == 0 {
            return "0".to_string();
        }
        let rate = self.succeeded_payments as f64 / self.sampled_payments as f64 * 100.0;
        format!("{:.1}", rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payment(status: &str, amount: i64, currency: &str) -> serde_json::Value {
        json!({
            "id": "p", "customer_id": "c", "provider": "stripe", "provider_payment_id": "pi",
            "amount": amount, "currency": currency, "status": status,
            "created_at": "2025-01-01T00:00:00Z", "updated_at": "2025-01-01T00:00:00Z"
        })
    }

    fn subscription(status: &str) -> serde_json::Value {
        json!({
            "id": "s", "customer_id": "c", "provider": "stripe", "provider_subscription_id": "sub",
            "status": status, "amount": 100, "currency": "SEK", "interval": "month",
            "interval_count": 1, "current_period_start": "2025-01-01T00:00:00Z",
            "current_period_end": "2025-02-01T00:00:00Z", "cancel_at_period_end": false,
            "product_name": "Pro", "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        })
    }

    fn page<T: serde::de::DeserializeOwned>(
        items: Vec<serde_json::Value>,
        total: u64,
    ) -> Paginated<T> {
        serde_json::from_value(json!({ "data": items, "total": total, "limit": 100, "offset": 0 }))
            .unwrap()
    }

    #[test]
    fn test_compute_stats() {
        let payments: Paginated<Payment> = page(
            vec![
                payment("succeeded", 1000, "SEK"),
                payment("succeeded", 2500, "SEK"),
                payment("succeeded", 700, "EUR"),
                payment("failed", 9999, "SEK"),
            ],
            250,
        );
        let subscriptions: Paginated<Subscription> = page(
            vec![subscription("active"), subscription("trialing"), subscription("canceled")],
            3,
        );
        let refunds: Paginated<Refund> = page(vec![], 7);

        let stats = DashboardStats::compute(&payments, &subscriptions, &refunds);
        assert_eq!(stats.total_payments, 250);
        assert_eq!(stats.succeeded_payments, 3);
        assert_eq!(stats.volume.get(&Currency::Sek), Some(&3500));
        assert_eq!(stats.volume.get(&Currency::Eur), Some(&700));
        assert_eq!(stats.active_subscriptions, 2);
        assert_eq!(stats.total_refunds, 7);
        assert_eq!(stats.success_rate(), "75.0");
    }

    #[test]
    fn test_success_rate_without_payments() {
        let stats = DashboardStats::compute(
            &Paginated::empty(100),
            &Paginated::empty(100),
            &Paginated::empty(100),
        );
        assert_eq!(stats.success_rate(), "0");
        assert!(stats.volume.is_empty());
    }
}
