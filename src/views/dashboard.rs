use super::payments::{PAYMENT_HEADERS, payment_row};
use super::{PageChrome, alert, empty_state, esc, layout, page_header, table};
use crate::format::format_currency;
use crate::models::Payment;
use crate::stats::DashboardStats;

const RECENT_PAYMENTS: usize = 5;

fn stat_card(title: &str, value: &str, caption: &str) -> String {
    format!(
        r#"<div class="card"><p class="muted">{}</p><div class="stat">{}</div><p class="muted">{}</p></div>"#,
        esc(title),
        esc(value),
        esc(caption)
    )
}

pub fn dashboard_page(
    chrome: &PageChrome,
    stats: Result<(&DashboardStats, &[Payment]), String>,
) -> String {
    let mut body = page_header("Dashboard", "Overview of payment activity", None);

    let (stats, payments) = match stats {
        Ok(loaded) => loaded,
        Err(message) => {
            body.push_str(&alert(&message));
            return layout(chrome, &body);
        }
    };

    let volume = if stats.volume.is_empty() {
        format_currency(0, Default::default())
    } else {
        stats
            .volume
            .iter()
            .map(|(currency, amount)| format_currency(*amount, *currency))
            .collect::<Vec<_>>()
            .join(" + ")
    };

    body.push_str(&format!(
        r#"<div class="grid">{}{}{}{}</div>"#,
        stat_card(
            "Total Payments",
            &stats.total_payments.to_string(),
            &format!("{} succeeded", stats.succeeded_payments)
        ),
        stat_card("Payment Volume", &volume, "From succeeded payments"),
        stat_card(
            "Active Subscriptions",
            &stats.active_subscriptions.to_string(),
            "Recurring revenue streams"
        ),
        stat_card(
            "Success Rate",
            &format!("{}%", stats.success_rate()),
            &format!("{} refunds issued", stats.total_refunds)
        ),
    ));

    body.push_str("<h2>Recent Payments</h2>");
    if payments.is_empty() {
        body.push_str(&empty_state(
            "No payments found",
            "Create your first payment to get started",
        ));
    } else {
        let rows: Vec<String> = payments.iter().take(RECENT_PAYMENTS).map(payment_row).collect();
        body.push_str(&table(&PAYMENT_HEADERS, &rows));
    }

    layout(chrome, &body)
}
