use strum::IntoEnumIterator;

use super::payments::{currency_options, provider_options};
use super::{
    PageChrome, alert, attr, detail_rows, empty_state, esc, layout, no_matches, notice,
    page_header, pagination, search_toolbar, select_options, table,
};
use crate::format::{
    amount_preview, format_currency, format_date, format_interval, format_optional_date, short_id,
};
use crate::forms::SubscriptionForm;
use crate::listing::{ListQuery, PageInfo, filter_page};
use crate::models::{Interval, Paginated, Provider, Subscription, SubscriptionStatus};
use crate::status::status_badge;

const BASE: &str = "/dashboard/subscriptions";

const SUBSCRIPTION_HEADERS: [&str; 7] = [
    "ID",
    "Product",
    "Amount",
    "Interval",
    "Status",
    "Current Period End",
    "Created",
];

fn subscription_row(sub: &Subscription) -> String {
    format!(
        r#"<tr><td class="mono"><a href="{base}/{id}">{short}</a></td><td>{product}</td><td><strong>{amount}</strong></td><td>{interval}</td><td>{status}</td><td class="muted">{period_end}</td><td class="muted">{created}</td></tr>"#,
        base = BASE,
        id = attr(&urlencoding::encode(&sub.id)),
        short = esc(&short_id(&sub.id)),
        product = esc(&sub.product_name),
        amount = format_currency(sub.amount, sub.currency),
        interval = esc(&format_interval(&sub.interval, sub.interval_count)),
        status = status_badge(sub.status.as_str()),
        period_end = format_date(&sub.current_period_end),
        created = format_date(&sub.created_at),
    )
}

pub struct SubscriptionListView<'a> {
    pub page: Result<&'a Paginated<Subscription>, String>,
    pub query: &'a ListQuery,
}

pub fn subscription_list(chrome: &PageChrome, view: &SubscriptionListView) -> String {
    let mut body = page_header(
        "Subscriptions",
        "Manage recurring billing agreements",
        Some(("/dashboard/subscriptions/new", "Create Subscription")),
    );

    if view.query.notice.as_deref() == Some("created") {
        body.push_str(&notice("Subscription created"));
    }

    match view.page {
        Err(ref message) => body.push_str(&alert(message)),
        Ok(page) if page.data.is_empty() => {
            body.push_str(&empty_state(
                "No subscriptions found",
                "Create your first subscription to get started",
            ));
        }
        Ok(page) => {
            body.push_str(&search_toolbar(BASE, view.query, SubscriptionStatus::known()));
            let rows: Vec<String> =
                filter_page(&page.data, view.query.search(), view.query.status_filter())
                    .into_iter()
                    .map(subscription_row)
                    .collect();
            if rows.is_empty() {
                body.push_str(&no_matches(view.query));
            } else {
                body.push_str(&table(&SUBSCRIPTION_HEADERS, &rows));
            }
            let info = PageInfo::new(page.total, page.limit, page.offset);
            body.push_str(&pagination(&info, "subscriptions", BASE, view.query));
        }
    }

    layout(chrome, &body)
}

/// Detail page. `error` is shown above the cancel form when a cancel attempt failed.
pub fn subscription_detail(
    chrome: &PageChrome,
    sub: &Subscription,
    notice_text: Option<&str>,
    error: Option<&str>,
) -> String {
    let mut body = page_header(&sub.product_name, &sub.id, None);
    if let Some(text) = notice_text {
        body.push_str(&notice(text));
    }

    let mut rows = vec![
        ("Status", status_badge(sub.status.as_str())),
        ("Amount", format_currency(sub.amount, sub.currency)),
        ("Billing", esc(&format_interval(&sub.interval, sub.interval_count)).into_owned()),
        ("Provider", sub.provider.label().to_string()),
        ("Provider subscription ID", esc(&sub.provider_subscription_id).into_owned()),
        ("Customer", esc(&sub.customer_id).into_owned()),
        (
            "Current period",
            format!(
                "{} – {}",
                format_date(&sub.current_period_start),
                format_date(&sub.current_period_end)
            ),
        ),
        ("Created", format_date(&sub.created_at)),
    ];
    if let Some(desc) = &sub.product_description {
        rows.push(("Description", esc(desc).into_owned()));
    }
    if sub.trial_start.is_some() || sub.trial_end.is_some() {
        rows.push((
            "Trial",
            format!(
                "{} – {}",
                format_optional_date(sub.trial_start.as_ref()),
                format_optional_date(sub.trial_end.as_ref())
            ),
        ));
    }
    if let Some(payment_id) = &sub.latest_payment_id {
        rows.push((
            "Latest payment",
            format!(
                r#"<a href="/dashboard/payments/{}">{}</a>"#,
                attr(&urlencoding::encode(payment_id)),
                esc(payment_id)
            ),
        ));
    }
    body.push_str(&format!(r#"<div class="card">{}</div>"#, detail_rows(&rows)));

    if sub.has_cancellation_info() {
        let mut info = Vec::new();
        if sub.cancel_at_period_end {
            info.push(("Status", "Scheduled to cancel at period end".to_string()));
        }
        if let Some(at) = &sub.cancel_at {
            info.push(("Cancel At", format_date(at)));
        }
        if let Some(at) = &sub.canceled_at {
            info.push(("Canceled At", format_date(at)));
        }
        body.push_str(&format!(
            r#"<h2>Cancellation Information</h2><div class="card">{}</div>"#,
            detail_rows(&info)
        ));
    }

    if let Some(error) = error {
        body.push_str(&alert(error));
    }

    let id = urlencoding::encode(&sub.id);
    if sub.cancel_at_period_end && sub.can_cancel() {
        body.push_str(&format!(
            r#"<form method="post" action="{base}/{id}/resume">{csrf}<button type="submit">Keep subscription</button></form>"#,
            base = BASE,
            id = attr(&id),
            csrf = chrome.csrf_input(),
        ));
    }
    if sub.can_cancel() {
        body.push_str(&format!(
            r#"<h2>Cancel Subscription</h2>
<form class="card" method="post" action="{base}/{id}/cancel">
{csrf}
<p>By default the subscription stays active until the end of the current billing period.</p>
<label><input type="checkbox" name="immediate" value="true"> Cancel immediately</label>
<p><button type="submit" class="danger">Cancel Subscription</button></p>
</form>"#,
            base = BASE,
            id = attr(&id),
            csrf = chrome.csrf_input(),
        ));
    }

    layout(chrome, &body)
}

pub fn subscription_form(
    chrome: &PageChrome,
    form: &SubscriptionForm,
    error: Option<&str>,
) -> String {
    let mut body = page_header(
        "Create Subscription",
        "Set up a recurring billing agreement",
        None,
    );
    if let Some(error) = error {
        body.push_str(&alert(error));
    }

    let provider: &str = if form.provider.is_empty() {
        Provider::default().into()
    } else {
        form.provider.as_str()
    };
    let currency = form.currency();
    let interval: &str = if form.interval.is_empty() {
        Interval::default().into()
    } else {
        form.interval.as_str()
    };
    let interval_options: Vec<(&str, &str)> =
        Interval::iter().map(|i| (i.into(), i.label())).collect();
    let interval_count = match form.interval_count.trim() {
        "" => "1",
        raw => raw,
    };

    body.push_str(&format!(
        r#"<form class="card" method="post" action="{base}">
{csrf}
<div class="field"><label for="product_name">Product Name *</label>
<input id="product_name" name="product_name" required value="{product_name}"></div>
<div class="field"><label for="product_description">Product Description (optional)</label>
<textarea id="product_description" name="product_description" rows="2">{product_description}</textarea></div>
<div class="field"><label for="provider">Provider</label><select id="provider" name="provider">{providers}</select></div>
<div class="field"><label for="amount">Amount (in smallest currency unit, e.g., öre/cents) *</label>
<input id="amount" name="amount" type="number" min="1" required value="{amount}">
<span class="hint">{preview}</span></div>
<div class="field"><label for="currency">Currency</label><select id="currency" name="currency">{currencies}</select></div>
<div class="field"><label for="interval">Interval *</label><select id="interval" name="interval">{intervals}</select></div>
<div class="field"><label for="interval_count">Interval Count *</label>
<input id="interval_count" name="interval_count" type="number" min="1" value="{interval_count}">
<span class="hint">{billing}</span></div>
<div class="field"><label for="trial_period_days">Trial Period (days)</label>
<input id="trial_period_days" name="trial_period_days" type="number" min="0" placeholder="0 = No trial" value="{trial}"></div>
<a href="{base}">Cancel</a> <button type="submit">Create Subscription</button>
</form>"#,
        base = BASE,
        csrf = chrome.csrf_input(),
        product_name = attr(&form.product_name),
        product_description = esc(&form.product_description),
        providers = select_options(&provider_options(), provider),
        amount = attr(&form.amount),
        preview = esc(&amount_preview(form.amount(), currency)),
        currencies = select_options(&currency_options(), currency.as_ref()),
        intervals = select_options(&interval_options, interval),
        interval_count = attr(interval_count),
        billing = esc(&format_interval(interval, form.interval_count().max(1) as u32)),
        trial = attr(&form.trial_period_days),
    ));

    layout(chrome, &body)
}
