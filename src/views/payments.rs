use strum::IntoEnumIterator;

use super::{
    PageChrome, alert, attr, detail_rows, empty_state, esc, layout, no_matches, notice,
    page_header, pagination, search_toolbar, select_options, table,
};
use crate::format::{amount_preview, format_currency, format_date, format_optional_date, short_id};
use crate::forms::{PaymentForm, STATEMENT_DESCRIPTOR_MAX};
use crate::listing::{ListQuery, PageInfo, filter_page};
use crate::models::{Currency, Paginated, Payment, PaymentStatus, Provider, Refund};
use crate::status::status_badge;

const BASE: &str = "/dashboard/payments";

pub(crate) fn provider_options() -> Vec<(&'static str, &'static str)> {
    Provider::iter().map(|p| (p.into(), p.label())).collect()
}

pub(crate) fn currency_options() -> Vec<(&'static str, &'static str)> {
    Currency::iter()
        .map(|c| {
            let code: &'static str = c.into();
            (code, code)
        })
        .collect()
}

pub(crate) fn payment_row(payment: &Payment) -> String {
    format!(
        r#"<tr><td class="mono"><a href="{base}/{id}">{short}</a></td><td><strong>{amount}</strong></td><td>{status}</td><td>{provider}</td><td>{description}</td><td class="muted">{created}</td></tr>"#,
        base = BASE,
        id = attr(&urlencoding::encode(&payment.id)),
        short = esc(&short_id(&payment.id)),
        amount = format_currency(payment.amount, payment.currency),
        status = status_badge(payment.status.as_str()),
        provider = payment.provider.label(),
        description = esc(payment.description.as_deref().unwrap_or("-")),
        created = format_date(&payment.created_at),
    )
}

pub(crate) const PAYMENT_HEADERS: [&str; 6] =
    ["ID", "Amount", "Status", "Provider", "Description", "Created"];

/// What the payments list page shows.
pub struct PaymentListView<'a> {
    pub page: Result<&'a Paginated<Payment>, String>,
    pub query: &'a ListQuery,
}

pub fn payment_list(chrome: &PageChrome, view: &PaymentListView) -> String {
    let mut body = page_header(
        "Payments",
        "View and manage all payment transactions",
        Some(("/dashboard/payments/new", "Create Payment")),
    );

    if view.query.notice.as_deref() == Some("created") {
        body.push_str(&notice("Payment created"));
    }

    match view.page {
        Err(ref message) => body.push_str(&alert(message)),
        Ok(page) if page.data.is_empty() => {
            body.push_str(&empty_state(
                "No payments found",
                "Create your first payment to get started",
            ));
        }
        Ok(page) => {
            body.push_str(&search_toolbar(BASE, view.query, PaymentStatus::known()));
            let rows: Vec<String> =
                filter_page(&page.data, view.query.search(), view.query.status_filter())
                    .into_iter()
                    .map(payment_row)
                    .collect();
            if rows.is_empty() {
                body.push_str(&no_matches(view.query));
            } else {
                body.push_str(&table(&PAYMENT_HEADERS, &rows));
            }
            let info = PageInfo::new(page.total, page.limit, page.offset);
            body.push_str(&pagination(&info, "payments", BASE, view.query));
        }
    }

    layout(chrome, &body)
}

pub fn payment_detail(
    chrome: &PageChrome,
    payment: &Payment,
    refunds: Result<&[Refund], String>,
) -> String {
    let action = payment.is_refundable().then(|| {
        format!(
            "/dashboard/refunds/new?payment_id={}",
            urlencoding::encode(&payment.id)
        )
    });
    let mut body = page_header(
        &format!("Payment {}", short_id(&payment.id)),
        &payment.id,
        action.as_deref().map(|href| (href, "Issue refund")),
    );

    let mut rows = vec![
        ("Status", status_badge(payment.status.as_str())),
        ("Amount", format_currency(payment.amount, payment.currency)),
        ("Provider", payment.provider.label().to_string()),
        ("Provider payment ID", esc(&payment.provider_payment_id).into_owned()),
        ("Customer", esc(&payment.customer_id).into_owned()),
        ("Description", esc(payment.description.as_deref().unwrap_or("-")).into_owned()),
        (
            "Statement descriptor",
            esc(payment.statement_descriptor.as_deref().unwrap_or("-")).into_owned(),
        ),
        (
            "Payment method",
            esc(payment.payment_method_type.as_deref().unwrap_or("-")).into_owned(),
        ),
        ("Created", format_date(&payment.created_at)),
        ("Updated", format_date(&payment.updated_at)),
        ("Completed", format_optional_date(payment.completed_at.as_ref())),
    ];
    if let Some(sub) = &payment.subscription_id {
        rows.push((
            "Subscription",
            format!(
                r#"<a href="/dashboard/subscriptions/{}">{}</a>"#,
                attr(&urlencoding::encode(sub)),
                esc(sub)
            ),
        ));
    }
    if payment.failure_code.is_some() || payment.failure_message.is_some() {
        rows.push((
            "Failure",
            format!(
                "{} {}",
                esc(payment.failure_code.as_deref().unwrap_or("")),
                esc(payment.failure_message.as_deref().unwrap_or(""))
            ),
        ));
    }
    if let Some(metadata) = &payment.metadata {
        rows.push(("Metadata", format!("<pre>{}</pre>", esc(&metadata.to_string()))));
    }
    body.push_str(&format!(r#"<div class="card">{}</div>"#, detail_rows(&rows)));

    body.push_str("<h2>Refunds</h2>");
    match refunds {
        Err(message) => body.push_str(&alert(&message)),
        Ok([]) => body.push_str(r#"<p class="muted">No refunds for this payment</p>"#),
        Ok(refunds) => {
            let rows: Vec<String> = refunds.iter().map(super::refund_row).collect();
            body.push_str(&table(&super::REFUND_HEADERS, &rows));
        }
    }

    layout(chrome, &body)
}

pub fn payment_form(chrome: &PageChrome, form: &PaymentForm, error: Option<&str>) -> String {
    let mut body = page_header("Create Payment", "Create a new payment transaction", None);
    if let Some(error) = error {
        body.push_str(&alert(error));
    }

    let provider: &str = if form.provider.is_empty() {
        Provider::default().into()
    } else {
        form.provider.as_str()
    };
    let currency = form.currency();

    body.push_str(&format!(
        r#"<form class="card" method="post" action="{base}">
{csrf}
<div class="field"><label for="provider">Provider</label><select id="provider" name="provider">{providers}</select></div>
<div class="field"><label for="amount">Amount (in smallest currency unit, e.g., öre/cents)</label>
<input id="amount" name="amount" type="number" min="1" required placeholder="10000 = 100.00 SEK" value="{amount}">
<span class="hint">{preview}</span></div>
<div class="field"><label for="currency">Currency</label><select id="currency" name="currency">{currencies}</select></div>
<div class="field"><label for="description">Description (optional)</label>
<textarea id="description" name="description" rows="3" placeholder="Payment for...">{description}</textarea></div>
<div class="field"><label for="statement_descriptor">Statement Descriptor (optional)</label>
<input id="statement_descriptor" name="statement_descriptor" maxlength="{max}" placeholder="Appears on customer's statement" value="{descriptor}"></div>
<a href="{base}">Cancel</a> <button type="submit">Create Payment</button>
</form>"#,
        base = BASE,
        csrf = chrome.csrf_input(),
        providers = select_options(&provider_options(), provider),
        amount = attr(&form.amount),
        preview = esc(&amount_preview(form.amount(), currency)),
        currencies = select_options(&currency_options(), currency.as_ref()),
        description = esc(&form.description),
        max = STATEMENT_DESCRIPTOR_MAX,
        descriptor = attr(&form.statement_descriptor),
    ));

    layout(chrome, &body)
}
