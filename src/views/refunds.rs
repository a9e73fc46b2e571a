use strum::IntoEnumIterator;

use super::{
    PageChrome, alert, attr, detail_rows, empty_state, esc, layout, no_matches, notice,
    page_header, pagination, search_toolbar, select_options, table,
};
use crate::format::{amount_preview, format_currency, format_date, format_optional_date, short_id};
use crate::forms::RefundForm;
use crate::listing::{ListQuery, PageInfo, filter_page};
use crate::models::{Paginated, Payment, Refund, RefundReason, RefundStatus};
use crate::status::status_badge;

const BASE: &str = "/dashboard/refunds";

pub(crate) const REFUND_HEADERS: [&str; 6] =
    ["ID", "Payment", "Amount", "Status", "Reason", "Created"];

pub(crate) fn refund_row(refund: &Refund) -> String {
    format!(
        r#"<tr><td class="mono"><a href="{base}/{id}">{short}</a></td><td class="mono"><a href="/dashboard/payments/{payment_id}">{payment_short}</a></td><td><strong>{amount}</strong></td><td>{status}</td><td>{reason}</td><td class="muted">{created}</td></tr>"#,
        base = BASE,
        id = attr(&urlencoding::encode(&refund.id)),
        short = esc(&short_id(&refund.id)),
        payment_id = attr(&urlencoding::encode(&refund.payment_id)),
        payment_short = esc(&short_id(&refund.payment_id)),
        amount = format_currency(refund.amount, refund.currency),
        status = status_badge(refund.status.as_str()),
        reason = esc(&reason_label(refund.reason.as_deref())),
        created = format_date(&refund.created_at),
    )
}

fn reason_label(reason: Option<&str>) -> String {
    match reason {
        None | Some("") => "-".to_string(),
        Some(raw) => raw
            .parse::<RefundReason>()
            .map(|r| r.label().to_string())
            .unwrap_or_else(|_| raw.replace('_', " ")),
    }
}

pub struct RefundListView<'a> {
    pub page: Result<&'a Paginated<Refund>, String>,
    pub query: &'a ListQuery,
}

pub fn refund_list(chrome: &PageChrome, view: &RefundListView) -> String {
    let mut body = page_header(
        "Refunds",
        "Track refunds issued against payments",
        Some(("/dashboard/refunds/new", "Create Refund")),
    );

    if view.query.notice.as_deref() == Some("created") {
        body.push_str(&notice("Refund created"));
    }

    match view.page {
        Err(ref message) => body.push_str(&alert(message)),
        Ok(page) if page.data.is_empty() => {
            body.push_str(&empty_state(
                "No refunds found",
                "Refunds you issue will show up here",
            ));
        }
        Ok(page) => {
            body.push_str(&search_toolbar(BASE, view.query, RefundStatus::known()));
            let rows: Vec<String> =
                filter_page(&page.data, view.query.search(), view.query.status_filter())
                    .into_iter()
                    .map(refund_row)
                    .collect();
            if rows.is_empty() {
                body.push_str(&no_matches(view.query));
            } else {
                body.push_str(&table(&REFUND_HEADERS, &rows));
            }
            let info = PageInfo::new(page.total, page.limit, page.offset);
            body.push_str(&pagination(&info, "refunds", BASE, view.query));
        }
    }

    layout(chrome, &body)
}

pub fn refund_detail(chrome: &PageChrome, refund: &Refund) -> String {
    let title = format!("Refund {}", short_id(&refund.id));
    let mut body = page_header(&title, &refund.id, None);

    let mut rows = vec![
        ("Status", status_badge(refund.status.as_str())),
        ("Amount", format_currency(refund.amount, refund.currency)),
        (
            "Payment",
            format!(
                r#"<a href="/dashboard/payments/{}">{}</a>"#,
                attr(&urlencoding::encode(&refund.payment_id)),
                esc(&refund.payment_id)
            ),
        ),
        ("Provider", refund.provider.label().to_string()),
        ("Provider refund ID", esc(&refund.provider_refund_id).into_owned()),
        ("Reason", esc(&reason_label(refund.reason.as_deref())).into_owned()),
        ("Notes", esc(refund.notes.as_deref().unwrap_or("-")).into_owned()),
        ("Created", format_date(&refund.created_at)),
        ("Completed", format_optional_date(refund.completed_at.as_ref())),
    ];
    if refund.failure_code.is_some() || refund.failure_message.is_some() {
        rows.push((
            "Failure",
            format!(
                "{} {}",
                esc(refund.failure_code.as_deref().unwrap_or("")),
                esc(refund.failure_message.as_deref().unwrap_or(""))
            ),
        ));
    }
    body.push_str(&format!(r#"<div class="card">{}</div>"#, detail_rows(&rows)));

    layout(chrome, &body)
}

/// Refund form. `payment` is the payment the form currently points at, if it loaded.
pub fn refund_form(
    chrome: &PageChrome,
    form: &RefundForm,
    payment: Option<&Payment>,
    error: Option<&str>,
) -> String {
    let mut body = page_header(
        "Create Refund",
        "Refund part or all of a succeeded payment",
        None,
    );
    if let Some(error) = error {
        body.push_str(&alert(error));
    }

    let summary = payment
        .map(|p| {
            format!(
                r#"<div class="card"><span class="muted">Payment Amount:</span> <strong>{}</strong> {}</div>"#,
                format_currency(p.amount, p.currency),
                status_badge(p.status.as_str())
            )
        })
        .unwrap_or_default();

    let preview = match payment {
        Some(p) if form.amount() > 0 => format!(
            "{} (Full refund: {})",
            amount_preview(form.amount(), p.currency),
            amount_preview(p.amount, p.currency).trim_start_matches("= ")
        ),
        _ => String::new(),
    };
    let max = payment.map(|p| format!(r#" max="{}""#, p.amount)).unwrap_or_default();
    let placeholder = payment.map(|p| format!("Max: {}", p.amount)).unwrap_or_default();

    let mut reasons = vec![("", "Select a reason")];
    reasons.extend(RefundReason::iter().map(|r| (r.into(), r.label())));

    body.push_str(&format!(
        r#"<form class="card" method="post" action="{base}">
{csrf}
<div class="field"><label for="payment_id">Payment ID *</label>
<input id="payment_id" name="payment_id" required value="{payment_id}"></div>
{summary}
<div class="field"><label for="amount">Refund Amount (in smallest currency unit) *</label>
<input id="amount" name="amount" type="number" min="1"{max} required placeholder="{placeholder}" value="{amount}">
<span class="hint">{preview}</span></div>
<div class="field"><label for="reason">Reason</label><select id="reason" name="reason">{reasons}</select></div>
<div class="field"><label for="notes">Notes (optional)</label>
<textarea id="notes" name="notes" rows="3">{notes}</textarea></div>
<a href="{base}">Cancel</a> <button type="submit">Create Refund</button>
</form>"#,
        base = BASE,
        csrf = chrome.csrf_input(),
        payment_id = attr(form.payment_id()),
        summary = summary,
        max = max,
        placeholder = attr(&placeholder),
        amount = attr(&form.amount),
        preview = esc(&preview),
        reasons = select_options(&reasons, form.reason.trim()),
        notes = esc(&form.notes),
    ));

    layout(chrome, &body)
}
