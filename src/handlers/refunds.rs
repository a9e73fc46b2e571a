use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::{rerender, soft_fail};
use crate::error::{AppError, Result};
use crate::extractors::{Form, Path, Query};
use crate::format::short_id;
use crate::forms::{NOT_REFUNDABLE, RefundForm};
use crate::listing::ListQuery;
use crate::middleware::SessionContext;
use crate::models::Payment;
use crate::state::AppState;
use crate::views::{self, Nav, RefundListView};

pub async fn list_refunds(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>> {
    let loaded = soft_fail(
        state
            .payments
            .list_refunds(ctx.token(), state.page_size, query.offset())
            .await,
    )?;

    let view = RefundListView {
        page: loaded.as_ref().map_err(Clone::clone),
        query: &query,
    };
    Ok(Html(views::refund_list(&ctx.chrome("Refunds", Nav::Refunds), &view)))
}

/// Load the payment a refund form points at. Lookup failures other than a
/// rejected token leave the form without a payment.
async fn load_payment(
    state: &AppState,
    token: &str,
    payment_id: &str,
) -> Result<Option<Payment>> {
    if payment_id.is_empty() {
        return Ok(None);
    }
    match state.payments.get_payment(token, payment_id).await {
        Ok(payment) => Ok(Some(payment)),
        Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
        Err(e) => {
            tracing::debug!(
                payment_id = %payment_id,
                error = %e,
                "Refund form payment lookup failed"
            );
            Ok(None)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewRefundQuery {
    #[serde(default)]
    pub payment_id: Option<String>,
}

/// Blank refund form, or one prefilled with the full amount of `?payment_id=`.
pub async fn new_refund(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<NewRefundQuery>,
) -> Result<Html<String>> {
    let payment_id = query.payment_id.as_deref().map(str::trim).unwrap_or("");
    let payment = load_payment(&state, ctx.token(), payment_id).await?;

    let form = RefundForm {
        payment_id: payment_id.to_string(),
        amount: payment.as_ref().map(|p| p.amount.to_string()).unwrap_or_default(),
        ..Default::default()
    };
    let warning = payment
        .as_ref()
        .filter(|p| !p.is_refundable())
        .map(|_| NOT_REFUNDABLE);
    let chrome = ctx.chrome("Create Refund", Nav::Refunds);
    Ok(Html(views::refund_form(&chrome, &form, payment.as_ref(), warning)))
}

pub async fn create_refund(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<RefundForm>,
) -> Result<Response> {
    ctx.check_csrf(&form.csrf_token)?;
    let token = ctx.token();
    let payment = load_payment(&state, token, form.payment_id()).await?;
    let chrome = ctx.chrome("Create Refund", Nav::Refunds);

    let request = match form.validate(payment.as_ref()) {
        Ok(request) => request,
        Err(e) => {
            return Ok(rerender(
                StatusCode::UNPROCESSABLE_ENTITY,
                views::refund_form(&chrome, &form, payment.as_ref(), Some(&e.0)),
            ));
        }
    };

    match state.payments.create_refund(token, &request).await {
        Ok(_) => Ok(Redirect::to("/dashboard/refunds?notice=created").into_response()),
        Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
        Err(e) => Ok(rerender(
            e.status_code(),
            views::refund_form(&chrome, &form, payment.as_ref(), Some(&e.user_message())),
        )),
    }
}

pub async fn refund_detail(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let refund = state.payments.get_refund(ctx.token(), &id).await?;
    let title = format!("Refund {}", short_id(&refund.id));
    Ok(Html(views::refund_detail(&ctx.chrome(&title, Nav::Refunds), &refund)))
}
