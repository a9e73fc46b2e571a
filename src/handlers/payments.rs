use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{rerender, soft_fail};
use crate::error::{AppError, Result};
use crate::extractors::{Form, Path, Query};
use crate::format::short_id;
use crate::forms::PaymentForm;
use crate::listing::ListQuery;
use crate::middleware::SessionContext;
use crate::state::AppState;
use crate::views::{self, Nav, PaymentListView};

pub async fn list_payments(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>> {
    let loaded = soft_fail(
        state
            .payments
            .list_payments(ctx.token(), state.page_size, query.offset())
            .await,
    )?;

    let view = PaymentListView {
        page: loaded.as_ref().map_err(Clone::clone),
        query: &query,
    };
    Ok(Html(views::payment_list(&ctx.chrome("Payments", Nav::Payments), &view)))
}

pub async fn new_payment(Extension(ctx): Extension<SessionContext>) -> Html<String> {
    let chrome = ctx.chrome("Create Payment", Nav::Payments);
    Html(views::payment_form(&chrome, &PaymentForm::default(), None))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<PaymentForm>,
) -> Result<Response> {
    ctx.check_csrf(&form.csrf_token)?;
    let chrome = ctx.chrome("Create Payment", Nav::Payments);

    let request = match form.validate() {
        Ok(request) => request,
        Err(e) => {
            return Ok(rerender(
                StatusCode::UNPROCESSABLE_ENTITY,
                views::payment_form(&chrome, &form, Some(&e.0)),
            ));
        }
    };

    match state.payments.create_payment(ctx.token(), &request).await {
        Ok(_) => Ok(Redirect::to("/dashboard/payments?notice=created").into_response()),
        Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
        Err(e) => Ok(rerender(
            e.status_code(),
            views::payment_form(&chrome, &form, Some(&e.user_message())),
        )),
    }
}

pub async fn payment_detail(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let token = ctx.token();
    let (payment, refunds) = tokio::join!(
        state.payments.get_payment(token, &id),
        state.payments.list_refunds_for_payment(token, &id),
    );
    let payment = payment?;
    let refunds = soft_fail(refunds)?;

    let title = format!("Payment {}", short_id(&payment.id));
    Ok(Html(views::payment_detail(
        &ctx.chrome(&title, Nav::Payments),
        &payment,
        refunds.as_deref().map_err(Clone::clone),
    )))
}
