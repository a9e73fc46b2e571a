use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{rerender, soft_fail};
use crate::error::{AppError, Result};
use crate::extractors::{Form, Path, Query};
use crate::forms::{CancelForm, CsrfForm, SubscriptionForm};
use crate::listing::ListQuery;
use crate::middleware::SessionContext;
use crate::models::UpdateSubscriptionRequest;
use crate::state::AppState;
use crate::views::{self, Nav, SubscriptionListView};

pub async fn list_subscriptions(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>> {
    let loaded = soft_fail(
        state
            .payments
            .list_subscriptions(ctx.token(), state.page_size, query.offset())
            .await,
    )?;

    let view = SubscriptionListView {
        page: loaded.as_ref().map_err(Clone::clone),
        query: &query,
    };
    Ok(Html(views::subscription_list(
        &ctx.chrome("Subscriptions", Nav::Subscriptions),
        &view,
    )))
}

pub async fn new_subscription(Extension(ctx): Extension<SessionContext>) -> Html<String> {
    let chrome = ctx.chrome("Create Subscription", Nav::Subscriptions);
    Html(views::subscription_form(&chrome, &SubscriptionForm::default(), None))
}

pub async fn create_subscription(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<SubscriptionForm>,
) -> Result<Response> {
    ctx.check_csrf(&form.csrf_token)?;
    let chrome = ctx.chrome("Create Subscription", Nav::Subscriptions);

    let request = match form.validate() {
        Ok(request) => request,
        Err(e) => {
            return Ok(rerender(
                StatusCode::UNPROCESSABLE_ENTITY,
                views::subscription_form(&chrome, &form, Some(&e.0)),
            ));
        }
    };

    match state.payments.create_subscription(ctx.token(), &request).await {
        Ok(_) => Ok(Redirect::to("/dashboard/subscriptions?notice=created").into_response()),
        Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
        Err(e) => Ok(rerender(
            e.status_code(),
            views::subscription_form(&chrome, &form, Some(&e.user_message())),
        )),
    }
}

fn detail_notice(notice: Option<&str>) -> Option<&'static str> {
    match notice? {
        "canceled" => Some("Subscription canceled"),
        "resumed" => Some("Subscription will renew at the end of the period"),
        _ => None,
    }
}

pub async fn subscription_detail(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>> {
    let subscription = state.payments.get_subscription(ctx.token(), &id).await?;
    Ok(Html(views::subscription_detail(
        &ctx.chrome(&subscription.product_name, Nav::Subscriptions),
        &subscription,
        detail_notice(query.notice.as_deref()),
        None,
    )))
}

fn detail_path(id: &str) -> String {
    format!("/dashboard/subscriptions/{}", urlencoding::encode(id))
}

/// Cancel now or at period end. Only subscriptions that can still be
/// canceled are sent to the payment service.
pub async fn cancel_subscription(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
    Form(form): Form<CancelForm>,
) -> Result<Response> {
    ctx.check_csrf(&form.csrf_token)?;
    let token = ctx.token();
    let subscription = state.payments.get_subscription(token, &id).await?;
    let chrome = ctx.chrome(&subscription.product_name, Nav::Subscriptions);

    if !subscription.can_cancel() {
        return Ok(rerender(
            StatusCode::UNPROCESSABLE_ENTITY,
            views::subscription_detail(
                &chrome,
                &subscription,
                None,
                Some("This subscription can no longer be canceled"),
            ),
        ));
    }

    match state.payments.cancel_subscription(token, &id, form.immediate()).await {
        Ok(_) => Ok(Redirect::to(&format!("{}?notice=canceled", detail_path(&id))).into_response()),
        Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
        Err(e) => Ok(rerender(
            e.status_code(),
            views::subscription_detail(&chrome, &subscription, None, Some(&e.user_message())),
        )),
    }
}

/// Undo a pending cancel-at-period-end.
pub async fn resume_subscription(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
    Form(form): Form<CsrfForm>,
) -> Result<Response> {
    ctx.check_csrf(&form.csrf_token)?;
    let token = ctx.token();

    let request = UpdateSubscriptionRequest {
        cancel_at_period_end: Some(false),
        ..Default::default()
    };
    match state.payments.update_subscription(token, &id, &request).await {
        Ok(subscription) => {
            tracing::info!(subscription_id = %subscription.id, "Resumed subscription");
            Ok(Redirect::to(&format!("{}?notice=resumed", detail_path(&id))).into_response())
        }
        Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
        Err(e) => {
            let subscription = state.payments.get_subscription(token, &id).await?;
            Ok(rerender(
                e.status_code(),
                views::subscription_detail(
                    &ctx.chrome(&subscription.product_name, Nav::Subscriptions),
                    &subscription,
                    None,
                    Some(&e.user_message()),
                ),
            ))
        }
    }
}
