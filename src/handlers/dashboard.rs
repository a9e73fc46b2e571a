use axum::{
    extract::{Extension, State},
    response::Html,
};

use super::soft_fail;
use crate::error::Result;
use crate::middleware::SessionContext;
use crate::state::AppState;
use crate::stats::{DashboardStats, STATS_SAMPLE_SIZE};
use crate::views::{self, Nav};

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<Html<String>> {
    let token = ctx.token();
    let loaded = tokio::try_join!(
        state.payments.list_payments(token, STATS_SAMPLE_SIZE, 0),
        state.payments.list_subscriptions(token, STATS_SAMPLE_SIZE, 0),
        state.payments.list_refunds(token, STATS_SAMPLE_SIZE, 0),
    );

    let chrome = ctx.chrome("Dashboard", Nav::Dashboard);
    let html = match soft_fail(loaded)? {
        Ok((payments, subscriptions, refunds)) => {
            let stats = DashboardStats::compute(&payments, &subscriptions, &refunds);
            views::dashboard_page(&chrome, Ok((&stats, payments.data.as_slice())))
        }
        Err(message) => views::dashboard_page(&chrome, Err(message)),
    };
    Ok(Html(html))
}
