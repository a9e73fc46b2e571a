use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::{build_http_client, decode_response};
use crate::error::{AppError, Result};
use crate::models::{
    CreatePaymentRequest, CreateRefundRequest, CreateSubscriptionRequest, Customer, Paginated,
    Payment, Refund, Subscription, UpdateSubscriptionRequest,
};

const SERVICE: &str = "payment-service";

/// The payment service caps page sizes at this value.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// REST client for the payment service. Every call is made on behalf of
/// the signed-in staff member whose access token is passed in.
#[derive(Debug, Clone)]
pub struct PaymentServiceClient {
    client: Client,
    base_url: String,
}

impl PaymentServiceClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder
            .bearer_auth(token)
            .header("Accept", "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, token: &str) -> Result<T> {
        let response = self.authed(builder, token).send().await.map_err(|e| {
            tracing::error!(service = SERVICE, error = %e, "Request failed");
            AppError::from(e)
        })?;
        decode_response(SERVICE, response).await
    }

    async fn list<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Paginated<T>> {
        let limit = limit.clamp(1, MAX_PAGE_LIMIT);
        let builder = self
            .client
            .get(self.url(path))
            .query(&[("limit", limit.to_string()), ("offset", offset.to_string())]);
        self.send(builder, token).await
    }

    /// POST that creates a resource, tagged with a fresh idempotency key.
    fn post_new(&self, path: &str) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Idempotency-Key", Uuid::new_v4().to_string())
    }

    fn item_path(prefix: &str, id: &str) -> String {
        format!("{}/{}", prefix, urlencoding::encode(id))
    }

    // ============ Payments ============

    pub async fn list_payments(
        &self,
        token: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Paginated<Payment>> {
        self.list(token, "/api/payments", limit, offset).await
    }

    pub async fn get_payment(&self, token: &str, id: &str) -> Result<Payment> {
        let builder = self.client.get(self.url(&Self::item_path("/api/payments", id)));
        self.send(builder, token).await
    }

    pub async fn list_refunds_for_payment(
        &self,
        token: &str,
        payment_id: &str,
    ) -> Result<Vec<Refund>> {
        let path = format!("{}/refunds", Self::item_path("/api/payments", payment_id));
        let builder = self.client.get(self.url(&path));
        self.send(builder, token).await
    }

    pub async fn create_payment(
        &self,
        token: &str,
        request: &CreatePaymentRequest,
    ) -> Result<Payment> {
        let builder = self.post_new("/api/payments").json(request);
        let payment: Payment = self.send(builder, token).await?;
        tracing::info!(payment_id = %payment.id, amount = payment.amount, "Created payment");
        Ok(payment)
    }

    // ============ Subscriptions ============

    pub async fn list_subscriptions(
        &self,
        token: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Paginated<Subscription>> {
        self.list(token, "/api/subscriptions", limit, offset).await
    }

    pub async fn get_subscription(&self, token: &str, id: &str) -> Result<Subscription> {
        let builder = self
            .client
            .get(self.url(&Self::item_path("/api/subscriptions", id)));
        self.send(builder, token).await
    }

    pub async fn create_subscription(
        &self,
        token: &str,
        request: &CreateSubscriptionRequest,
    ) -> Result<Subscription> {
        let builder = self.post_new("/api/subscriptions").json(request);
        let subscription: Subscription = self.send(builder, token).await?;
        tracing::info!(subscription_id = %subscription.id, "Created subscription");
        Ok(subscription)
    }

    pub async fn update_subscription(
        &self,
        token: &str,
        id: &str,
        request: &UpdateSubscriptionRequest,
    ) -> Result<Subscription> {
        let builder = self
            .client
            .patch(self.url(&Self::item_path("/api/subscriptions", id)))
            .json(request);
        self.send(builder, token).await
    }

    /// Cancel now (`immediate`) or at the end of the current period.
    pub async fn cancel_subscription(
        &self,
        token: &str,
        id: &str,
        immediate: bool,
    ) -> Result<Subscription> {
        let builder = self
            .client
            .delete(self.url(&Self::item_path("/api/subscriptions", id)))
            .query(&[("immediate", immediate.to_string())]);
        let subscription: Subscription = self.send(builder, token).await?;
        tracing::info!(subscription_id = %id, immediate, "Canceled subscription");
        Ok(subscription)
    }

    // ============ Refunds ============

    pub async fn list_refunds(
        &self,
        token: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Paginated<Refund>> {
        self.list(token, "/api/refunds", limit, offset).await
    }

    pub async fn get_refund(&self, token: &str, id: &str) -> Result<Refund> {
        let builder = self.client.get(self.url(&Self::item_path("/api/refunds", id)));
        self.send(builder, token).await
    }

    pub async fn create_refund(
        &self,
        token: &str,
        request: &CreateRefundRequest,
    ) -> Result<Refund> {
        let builder = self.post_new("/api/refunds").json(request);
        let refund: Refund = self.send(builder, token).await?;
        tracing::info!(
            refund_id = %refund.id,
            payment_id = %refund.payment_id,
            amount = refund.amount,
            "Created refund"
        );
        Ok(refund)
    }

    // ============ Misc ============

    pub async fn current_customer(&self, token: &str) -> Result<Customer> {
        let builder = self.client.get(self.url("/api/customers/me"));
        self.send(builder, token).await
    }

    /// Unauthenticated liveness probe.
    pub async fn health(&self) -> Result<()> {
        let response = self.client.get(self.url("/health")).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::Upstream {
                status: response.status().as_u16(),
                code: None,
                message: "payment service is unhealthy".into(),
            })
        }
    }
}
