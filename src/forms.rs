//! Dashboard forms: raw urlencoded input and its validation.
//!
//! Inputs are kept as strings so a rejected form can be shown again exactly
//! as the user typed it.

use serde::Deserialize;
use thiserror::Error;

use crate::models::{
    CreatePaymentRequest, CreateRefundRequest, CreateSubscriptionRequest, Currency, Interval,
    Payment, Provider, RefundReason,
};

pub const STATEMENT_DESCRIPTOR_MAX: usize = 22;

pub const NOT_REFUNDABLE: &str = "Can only refund succeeded payments";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Leading-integer parse; anything unparseable counts as 0.
///
/// `"12abc"` -> 12, `"1.5"` -> 1, `""` -> 0.
pub fn parse_int(raw: &str) -> i64 {
    let s = raw.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().unwrap_or(0);
    if negative { -value } else { value }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_provider(raw: &str) -> Result<Provider, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(Provider::default());
    }
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::new("Unknown provider"))
}

fn parse_currency(raw: &str) -> Result<Currency, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(Currency::default());
    }
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::new("Unknown currency"))
}

/// Body of every POST that only needs the CSRF token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CsrfForm {
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub statement_descriptor: String,
}

impl PaymentForm {
    pub fn amount(&self) -> i64 {
        parse_int(&self.amount)
    }

    pub fn currency(&self) -> Currency {
        parse_currency(&self.currency).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<CreatePaymentRequest, ValidationError> {
        let provider = parse_provider(&self.provider)?;
        let currency = parse_currency(&self.currency)?;

        let amount = self.amount();
        if amount <= 0 {
            return Err(ValidationError::new("Amount must be greater than 0"));
        }

        let statement_descriptor = non_empty(&self.statement_descriptor);
        if statement_descriptor
            .as_ref()
            .is_some_and(|s| s.chars().count() > STATEMENT_DESCRIPTOR_MAX)
        {
            return Err(ValidationError::new(format!(
                "Statement descriptor must be at most {} characters",
                STATEMENT_DESCRIPTOR_MAX
            )));
        }

        Ok(CreatePaymentRequest {
            provider,
            amount,
            currency,
            description: non_empty(&self.description),
            statement_descriptor,
            metadata: None,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub interval_count: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(default)]
    pub trial_period_days: String,
}

impl SubscriptionForm {
    pub fn amount(&self) -> i64 {
        parse_int(&self.amount)
    }

    pub fn currency(&self) -> Currency {
        parse_currency(&self.currency).unwrap_or_default()
    }

    /// Empty or zero counts fall back to 1; negatives are kept so they fail validation.
    pub fn interval_count(&self) -> i64 {
        match parse_int(&self.interval_count) {
            0 => 1,
            n => n,
        }
    }

    pub fn validate(&self) -> Result<CreateSubscriptionRequest, ValidationError> {
        let provider = parse_provider(&self.provider)?;
        let currency = parse_currency(&self.currency)?;
        let interval = if self.interval.trim().is_empty() {
            Interval::default()
        } else {
            self.interval
                .trim()
                .parse::<Interval>()
                .map_err(|_| ValidationError::new("Unknown interval"))?
        };

        let amount = self.amount();
        if amount <= 0 {
            return Err(ValidationError::new("Amount must be greater than 0"));
        }

        let product_name = non_empty(&self.product_name)
            .ok_or_else(|| ValidationError::new("Product name is required"))?;

        let interval_count = u32::try_from(self.interval_count())
            .ok()
            .filter(|c| *c >= 1)
            .ok_or_else(|| ValidationError::new("Interval count must be at least 1"))?;

        let trial_days = parse_int(&self.trial_period_days);
        if trial_days < 0 {
            return Err(ValidationError::new("Trial period cannot be negative"));
        }
        let trial_period_days = u32::try_from(trial_days)
            .map_err(|_| ValidationError::new("Trial period is too long"))?;

        Ok(CreateSubscriptionRequest {
            provider,
            amount,
            currency,
            interval,
            interval_count,
            product_name,
            product_description: non_empty(&self.product_description),
            trial_period_days: (trial_period_days > 0).then_some(trial_period_days),
            metadata: None,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefundForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub notes: String,
}

impl RefundForm {
    pub fn payment_id(&self) -> &str {
        self.payment_id.trim()
    }

    pub fn amount(&self) -> i64 {
        parse_int(&self.amount)
    }

    /// `payment` is the payment `payment_id` resolved to, if it could be loaded.
    pub fn validate(
        &self,
        payment: Option<&Payment>,
    ) -> Result<CreateRefundRequest, ValidationError> {
        if self.payment_id().is_empty() {
            return Err(ValidationError::new("Payment ID is required"));
        }

        let payment = payment.ok_or_else(|| ValidationError::new("Please select a valid payment"))?;
        if !payment.is_refundable() {
            return Err(ValidationError::new(NOT_REFUNDABLE));
        }

        let amount = self.amount();
        if amount <= 0 {
            return Err(ValidationError::new("Refund amount must be greater than 0"));
        }
        if amount > payment.amount {
            return Err(ValidationError::new("Refund amount cannot exceed payment amount"));
        }

        let reason = match self.reason.trim() {
            "" => None,
            raw => Some(
                raw.parse::<RefundReason>()
                    .map_err(|_| ValidationError::new("Unknown refund reason"))?,
            ),
        };

        Ok(CreateRefundRequest {
            payment_id: payment.id.clone(),
            amount,
            reason,
            notes: non_empty(&self.notes),
            metadata: None,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelForm {
    #[serde(default)]
    pub csrf_token: String,
    /// Checkbox: present ("on"/"true") means cancel now instead of at period end.
    #[serde(default)]
    pub immediate: Option<String>,
}

impl CancelForm {
    pub fn immediate(&self) -> bool {
        matches!(
            self.immediate.as_deref().map(str::trim),
            Some("on" | "true" | "1" | "yes")
        )
    }
}
