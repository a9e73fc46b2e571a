use crate::format::humanize;

/// Colour family of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeVariant {
    Success,
    Destructive,
    Warning,
    Info,
    Secondary,
    Default,
}

impl BadgeVariant {
    pub fn for_status(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "succeeded" | "active" | "completed" => BadgeVariant::Success,
            "failed" | "canceled" | "cancelled" | "unpaid" => BadgeVariant::Destructive,
            "pending" | "processing" | "past_due" | "requires_action" => BadgeVariant::Warning,
            "trialing" | "incomplete" => BadgeVariant::Info,
            "paused" | "incomplete_expired" => BadgeVariant::Secondary,
            _ => BadgeVariant::Default,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            BadgeVariant::Success => "badge-success",
            BadgeVariant::Destructive => "badge-destructive",
            BadgeVariant::Warning => "badge-warning",
            BadgeVariant::Info => "badge-info",
            BadgeVariant::Secondary => "badge-secondary",
            BadgeVariant::Default => "badge-default",
        }
    }
}

/// Render a status as a badge, e.g. `past_due` -> yellow "past due".
pub fn status_badge(status: &str) -> String {
    let variant = BadgeVariant::for_status(status);
    format!(
        r#"<span class="badge {}">{}</span>"#,
        variant.css_class(),
        html_escape::encode_text(&humanize(status))
    )
}
