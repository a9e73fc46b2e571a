use super::{alert, layout::STYLE};

pub fn login_page(error: Option<&str>) -> String {
    let error = match error {
        Some("auth_failed") => alert("Sign-in failed. Please try again."),
        Some(_) => alert("Something went wrong. Please try again."),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Sign in · Payment Admin</title>{style}</head>
<body class="centered">
<div class="card narrow">
<h1>Payment Admin</h1>
<p class="muted">Sign in with your staff account to manage payments, subscriptions and refunds.</p>
{error}
<a class="button" href="/auth/login">Sign in with Google</a>
</div>
</body>
</html>"#,
        style = STYLE,
        error = error,
    )
}
