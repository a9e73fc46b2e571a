use super::{attr, esc};
use crate::models::User;

pub(crate) const STYLE: &str = r#"<style>
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #f7f7f8; color: #222; }
body.centered { display: flex; align-items: center; justify-content: center; min-height: 100vh; }
a { color: #4f46e5; }
.shell { display: flex; min-height: 100vh; }
.sidebar { width: 220px; background: #111827; color: #e5e7eb; padding: 20px; }
.sidebar a { display: block; color: #d1d5db; text-decoration: none; padding: 8px 10px; border-radius: 6px; }
.sidebar a.active { background: #374151; color: #fff; }
.main { flex: 1; padding: 24px 32px; }
.topbar { display: flex; justify-content: flex-end; align-items: center; gap: 12px; margin-bottom: 24px; }
.card { background: #fff; border: 1px solid #e5e7eb; border-radius: 8px; padding: 20px; box-shadow: 0 1px 2px rgba(0,0,0,.04); }
.card.narrow { max-width: 420px; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 16px; }
.stat { font-size: 24px; font-weight: 700; }
.muted { color: #6b7280; font-size: 13px; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { text-align: left; padding: 10px 12px; border-bottom: 1px solid #eee; font-size: 14px; }
td.mono { font-family: ui-monospace, monospace; font-size: 12px; }
.badge { display: inline-block; padding: 2px 8px; border-radius: 6px; font-size: 12px; font-weight: 600; border: 1px solid transparent; }
.badge-success { background: #ecfdf5; color: #047857; }
.badge-destructive { background: #fef2f2; color: #b91c1c; }
.badge-warning { background: #fffbeb; color: #b45309; }
.badge-info { background: #eff6ff; color: #1d4ed8; }
.badge-secondary { background: #f3f4f6; color: #374151; }
.badge-default { background: #eef2ff; color: #4338ca; }
.alert { padding: 12px 16px; border-radius: 6px; margin-bottom: 16px; }
.alert-destructive { background: #fef2f2; color: #b91c1c; border: 1px solid #fecaca; }
.alert-success { background: #ecfdf5; color: #047857; border: 1px solid #a7f3d0; }
.toolbar { display: flex; gap: 8px; align-items: center; justify-content: space-between; padding: 12px 0; }
.pagination { display: flex; gap: 4px; align-items: center; }
.pagination a, .pagination span { padding: 6px 10px; border-radius: 6px; border: 1px solid #e5e7eb; text-decoration: none; }
.pagination .current { background: #4f46e5; color: #fff; }
.pagination .disabled { opacity: .5; }
.field { display: grid; gap: 6px; margin-bottom: 14px; }
.hint { color: #6b7280; font-size: 12px; }
input, select, textarea { padding: 8px 10px; border: 1px solid #d1d5db; border-radius: 6px; font: inherit; }
button, .button { background: #4f46e5; color: #fff; border: none; border-radius: 6px; padding: 8px 14px; font: inherit; cursor: pointer; text-decoration: none; }
button.danger { background: #dc2626; }
button.link { background: none; color: #4f46e5; padding: 0; }
.empty { text-align: center; padding: 48px 0; }
dl.details { display: grid; grid-template-columns: 200px 1fr; gap: 8px 16px; }
dt { color: #6b7280; font-size: 13px; }
</style>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Dashboard,
    Payments,
    Subscriptions,
    Refunds,
}

impl Nav {
    const ALL: [Nav; 4] = [Nav::Dashboard, Nav::Payments, Nav::Subscriptions, Nav::Refunds];

    fn href(&self) -> &'static str {
        match self {
            Nav::Dashboard => "/dashboard",
            Nav::Payments => "/dashboard/payments",
            Nav::Subscriptions => "/dashboard/subscriptions",
            Nav::Refunds => "/dashboard/refunds",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Nav::Dashboard => "Dashboard",
            Nav::Payments => "Payments",
            Nav::Subscriptions => "Subscriptions",
            Nav::Refunds => "Refunds",
        }
    }
}

/// Everything the surrounding layout needs from the request.
pub struct PageChrome<'a> {
    pub title: &'a str,
    pub nav: Nav,
    pub user: &'a User,
    pub csrf_token: &'a str,
}

impl PageChrome<'_> {
    /// Hidden input carrying the CSRF token, for forms inside the page body.
    pub fn csrf_input(&self) -> String {
        format!(
            r#"<input type="hidden" name="csrf_token" value="{}">"#,
            attr(self.csrf_token)
        )
    }
}

fn user_menu(chrome: &PageChrome) -> String {
    format!(
        r#"<div class="user-menu"><strong>{name}</strong> <span class="muted">{email}</span></div>
<form method="post" action="/auth/logout">{csrf}<button type="submit" class="link">Sign out</button></form>"#,
        name = esc(&chrome.user.name),
        email = esc(&chrome.user.email),
        csrf = chrome.csrf_input(),
    )
}

pub fn layout(chrome: &PageChrome, body: &str) -> String {
    let nav: String = Nav::ALL
        .iter()
        .map(|item| {
            format!(
                r#"<a href="{}"{}>{}</a>"#,
                item.href(),
                if *item == chrome.nav { r#" class="active""# } else { "" },
                item.label()
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Payment Admin</title>
{style}
</head>
<body>
<div class="shell">
<nav class="sidebar"><h2>Payment Admin</h2>{nav}</nav>
<main class="main">
<div class="topbar">{user_menu}</div>
{body}
</main>
</div>
</body>
</html>"#,
        title = esc(chrome.title),
        style = STYLE,
        nav = nav,
        user_menu = user_menu(chrome),
        body = body,
    )
}
