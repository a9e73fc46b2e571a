use super::{attr, esc};
use crate::format::humanize;
use crate::listing::{ListQuery, PageInfo};

pub fn alert(message: &str) -> String {
    format!(
        r#"<div class="alert alert-destructive" role="alert">{}</div>"#,
        esc(message)
    )
}

/// Green banner shown after a successful create/cancel.
pub fn notice(message: &str) -> String {
    format!(
        r#"<div class="alert alert-success" role="status">{}</div>"#,
        esc(message)
    )
}

pub fn page_header(title: &str, subtitle: &str, action: Option<(&str, &str)>) -> String {
    let action = action
        .map(|(href, label)| format!(r#"<a class="button" href="{}">{}</a>"#, attr(href), esc(label)))
        .unwrap_or_default();
    format!(
        r#"<div class="toolbar"><div><h1>{}</h1><p class="muted">{}</p></div>{}</div>"#,
        esc(title),
        esc(subtitle),
        action
    )
}

pub fn empty_state(title: &str, hint: &str) -> String {
    format!(
        r#"<div class="empty"><p>{}</p><p class="muted">{}</p></div>"#,
        esc(title),
        esc(hint)
    )
}

/// Table whose rows link to a detail page.
pub fn table(headers: &[&str], rows: &[String]) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!("<th>{}</th>", esc(h)))
        .collect();
    format!(
        r#"<div class="card"><table><thead><tr>{}</tr></thead><tbody>{}</tbody></table></div>"#,
        head,
        rows.concat()
    )
}

pub fn detail_rows(rows: &[(&str, String)]) -> String {
    let body: String = rows
        .iter()
        .map(|(label, value)| format!("<dt>{}</dt><dd>{}</dd>", esc(label), value))
        .collect();
    format!(r#"<dl class="details">{}</dl>"#, body)
}

/// `<option>` list with `selected` as the chosen value.
pub fn select_options(options: &[(&str, &str)], selected: &str) -> String {
    options
        .iter()
        .map(|(value, label)| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                attr(value),
                if *value == selected { " selected" } else { "" },
                esc(label)
            )
        })
        .collect()
}

fn list_href(base: &str, offset: u64, query: &ListQuery) -> String {
    let mut href = format!("{}?offset={}", base, offset);
    if !query.search().is_empty() {
        href.push_str(&format!("&q={}", urlencoding::encode(query.search())));
    }
    if let Some(status) = query.status_filter() {
        href.push_str(&format!("&status={}", urlencoding::encode(status)));
    }
    href
}

/// Search box + status filter for a list page.
pub fn search_toolbar(base: &str, query: &ListQuery, statuses: &[&str]) -> String {
    let mut options = vec![("", "All statuses".to_string())];
    options.extend(statuses.iter().map(|s| (*s, humanize(s))));
    let options: Vec<(&str, &str)> = options.iter().map(|(v, l)| (*v, l.as_str())).collect();

    format!(
        r#"<form class="toolbar" method="get" action="{base}">
<input type="hidden" name="offset" value="{offset}">
<input type="search" name="q" value="{q}" placeholder="Search this page...">
<select name="status">{options}</select>
<button type="submit">Filter</button>
</form>"#,
        base = attr(base),
        offset = query.offset(),
        q = attr(query.search()),
        options = select_options(&options, query.status_filter().unwrap_or("")),
    )
}

/// "Showing x to y of z" plus previous / numbered / next links. Empty when there's one page.
pub fn pagination(page: &PageInfo, noun: &str, base: &str, query: &ListQuery) -> String {
    if !page.should_paginate() {
        return String::new();
    }

    let previous = match page.previous_offset() {
        Some(offset) => format!(r#"<a href="{}">Previous</a>"#, attr(&list_href(base, offset, query))),
        None => r#"<span class="disabled">Previous</span>"#.to_string(),
    };
    let next = match page.next_offset() {
        Some(offset) => format!(r#"<a href="{}">Next</a>"#, attr(&list_href(base, offset, query))),
        None => r#"<span class="disabled">Next</span>"#.to_string(),
    };
    let links: String = page
        .page_links()
        .into_iter()
        .map(|n| {
            if n == page.current_page() {
                format!(r#"<span class="current" aria-current="page">{}</span>"#, n)
            } else {
                format!(
                    r#"<a href="{}">{}</a>"#,
                    attr(&list_href(base, page.offset_for_page(n), query)),
                    n
                )
            }
        })
        .collect();

    format!(
        r#"<div class="toolbar"><p class="muted">{}</p><nav class="pagination">{}{}{}</nav></div>"#,
        esc(&page.range_label(noun)),
        previous,
        links,
        next
    )
}

/// Message shown when a search filters out every row of the loaded page.
pub fn no_matches(query: &ListQuery) -> String {
    empty_state(
        "No results on this page",
        &format!("Nothing matched \"{}\"", query.search()),
    )
}
