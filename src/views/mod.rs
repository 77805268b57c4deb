//! HTML rendering for the server-side pages.

pub mod messages;
pub mod users;

use crate::entities::user;
use crate::forms::{FieldKind, Form, FormErrors};
use std::fmt::Write;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps `body` in the page chrome. The navbar depends on who is logged in.
pub fn layout(title: &str, viewer: Option<&user::Model>, body: &str) -> String {
    let nav = match viewer {
        Some(me) => format!(
            r#"<li><a href="/users/{id}"><img src="{img}" alt="{name}"></a></li>
<li><a href="/messages/new">New Message</a></li>
<li><a href="/logout">Log out</a></li>"#,
            id = me.id,
            img = escape(&me.image_url),
            name = escape(&me.username),
        ),
        None => r#"<li><a href="/signup">Sign up</a></li>
<li><a href="/login">Log in</a></li>"#
            .to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav class="navbar">
<a href="/" class="navbar-brand"><span>Warbler</span></a>
<form class="navbar-form" action="/users"><input name="q" placeholder="Search Warbler"></form>
<ul class="nav">
{nav}
</ul>
</nav>
<div class="container">
{body}
</div>
</body>
</html>"#,
        title = escape(title),
        nav = nav,
        body = body,
    )
}

/// Renders every declared field of `F` with its current value and errors.
/// Password inputs are never refilled.
pub fn form_fields<F: Form>(form: &F, errors: &FormErrors) -> String {
    let mut out = String::new();
    for field in F::FIELDS {
        let value = match field.kind {
            FieldKind::Password => String::new(),
            _ => escape(form.value(field.name)),
        };
        let input = match field.kind {
            FieldKind::Text => format!(
                r#"<input type="text" id="{n}" name="{n}" placeholder="{l}" value="{v}" class="form-control">"#,
                n = field.name,
                l = field.label,
                v = value
            ),
            FieldKind::Password => format!(
                r#"<input type="password" id="{n}" name="{n}" placeholder="{l}" class="form-control">"#,
                n = field.name,
                l = field.label
            ),
            FieldKind::TextArea => format!(
                r#"<textarea id="{n}" name="{n}" placeholder="{l}" class="form-control">{v}</textarea>"#,
                n = field.name,
                l = field.label,
                v = value
            ),
        };
        let _ = writeln!(out, "<div class=\"form-group\">{}", input);
        for message in errors.field(field.name) {
            let _ = writeln!(
                out,
                r#"<span class="text-danger">{}</span>"#,
                escape(message)
            );
        }
        out.push_str("</div>\n");
    }
    out
}

pub fn alert(message: &str) -> String {
    format!(r#"<div class="alert alert-danger">{}</div>"#, escape(message))
}

pub fn not_found(what: &str) -> String {
    layout(
        "Not found",
        None,
        &format!("<h1>404</h1><p>{} not found.</p>", escape(what)),
    )
}

pub fn server_error() -> String {
    layout("Error", None, "<h1>500</h1><p>Something went wrong.</p>")
}
