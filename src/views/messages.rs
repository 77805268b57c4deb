use super::{escape, form_fields, layout};
use crate::entities::user;
use crate::forms::{Form, FormErrors, MessageForm};
use crate::services::messages::AuthoredMessage;
use std::collections::HashSet;

fn message_item(item: &AuthoredMessage, viewer: Option<&user::Model>, liked: &HashSet<i32>) -> String {
    let m = &item.message;
    let like_button = match viewer {
        Some(_) => {
            let (class, label) = if liked.contains(&m.id) {
                ("btn-primary", "Unlike")
            } else {
                ("btn-secondary", "Like")
            };
            format!(
                r#"<form method="POST" action="/messages/{id}/like" class="messages-like"><button class="btn btn-sm {class}">{label}</button></form>"#,
                id = m.id,
                class = class,
                label = label,
            )
        }
        None => String::new(),
    };

    format!(
        r#"<li class="list-group-item">
<a href="/messages/{id}" class="message-link"></a>
<a href="/users/{uid}"><img src="{img}" alt="" class="timeline-image"></a>
<div class="message-area">
<a href="/users/{uid}">@{name}</a>
<span class="text-muted">{ts}</span>
<p>{text}</p>
</div>
{like}
</li>"#,
        id = m.id,
        uid = item.author.id,
        img = escape(&item.author.image_url),
        name = escape(&item.author.username),
        ts = m.timestamp.format("%d %B %Y"),
        text = escape(&m.text),
        like = like_button,
    )
}

pub fn message_list(
    messages: &[AuthoredMessage],
    viewer: Option<&user::Model>,
    liked: &HashSet<i32>,
) -> String {
    let items: String = messages
        .iter()
        .map(|m| message_item(m, viewer, liked))
        .collect();
    format!(r#"<ul class="list-group" id="messages">{}</ul>"#, items)
}

pub fn home(viewer: &user::Model, messages: &[AuthoredMessage], liked: &HashSet<i32>) -> String {
    let body = format!(
        r#"<aside id="home-aside">
<a href="/users/{id}">@{name}</a>
</aside>
{list}"#,
        id = viewer.id,
        name = escape(&viewer.username),
        list = message_list(messages, Some(viewer), liked),
    );
    layout("Warbler", Some(viewer), &body)
}

pub fn new_message_page(viewer: &user::Model, form: &MessageForm, errors: &FormErrors) -> String {
    let body = format!(
        r#"<div class="row justify-content-md-center">
<div class="col-md-7 col-lg-5">
<form method="POST" action="/messages/new">
{fields}
<button class="btn btn-outline-success btn-block">{title}</button>
</form>
</div>
</div>"#,
        fields = form_fields(form, errors),
        title = MessageForm::TITLE,
    );
    layout("New message", Some(viewer), &body)
}

pub fn show(viewer: Option<&user::Model>, item: &AuthoredMessage) -> String {
    let m = &item.message;
    let delete = match viewer {
        Some(me) if me.id == m.user_id => format!(
            r#"<form method="POST" action="/messages/{}/delete"><button class="btn btn-outline-danger">Delete</button></form>"#,
            m.id
        ),
        _ => String::new(),
    };

    let body = format!(
        r#"<div class="message-show">
<a href="/users/{uid}"><img src="{img}" alt="" class="timeline-image"></a>
<a href="/users/{uid}">@{name}</a>
<p class="single-message">{text}</p>
<span class="text-muted">{ts}</span>
{delete}
</div>"#,
        uid = item.author.id,
        img = escape(&item.author.image_url),
        name = escape(&item.author.username),
        text = escape(&m.text),
        ts = m.timestamp.format("%d %B %Y"),
        delete = delete,
    );
    layout("Message", viewer, &body)
}

pub fn likes_page(
    viewer: Option<&user::Model>,
    shown: &user::Model,
    messages: &[AuthoredMessage],
    liked: &HashSet<i32>,
) -> String {
    let body = format!(
        r#"<h3>Messages liked by @{name}</h3>{list}"#,
        name = escape(&shown.username),
        list = message_list(messages, viewer, liked),
    );
    layout("Likes", viewer, &body)
}
