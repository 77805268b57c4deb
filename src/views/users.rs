use super::{alert, escape, form_fields, layout};
use crate::entities::{message, user};
use crate::forms::{EditUserForm, Form, FormErrors, LoginForm, UserAddForm};
use crate::services::users::UserStats;

pub fn signup_page(form: &UserAddForm, errors: &FormErrors, notice: Option<&str>) -> String {
    let body = format!(
        r#"<div class="row justify-content-md-center">
<div class="col-md-7 col-lg-5">
<h2 class="join-message">Join Warbler today.</h2>
{notice}
<form method="POST" action="/signup" id="user_form">
{fields}
<button class="btn btn-primary btn-lg btn-block">{title}</button>
</form>
</div>
</div>"#,
        notice = notice.map(alert).unwrap_or_default(),
        fields = form_fields(form, errors),
        title = UserAddForm::TITLE,
    );
    layout("Sign up", None, &body)
}

pub fn login_page(form: &LoginForm, errors: &FormErrors, notice: Option<&str>) -> String {
    let body = format!(
        r#"<div class="row justify-content-md-center">
<div class="col-md-7 col-lg-5">
<h2 class="join-message">Welcome back.</h2>
{notice}
<form method="POST" action="/login" id="user_form">
{fields}
<button class="btn btn-primary btn-block btn-lg">{title}</button>
</form>
</div>
</div>"#,
        notice = notice.map(alert).unwrap_or_default(),
        fields = form_fields(form, errors),
        title = LoginForm::TITLE,
    );
    layout("Log in", None, &body)
}

pub fn anon_home() -> String {
    layout(
        "Warbler",
        None,
        r#"<div class="home-hero">
<h1>What's Happening?</h1>
<h4>New to Warbler?</h4>
<a href="/signup" class="btn btn-primary">Sign up now</a>
</div>"#,
    )
}

fn user_card(u: &user::Model) -> String {
    format!(
        r#"<li class="user-card">
<a href="/users/{id}"><img src="{img}" alt="Image for {name}"></a>
<p><a href="/users/{id}">@{name}</a></p>
<p class="card-bio">{bio}</p>
</li>"#,
        id = u.id,
        img = escape(&u.image_url),
        name = escape(&u.username),
        bio = escape(u.bio.as_deref().unwrap_or_default()),
    )
}

pub fn user_list(viewer: Option<&user::Model>, users: &[user::Model], query: Option<&str>) -> String {
    let body = if users.is_empty() {
        "<h3>Sorry, no users found</h3>".to_string()
    } else {
        let cards: String = users.iter().map(user_card).collect();
        format!(
            r#"<h3>Users{q}</h3><ul class="user-list">{cards}</ul>"#,
            q = query
                .map(|q| format!(" matching &quot;{}&quot;", escape(q)))
                .unwrap_or_default(),
            cards = cards,
        )
    };
    layout("Users", viewer, &body)
}

fn profile_header(
    viewer: Option<&user::Model>,
    shown: &user::Model,
    stats: &UserStats,
    viewer_follows: bool,
) -> String {
    let action = match viewer {
        Some(me) if me.id == shown.id => r#"<a href="/users/profile" class="btn btn-outline-secondary">Edit Profile</a>
<form method="POST" action="/users/delete"><button class="btn btn-outline-danger">Delete Profile</button></form>"#
            .to_string(),
        Some(_) if viewer_follows => format!(
            r#"<form method="POST" action="/users/stop-following/{}"><button class="btn btn-primary">Unfollow</button></form>"#,
            shown.id
        ),
        Some(_) => format!(
            r#"<form method="POST" action="/users/follow/{}"><button class="btn btn-outline-primary">Follow</button></form>"#,
            shown.id
        ),
        None => String::new(),
    };

    format!(
        r#"<div id="warbler-hero" style="background-image: url('{header}')"></div>
<img src="{img}" alt="Image for {name}" id="profile-avatar">
<h4 id="sidebar-username">@{name}</h4>
<p class="user-bio">{bio}</p>
<p class="user-location">{location}</p>
<ul class="user-stats">
<li class="stat"><a href="/users/{id}">Messages <h4>{messages}</h4></a></li>
<li class="stat"><a href="/users/{id}/following">Following <h4>{following}</h4></a></li>
<li class="stat"><a href="/users/{id}/followers">Followers <h4>{followers}</h4></a></li>
<li class="stat"><a href="/users/{id}/likes">Likes <h4>{likes}</h4></a></li>
</ul>
{action}"#,
        header = escape(&shown.header_image_url),
        img = escape(&shown.image_url),
        name = escape(&shown.username),
        bio = escape(shown.bio.as_deref().unwrap_or_default()),
        location = escape(shown.location.as_deref().unwrap_or_default()),
        id = shown.id,
        messages = stats.messages,
        following = stats.following,
        followers = stats.followers,
        likes = stats.likes,
        action = action,
    )
}

pub fn profile(
    viewer: Option<&user::Model>,
    shown: &user::Model,
    stats: &UserStats,
    viewer_follows: bool,
    messages: &[message::Model],
) -> String {
    let items: String = messages
        .iter()
        .map(|m| {
            format!(
                r#"<li class="list-group-item"><a href="/messages/{id}">@{name}</a> <span class="text-muted">{ts}</span><p>{text}</p></li>"#,
                id = m.id,
                name = escape(&shown.username),
                ts = m.timestamp.format("%d %B %Y"),
                text = escape(&m.text),
            )
        })
        .collect();

    let body = format!(
        r#"{header}<ul class="list-group" id="messages">{items}</ul>"#,
        header = profile_header(viewer, shown, stats, viewer_follows),
        items = items,
    );
    layout(&format!("@{}", shown.username), viewer, &body)
}

pub fn follow_list(
    viewer: Option<&user::Model>,
    heading: &str,
    shown: &user::Model,
    users: &[user::Model],
) -> String {
    let cards: String = users.iter().map(user_card).collect();
    let body = format!(
        r#"<h3>@{name} &middot; {heading}</h3><ul class="user-list">{cards}</ul>"#,
        name = escape(&shown.username),
        heading = escape(heading),
        cards = cards,
    );
    layout(heading, viewer, &body)
}

pub fn edit_profile_page(
    viewer: &user::Model,
    form: &EditUserForm,
    errors: &FormErrors,
    notice: Option<&str>,
) -> String {
    let body = format!(
        r#"<div class="row justify-content-md-center">
<div class="col-md-7 col-lg-5">
<h2 class="join-message">Edit Your Profile.</h2>
{notice}
<form method="POST" action="/users/profile" id="user_form">
{fields}
<button class="btn btn-success">{title}</button>
<a href="/users/{id}" class="btn btn-outline-secondary">Cancel</a>
</form>
</div>
</div>"#,
        notice = notice.map(alert).unwrap_or_default(),
        fields = form_fields(form, errors),
        title = EditUserForm::TITLE,
        id = viewer.id,
    );
    layout("Edit profile", Some(viewer), &body)
}
