//! Declarative form definitions.
//!
//! Each form lists its fields in display order together with the validators
//! that run against the submitted value. Validation never touches the
//! database; uniqueness is left to the storage layer.

use crate::entities::{message, user};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Value must contain something other than whitespace. A failure skips
    /// the remaining validators of the field.
    DataRequired,
    Email,
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
}

impl Validator {
    pub fn check(&self, value: &str) -> Result<(), String> {
        match *self {
            Validator::DataRequired => {
                if value.trim().is_empty() {
                    return Err("This field is required.".to_string());
                }
            }
            Validator::Email => {
                if !EMAIL_RE.is_match(value) {
                    return Err("Invalid email address.".to_string());
                }
            }
            Validator::Length { min, max } => {
                let len = value.chars().count();
                let message = match (min, max) {
                    (Some(lo), Some(hi)) if len < lo || len > hi => Some(format!(
                        "Field must be between {} and {} characters long.",
                        lo, hi
                    )),
                    (Some(lo), None) if len < lo => {
                        Some(format!("Field must be at least {} characters long.", lo))
                    }
                    (None, Some(hi)) if len > hi => {
                        Some(format!("Field cannot be longer than {} characters.", hi))
                    }
                    _ => None,
                };
                if let Some(message) = message {
                    return Err(message);
                }
            }
        }
        Ok(())
    }

    fn stops_chain(&self) -> bool {
        matches!(self, Validator::DataRequired)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Password,
    TextArea,
}

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub validators: &'static [Validator],
}

/// Per-field error messages, in field order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors {
    fields: Vec<(&'static str, Vec<String>)>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field, vec![message])),
        }
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn has(&self, name: &str) -> bool {
        !self.field(name).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.fields.iter().map(|(name, m)| (*name, m.as_slice()))
    }
}

pub trait Form {
    const TITLE: &'static str;
    const FIELDS: &'static [Field];

    fn value(&self, name: &str) -> &str;

    /// Runs every field's validators; any failure rejects the whole form.
    fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        for field in Self::FIELDS {
            let value = self.value(field.name);
            for validator in field.validators {
                if let Err(message) = validator.check(value) {
                    errors.add(field.name, message);
                    if validator.stops_chain() {
                        break;
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Empty optional inputs mean "not provided".
pub fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(default)]
pub struct MessageForm {
    pub text: String,
}

impl Form for MessageForm {
    const TITLE: &'static str = "Add my message!";
    const FIELDS: &'static [Field] = &[Field {
        name: "text",
        label: "What's happening?",
        kind: FieldKind::TextArea,
        validators: &[
            Validator::DataRequired,
            Validator::Length {
                min: None,
                max: Some(message::MAX_TEXT_LEN),
            },
        ],
    }];

    fn value(&self, name: &str) -> &str {
        match name {
            "text" => &self.text,
            _ => "",
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(default)]
pub struct UserAddForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: String,
}

impl Form for UserAddForm {
    const TITLE: &'static str = "Sign me up!";
    const FIELDS: &'static [Field] = &[
        Field {
            name: "username",
            label: "Username",
            kind: FieldKind::Text,
            validators: &[Validator::DataRequired],
        },
        Field {
            name: "email",
            label: "E-mail",
            kind: FieldKind::Text,
            validators: &[Validator::DataRequired, Validator::Email],
        },
        Field {
            name: "password",
            label: "Password",
            kind: FieldKind::Password,
            validators: &[Validator::Length {
                min: Some(6),
                max: None,
            }],
        },
        Field {
            name: "image_url",
            label: "(Optional) Image URL",
            kind: FieldKind::Text,
            validators: &[],
        },
    ];

    fn value(&self, name: &str) -> &str {
        match name {
            "username" => &self.username,
            "email" => &self.email,
            "password" => &self.password,
            "image_url" => &self.image_url,
            _ => "",
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl Form for LoginForm {
    const TITLE: &'static str = "Log in";
    const FIELDS: &'static [Field] = &[
        Field {
            name: "username",
            label: "Username",
            kind: FieldKind::Text,
            validators: &[Validator::DataRequired],
        },
        Field {
            name: "password",
            label: "Password",
            kind: FieldKind::Password,
            validators: &[Validator::Length {
                min: Some(6),
                max: None,
            }],
        },
    ];

    fn value(&self, name: &str) -> &str {
        match name {
            "username" => &self.username,
            "password" => &self.password,
            _ => "",
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(default)]
pub struct EditUserForm {
    pub username: String,
    pub email: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: String,
    pub location: String,
    pub password: String,
}

impl EditUserForm {
    /// Prefills everything except the confirmation password.
    pub fn from_user(user: &user::Model) -> Self {
        EditUserForm {
            username: user.username.clone(),
            email: user.email.clone(),
            image_url: user.image_url.clone(),
            header_image_url: user.header_image_url.clone(),
            bio: user.bio.clone().unwrap_or_default(),
            location: user.location.clone().unwrap_or_default(),
            password: String::new(),
        }
    }
}

impl Form for EditUserForm {
    const TITLE: &'static str = "Edit this user!";
    const FIELDS: &'static [Field] = &[
        Field {
            name: "username",
            label: "Username",
            kind: FieldKind::Text,
            validators: &[Validator::DataRequired],
        },
        Field {
            name: "email",
            label: "Email",
            kind: FieldKind::Text,
            validators: &[Validator::DataRequired, Validator::Email],
        },
        Field {
            name: "image_url",
            label: "Image URL",
            kind: FieldKind::Text,
            validators: &[Validator::DataRequired],
        },
        Field {
            name: "header_image_url",
            label: "Header Image URL",
            kind: FieldKind::Text,
            validators: &[Validator::DataRequired],
        },
        Field {
            name: "bio",
            label: "Bio",
            kind: FieldKind::TextArea,
            validators: &[Validator::DataRequired],
        },
        Field {
            name: "location",
            label: "Location",
            kind: FieldKind::Text,
            validators: &[],
        },
        Field {
            name: "password",
            label: "Password",
            kind: FieldKind::Password,
            validators: &[Validator::DataRequired],
        },
    ];

    fn value(&self, name: &str) -> &str {
        match name {
            "username" => &self.username,
            "email" => &self.email,
            "image_url" => &self.image_url,
            "header_image_url" => &self.header_image_url,
            "bio" => &self.bio,
            "location" => &self.location,
            "password" => &self.password,
            _ => "",
        }
    }
}
