// ── Submission draft ──
//
// The transient, never-persisted form state for a new entry, plus the
// schema check that turns it into a `NewWebsite`.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use strum::{Display, EnumIter};
use url::Url;

use crate::error::CoreError;
use crate::model::{Category, CategoryId, NewWebsite, PageMetadata};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Form fields in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
pub enum FormField {
    #[strum(serialize = "URL")]
    Url,
    Title,
    Description,
    Category,
    Thumbnail,
}

impl FormField {
    /// Following field in form order, wrapping to the first.
    pub fn next(self) -> Self {
        match self {
            Self::Url => Self::Title,
            Self::Title => Self::Description,
            Self::Description => Self::Category,
            Self::Category => Self::Thumbnail,
            Self::Thumbnail => Self::Url,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Url => Self::Thumbnail,
            Self::Title => Self::Url,
            Self::Description => Self::Title,
            Self::Category => Self::Description,
            Self::Thumbnail => Self::Category,
        }
    }

    pub fn is_required(self) -> bool {
        self != Self::Thumbnail
    }
}

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Draft of a website entry prior to submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebsiteDraft {
    pub url: String,
    pub title: String,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub thumbnail: String,
}

impl WebsiteDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Auto-fill is offered only for URLs with a web scheme.
    pub fn can_autofill(&self) -> bool {
        let url = self.url.trim();
        url.starts_with("http://") || url.starts_with("https://")
    }

    /// Overwrite only the fields the metadata service returned.
    ///
    /// `image` lands in the thumbnail. Returns the fields that changed.
    pub fn apply_metadata(&mut self, meta: &PageMetadata) -> Vec<FormField> {
        let mut touched = Vec::new();
        if let Some(title) = &meta.title {
            self.title.clone_from(title);
            touched.push(FormField::Title);
        }
        if let Some(description) = &meta.description {
            self.description.clone_from(description);
            touched.push(FormField::Description);
        }
        if let Some(image) = &meta.image {
            self.thumbnail.clone_from(image);
            touched.push(FormField::Thumbnail);
        }
        touched
    }

    /// Check the draft against the loaded categories.
    ///
    /// A missing category is reported as [`CoreError::CategoryRequired`]
    /// ahead of any schema error.
    pub fn validate(&self, categories: &[Arc<Category>]) -> Result<NewWebsite, CoreError> {
        let Some(category_id) = self.category_id else {
            return Err(CoreError::CategoryRequired);
        };

        let errors = self.field_errors(categories);
        if !errors.is_empty() {
            return Err(CoreError::Invalid { errors });
        }

        let thumbnail = self.thumbnail.trim();
        Ok(NewWebsite {
            title: self.title.trim().to_owned(),
            url: self.url.trim().to_owned(),
            description: self.description.trim().to_owned(),
            category_id,
            thumbnail: (!thumbnail.is_empty()).then(|| thumbnail.to_owned()),
        })
    }

    /// Every schema violation, in field order.
    pub fn field_errors(&self, categories: &[Arc<Category>]) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if let Err(msg) = check_web_url(self.url.trim()) {
            errors.push(FieldError::new(FormField::Url, msg));
        }

        check_text(&mut errors, FormField::Title, &self.title, TITLE_MAX_CHARS);
        check_text(
            &mut errors,
            FormField::Description,
            &self.description,
            DESCRIPTION_MAX_CHARS,
        );

        match self.category_id {
            None => errors.push(FieldError::new(FormField::Category, "is required")),
            Some(id) if !categories.iter().any(|c| c.id == id) => {
                errors.push(FieldError::new(FormField::Category, "is not a known category"));
            }
            Some(_) => {}
        }

        let thumbnail = self.thumbnail.trim();
        if !thumbnail.is_empty() {
            if let Err(msg) = check_web_url(thumbnail) {
                errors.push(FieldError::new(FormField::Thumbnail, msg));
            }
        }

        errors
    }
}

fn check_text(errors: &mut Vec<FieldError>, field: FormField, value: &str, max: usize) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, "is required"));
    } else if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
}

fn check_web_url(raw: &str) -> Result<(), &'static str> {
    if raw.is_empty() {
        return Err("is required");
    }
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        Ok(_) => Err("must be an http or https URL"),
        Err(_) => Err("is not a valid URL"),
    }
}
