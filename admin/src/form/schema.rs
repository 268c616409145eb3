//! Declarative validation schemas.
//!
//! A [`Schema`] lists fields in order, each with rules evaluated in order.
//! The first failing rule is the field's error. Every rule except
//! [`Rule::Required`] passes on an empty value, so optional fields are
//! only checked once filled in.
//!
//! Text rules ignore file values and file rules ignore text values. That is
//! what lets an edit form keep the URL of an already uploaded image in a
//! file field.

use faraway_admin_api::FilePart;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Largest accepted upload
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image MIME types
pub const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

#[allow(clippy::expect_used)] // constant pattern, covered by tests
static SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new("^[a-z0-9-]+$").expect("slug pattern is valid"));

/// The value of one form field
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    /// Nothing entered
    #[default]
    Empty,
    /// Text input
    Text(String),
    /// A single chosen file
    File(FilePart),
    /// Several chosen files
    Files(Vec<FilePart>),
}

impl FieldValue {
    /// Whether the value counts as missing; blank text is missing
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::File(_) => false,
            Self::Files(files) => files.is_empty(),
        }
    }

    /// Trimmed text, `None` for files or blank text
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.trim()).filter(|t| !t.is_empty()),
            _ => None,
        }
    }

    /// Text exactly as entered, `None` for files
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Chosen files, empty for text
    #[must_use]
    pub fn files(&self) -> &[FilePart] {
        match self {
            Self::File(file) => std::slice::from_ref(file),
            Self::Files(files) => files,
            _ => &[],
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<FilePart> for FieldValue {
    fn from(file: FilePart) -> Self {
        Self::File(file)
    }
}

impl From<Vec<FilePart>> for FieldValue {
    fn from(files: Vec<FilePart>) -> Self {
        Self::Files(files)
    }
}

/// Values of a whole form, keyed by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues(BTreeMap<String, FieldValue>);

static EMPTY: FieldValue = FieldValue::Empty;

impl FormValues {
    /// No values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set)
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set one field
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Value of `name`, [`FieldValue::Empty`] when unset
    #[must_use]
    pub fn get(&self, name: &str) -> &FieldValue {
        self.0.get(name).unwrap_or(&EMPTY)
    }

    /// Trimmed text of `name`
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).text()
    }

    /// Trimmed text of `name`, owned
    #[must_use]
    pub fn owned_text(&self, name: &str) -> Option<String> {
        self.text(name).map(str::to_string)
    }

    /// First file chosen for `name`
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&FilePart> {
        self.get(name).files().first()
    }
}

/// One validation rule with the message shown when it fails
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must be present (non-blank text or at least one file)
    Required(String),
    /// Trimmed text has at least this many characters
    MinLen(usize, String),
    /// Trimmed text has at most this many characters
    MaxLen(usize, String),
    /// Text as entered matches the pattern; surrounding spaces fail it
    Pattern(Regex, String),
    /// Text is ASCII digits only
    Digits(String),
    /// Text is a non-negative decimal number
    Decimal(String),
    /// Text is an absolute `http`/`https` URL
    HttpUrl(String),
    /// Every file is at most this many bytes
    MaxFileSize(usize, String),
    /// Every file has one of these MIME types
    FileTypes(&'static [&'static str], String),
}

impl Rule {
    /// [`Rule::Required`]
    pub fn required(message: impl Into<String>) -> Self {
        Self::Required(message.into())
    }

    /// [`Rule::MinLen`]
    pub fn min_len(min: usize, message: impl Into<String>) -> Self {
        Self::MinLen(min, message.into())
    }

    /// [`Rule::MaxLen`]
    pub fn max_len(max: usize, message: impl Into<String>) -> Self {
        Self::MaxLen(max, message.into())
    }

    /// Lowercase letters, digits and hyphens
    pub fn slug() -> Self {
        Self::Pattern(
            SLUG.clone(),
            "Slug can only contain lowercase letters, numbers, and hyphens".to_string(),
        )
    }

    /// [`Rule::Digits`]
    pub fn digits(message: impl Into<String>) -> Self {
        Self::Digits(message.into())
    }

    /// [`Rule::Decimal`]
    pub fn decimal(message: impl Into<String>) -> Self {
        Self::Decimal(message.into())
    }

    /// [`Rule::HttpUrl`]
    pub fn http_url(message: impl Into<String>) -> Self {
        Self::HttpUrl(message.into())
    }

    /// Upload size limit of [`MAX_IMAGE_BYTES`]
    pub fn image_size() -> Self {
        Self::MaxFileSize(MAX_IMAGE_BYTES, "File size is too large".to_string())
    }

    /// Upload type limited to [`IMAGE_TYPES`]
    pub fn image_type() -> Self {
        Self::FileTypes(IMAGE_TYPES, "Unsupported file format".to_string())
    }

    /// The failure message, if `value` breaks this rule
    fn check(&self, value: &FieldValue) -> Option<&str> {
        let failed = match self {
            Self::Required(_) => value.is_blank(),
            _ if value.is_blank() => false,
            Self::MinLen(min, _) => value.text().is_some_and(|t| t.chars().count() < *min),
            Self::MaxLen(max, _) => value.text().is_some_and(|t| t.chars().count() > *max),
            Self::Pattern(pattern, _) => value.raw_text().is_some_and(|t| !pattern.is_match(t)),
            Self::Digits(_) => value.text().is_some_and(|t| !t.chars().all(|c| c.is_ascii_digit())),
            Self::Decimal(_) => value.text().is_some_and(|t| !is_decimal(t)),
            Self::HttpUrl(_) => value.text().is_some_and(|t| !crate::media::is_http_url(t)),
            Self::MaxFileSize(max, _) => value.files().iter().any(|f| f.size() > *max),
            Self::FileTypes(types, _) => value
                .files()
                .iter()
                .any(|f| !types.contains(&f.content_type.to_ascii_lowercase().as_str())),
        };
        failed.then(|| self.message())
    }

    fn message(&self) -> &str {
        match self {
            Self::Required(m)
            | Self::MinLen(_, m)
            | Self::MaxLen(_, m)
            | Self::Pattern(_, m)
            | Self::Digits(m)
            | Self::Decimal(m)
            | Self::HttpUrl(m)
            | Self::MaxFileSize(_, m)
            | Self::FileTypes(_, m) => m,
        }
    }
}

fn is_decimal(text: &str) -> bool {
    let mut parts = text.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();
    !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.is_none_or(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
}

/// A named field and its rules
#[derive(Debug, Clone)]
pub struct Field {
    /// Field name, also the key in [`FormValues`]
    pub name: &'static str,
    /// Rules in evaluation order
    pub rules: Vec<Rule>,
}

/// Ordered set of fields
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// No fields
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field
    #[must_use]
    pub fn field(mut self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push(Field {
            name,
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// Fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// First error for one field; unknown fields are always valid
    #[must_use]
    pub fn validate_field(&self, name: &str, value: &FieldValue) -> Option<String> {
        self.fields
            .iter()
            .find(|f| f.name == name)?
            .rules
            .iter()
            .find_map(|rule| rule.check(value))
            .map(str::to_string)
    }

    /// Every field's first error
    #[must_use]
    pub fn validate(&self, values: &FormValues) -> BTreeMap<&'static str, String> {
        self.fields
            .iter()
            .filter_map(|f| {
                self.validate_field(f.name, values.get(f.name))
                    .map(|error| (f.name, error))
            })
            .collect()
    }
}
