use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("phone pattern compiles"));

const MIN_PHONE_DIGITS: usize = 10;
const MIN_NAME_CHARS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Service,
    Message,
    Privacy,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Service => "service",
            Field::Message => "message",
            Field::Privacy => "privacy",
        }
    }

    /// Fields the form cannot be sent without.
    pub fn is_required(self) -> bool {
        matches!(self, Field::Name | Field::Email | Field::Phone | Field::Service)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    MissingField,
    InvalidEmail,
    InvalidPhone,
    TooShort,
    ConsentRequired,
}

impl ValidationError {
    pub fn message(self) -> &'static str {
        match self {
            ValidationError::MissingField => "Este campo es obligatorio",
            ValidationError::InvalidEmail => "Ingresa un email válido",
            ValidationError::InvalidPhone => "Ingresa un teléfono válido",
            ValidationError::TooShort => "El nombre debe tener al menos 2 caracteres",
            ValidationError::ConsentRequired => "Debes aceptar la política de privacidad",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub kind: ValidationError,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FormValues {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
    /// `None` when the form has no consent checkbox.
    #[serde(skip)]
    pub consent: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: Field) -> Option<ValidationError> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.kind)
    }

    pub fn has(&self, kind: ValidationError) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
        && value.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_PHONE_DIGITS
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Checks one text field. Format rules only apply to non-empty values; an
/// empty optional field is fine.
pub fn validate_field(field: Field, raw: &str) -> Option<ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return field.is_required().then_some(ValidationError::MissingField);
    }
    match field {
        Field::Email if !is_valid_email(value) => Some(ValidationError::InvalidEmail),
        Field::Phone if !is_valid_phone(value) => Some(ValidationError::InvalidPhone),
        Field::Name if value.chars().count() < MIN_NAME_CHARS => Some(ValidationError::TooShort),
        _ => None,
    }
}

pub fn validate_consent(consent: Option<bool>) -> Option<ValidationError> {
    match consent {
        Some(false) => Some(ValidationError::ConsentRequired),
        _ => None,
    }
}

/// Runs every rule over the whole form; all must pass.
pub fn validate(values: &FormValues) -> ValidationResult {
    let fields = [
        (Field::Name, &values.name),
        (Field::Email, &values.email),
        (Field::Phone, &values.phone),
        (Field::Service, &values.service),
        (Field::Message, &values.message),
    ];
    let mut errors: Vec<FieldError> = fields
        .iter()
        .filter_map(|(field, value)| {
            validate_field(*field, value).map(|kind| FieldError { field: *field, kind })
        })
        .collect();
    if let Some(kind) = validate_consent(values.consent) {
        errors.push(FieldError { field: Field::Privacy, kind });
    }
    ValidationResult { errors }
}
