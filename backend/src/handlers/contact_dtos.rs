use serde::{Deserialize, Serialize};

use crate::utils::sanitize::{clean_email, clean_text};

/// Form fields as posted by the site. Every field defaults to empty so a
/// missing field is reported as missing rather than as a parse failure.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct RawSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
}

impl RawSubmission {
    pub fn clean(&self) -> Submission {
        Submission {
            name: clean_text(&self.name),
            email: clean_email(&self.email),
            phone: clean_text(&self.phone),
            service: clean_text(&self.service),
            message: clean_text(&self.message),
        }
    }
}

impl Submission {
    pub fn has_required_fields(&self) -> bool {
        [&self.name, &self.email, &self.phone, &self.service]
            .iter()
            .all(|field| !field.is_empty())
    }
}
