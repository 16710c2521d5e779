use crate::errors::AppError;
use crate::models::application::NewApplication;

/// Text fields as they arrive in the multipart body, trimmed but otherwise raw.
#[derive(Debug, Default, Clone)]
pub struct RawApplicantFields {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub degree: Option<String>,
    pub college: Option<String>,
    pub video_assessment: Option<String>,
}

impl RawApplicantFields {
    /// Records a text field by its form name. Returns `false` for names the
    /// form does not carry.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let value = Some(value.trim().to_string());
        match name {
            "full_name" => self.full_name = value,
            "email" => self.email = value,
            "mobile" => self.mobile = value,
            "degree" => self.degree = value,
            "college" => self.college = value,
            "video_assessment" => self.video_assessment = value,
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicantFields {
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub degree: String,
    pub college: String,
    pub video_assessment: Option<String>,
}

impl ApplicantFields {
    pub fn into_new_application(self, resume_path: String) -> NewApplication {
        NewApplication {
            full_name: self.full_name,
            email: self.email,
            mobile: self.mobile,
            degree: self.degree,
            college: self.college,
            video_assessment: self.video_assessment,
            resume_path,
        }
    }
}

/// Checks required fields, then email and mobile format.
///
/// Required fields are checked in form order so the first missing one is
/// reported. `video_assessment` is optional; blank becomes `None`.
pub fn validate_fields(raw: RawApplicantFields) -> Result<ApplicantFields, AppError> {
    let full_name = require("full_name", raw.full_name)?;
    let email = require("email", raw.email)?;
    let mobile = require("mobile", raw.mobile)?;
    let degree = require("degree", raw.degree)?;
    let college = require("college", raw.college)?;

    if !is_valid_email(&email) {
        return Err(AppError::Validation(
            "Please enter a valid email address.".to_string(),
        ));
    }
    if !is_valid_mobile(&mobile) {
        return Err(AppError::Validation(
            "Please enter a valid mobile number.".to_string(),
        ));
    }

    Ok(ApplicantFields {
        full_name,
        email,
        mobile,
        degree,
        college,
        video_assessment: raw.video_assessment.filter(|v| !v.is_empty()),
    })
}

fn require(name: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("Field '{name}' is required"))),
    }
}

/// Accepts `local@domain.tld`: one `@`, no whitespace, and a dot inside the
/// domain that is neither its first nor its last character.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || domain.len() < 3 {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1)
}

/// Digits only, at least ten of them.
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() >= 10 && mobile.chars().all(|c| c.is_ascii_digit())
}
