//! Field rules for a registration submission.
//!
//! Every rule runs; failures are collected in field order rather than
//! stopping at the first one.

use super::checksum::is_valid_identity_number;
use super::error::FieldError;
use super::messages;
use super::subjects::{normalize_subjects, SubjectsInput};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use email_address::EmailAddress;

/// Text fields of the registration form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub citizen_id: Option<String>,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub education_level: Option<String>,
    pub school: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub exam_center: Option<String>,
    pub subjects: SubjectsInput,
}

impl RegistrationForm {
    /// Record a text field by its wire name.
    ///
    /// Returns `false` for names the form does not know; those are ignored.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "citizenId" => &mut self.citizen_id,
            "title" => &mut self.title,
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "birthDate" => &mut self.birth_date,
            "educationLevel" => &mut self.education_level,
            "school" => &mut self.school,
            "address" => &mut self.address,
            "phone" => &mut self.phone,
            "email" => &mut self.email,
            "examCenter" => &mut self.exam_center,
            "subjects" | "subjects[]" => {
                self.subjects.push(value);
                return true;
            }
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// A form that passed every field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub citizen_id: String,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub education_level: String,
    pub school: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub exam_center: String,
    pub subjects: Vec<String>,
}

/// Apply all field rules, returning every failure in field order.
pub fn validate_form(form: &RegistrationForm) -> Result<ValidatedForm, Vec<FieldError>> {
    let mut errors = Vec::new();

    let citizen_id = check(
        &mut errors,
        "citizenId",
        &form.citizen_id,
        messages::INVALID_IDENTITY_NUMBER,
        |v| is_valid_identity_number(v).then(|| v.to_string()),
    );
    let title = required(&mut errors, "title", &form.title);
    let first_name = required(&mut errors, "firstName", &form.first_name);
    let last_name = required(&mut errors, "lastName", &form.last_name);
    let birth_date = check(
        &mut errors,
        "birthDate",
        &form.birth_date,
        messages::INVALID_VALUE,
        parse_birth_date,
    );
    let education_level = required(&mut errors, "educationLevel", &form.education_level);
    let school = required(&mut errors, "school", &form.school);
    let address = required(&mut errors, "address", &form.address);
    let phone = check(&mut errors, "phone", &form.phone, messages::INVALID_VALUE, |v| {
        is_valid_phone(v).then(|| v.to_string())
    });
    let email = check(&mut errors, "email", &form.email, messages::INVALID_VALUE, |v| {
        is_valid_email(v).then(|| v.to_string())
    });
    let exam_center = required(&mut errors, "examCenter", &form.exam_center);
    let subjects = normalize_subjects(&form.subjects).map_err(|e| errors.push(e)).ok();

    match (
        citizen_id,
        title,
        first_name,
        last_name,
        birth_date,
        education_level,
        school,
        address,
        phone,
        email,
        exam_center,
        subjects,
    ) {
        (
            Some(citizen_id),
            Some(title),
            Some(first_name),
            Some(last_name),
            Some(birth_date),
            Some(education_level),
            Some(school),
            Some(address),
            Some(phone),
            Some(email),
            Some(exam_center),
            Some(subjects),
        ) if errors.is_empty() => Ok(ValidatedForm {
            citizen_id,
            title,
            first_name,
            last_name,
            birth_date,
            education_level,
            school,
            address,
            phone,
            email,
            exam_center,
            subjects,
        }),
        _ => Err(errors),
    }
}

fn check<T>(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &Option<String>,
    message: &str,
    rule: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    let parsed = value.as_deref().and_then(rule);
    if parsed.is_none() {
        errors.push(FieldError::body(field, message, value.as_deref()));
    }
    parsed
}

fn required(errors: &mut Vec<FieldError>, field: &str, value: &Option<String>) -> Option<String> {
    check(errors, field, value, messages::INVALID_VALUE, |v| {
        (!v.is_empty()).then(|| v.to_string())
    })
}

/// Local phone number: `0` followed by 8 or 9 ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    let bytes = phone.as_bytes();
    matches!(bytes.len(), 9 | 10) && bytes[0] == b'0' && bytes.iter().all(u8::is_ascii_digit)
}

/// Syntactically valid address with a dotted domain and no display text.
///
/// The top-level label must be at least two characters.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(|c| c.is_whitespace() || c == '<' || c == '>') {
        return false;
    }
    match EmailAddress::parse_with_options(email, Default::default()) {
        Ok(addr) => {
            let domain = addr.domain();
            let top_level = domain.rsplit('.').next().unwrap_or_default();
            domain.contains('.') && !domain.starts_with('.') && top_level.chars().count() >= 2
        }
        Err(_) => false,
    }
}

/// Parse an ISO-8601 date or date-time, keeping the calendar date.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegistrationForm {
        let mut form = RegistrationForm::default();
        for (name, value) in [
            ("citizenId", "1234567890121"),
            ("title", "นางสาว"),
            ("firstName", "Malee"),
            ("lastName", "Srisuk"),
            ("birthDate", "2006-11-30"),
            ("educationLevel", "M.6"),
            ("school", "Satri Witthaya"),
            ("address", "99 Rama IV Rd, Bangkok"),
            ("phone", "0891234567"),
            ("email", "malee@example.co.th"),
            ("examCenter", "Chulalongkorn"),
            ("subjects", "คณิตศาสตร์,เคมี"),
        ] {
            assert!(form.set_field(name, value.to_string()));
        }
        form
    }

    fn paths(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().filter_map(FieldError::field).collect()
    }

    #[test]
    fn test_valid_form_passes() {
        let valid = validate_form(&valid_form()).unwrap();
        assert_eq!(valid.citizen_id, "1234567890121");
        assert_eq!(valid.birth_date, NaiveDate::from_ymd_opt(2006, 11, 30).unwrap());
        assert_eq!(valid.subjects, vec!["คณิตศาสตร์".to_string(), "เคมี".to_string()]);
    }

    #[test]
    fn test_empty_form_reports_every_field_in_order() {
        let errors = validate_form(&RegistrationForm::default()).unwrap_err();
        assert_eq!(
            paths(&errors),
            vec![
                "citizenId",
                "title",
                "firstName",
                "lastName",
                "birthDate",
                "educationLevel",
                "school",
                "address",
                "phone",
                "email",
                "examCenter",
                "subjects",
            ]
        );
    }

    #[test]
    fn test_bad_checksum_uses_identity_message() {
        let mut form = valid_form();
        form.set_field("citizenId", "1234567890122".into());
        let errors = validate_form(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, messages::INVALID_IDENTITY_NUMBER);
        assert_eq!(errors[0].value.as_deref(), Some("1234567890122"));
    }

    #[test]
    fn test_collects_independent_failures() {
        let mut form = valid_form();
        form.set_field("phone", "812345678".into());
        form.set_field("email", "not-an-email".into());
        form.set_field("title", String::new());
        let errors = validate_form(&form).unwrap_err();
        assert_eq!(paths(&errors), vec!["title", "phone", "email"]);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut form = valid_form();
        assert!(!form.set_field("nickname", "Mali".into()));
        assert!(validate_form(&form).is_ok());
    }

    #[test]
    fn test_phone_pattern() {
        assert!(is_valid_phone("021234567"));
        assert!(is_valid_phone("0812345678"));
        assert!(!is_valid_phone("08123456789"));
        assert!(!is_valid_phone("02123456"));
        assert!(!is_valid_phone("1812345678"));
        assert!(!is_valid_phone("08-1234567"));
        assert!(!is_valid_phone("๐๘๑๒๓๔๕๖๗๘"));
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("a@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.ac.th"));
        assert!(!is_valid_email("a@localhost"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email("a@example."));
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@@example.com"));
        assert!(!is_valid_email("Name <a@example.com>"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_birth_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2001, 2, 3);
        assert_eq!(parse_birth_date("2001-02-03"), expected);
        assert_eq!(parse_birth_date("2001-02-03T04:05:06Z"), expected);
        assert_eq!(parse_birth_date("2001-02-03T04:05:06+07:00"), expected);
        assert_eq!(parse_birth_date("2001-02-03T04:05:06.250"), expected);
        assert_eq!(parse_birth_date("03/02/2001"), None);
        assert_eq!(parse_birth_date("2001-02-30"), None);
        assert_eq!(parse_birth_date(""), None);
    }

    #[test]
    fn test_repeated_subjects_become_list() {
        let mut form = valid_form();
        form.subjects = SubjectsInput::Missing;
        form.set_field("subjects", "Math".into());
        form.set_field("subjects[]", "Physics".into());
        let valid = validate_form(&form).unwrap();
        assert_eq!(valid.subjects, vec!["Math".to_string(), "Physics".to_string()]);
    }
}
