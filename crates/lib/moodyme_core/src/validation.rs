//! Input validation for operator-submitted forms.
//!
//! Each check returns every problem found; [`into_result`] joins them into a
//! single message.

use crate::models::content::ContentUpdate;
use crate::models::user::{ClaimsUpdate, NewUser};

/// Maximum length of an email address.
pub const MAX_EMAIL_LEN: usize = 254;
pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Check the shape of an email address.
pub fn email_error(email: &str) -> Option<String> {
    let email = email.trim();
    if email.is_empty() {
        return Some("Email is required".into());
    }
    if email.len() > MAX_EMAIL_LEN {
        return Some(format!("Email must be at most {MAX_EMAIL_LEN} characters"));
    }
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    (!well_formed).then(|| "Invalid email address".to_string())
}

fn name_error(label: &str, value: &str) -> Option<String> {
    (value.trim().chars().count() < MIN_NAME_LEN)
        .then(|| format!("{label} must be at least {MIN_NAME_LEN} characters"))
}

/// Problems with a new account request.
pub fn new_user_errors(user: &NewUser) -> Vec<String> {
    let mut errors = Vec::new();
    errors.extend(email_error(&user.email));
    errors.extend(name_error("First name", &user.first_name));
    errors.extend(name_error("Last name", &user.last_name));
    if user.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    errors
}

/// Problems with a name update; absent fields are not checked.
pub fn name_update_errors(update: &ClaimsUpdate) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(first) = &update.first_name {
        errors.extend(name_error("First name", first));
    }
    if let Some(last) = &update.last_name {
        errors.extend(name_error("Last name", last));
    }
    errors
}

/// Problems with a content update; absent fields are not checked.
pub fn content_update_errors(update: &ContentUpdate) -> Vec<String> {
    let mut errors = Vec::new();
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        errors.push("Title is required".into());
    }
    if update.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
        errors.push("Content is required".into());
    }
    errors
}

/// `Ok` when there are no errors, else all messages joined.
pub fn into_result(errors: Vec<String>) -> Result<(), String> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert_eq!(email_error("ada@moodyme.app"), None);
        assert!(email_error("").is_some());
        assert!(email_error("ada").is_some());
        assert!(email_error("@moodyme.app").is_some());
        assert!(email_error("ada@").is_some());
        assert!(email_error("a@b@c").is_some());
        assert!(email_error("a da@moodyme.app").is_some());
        assert!(email_error(&format!("{}@x.io", "a".repeat(260))).is_some());
    }

    #[test]
    fn new_user_reports_every_problem() {
        let errors = new_user_errors(&NewUser {
            email: "nope".into(),
            first_name: "A".into(),
            last_name: "Lovelace".into(),
            password: "short".into(),
            role: None,
        });
        assert_eq!(errors.len(), 3);
        let message = into_result(errors).unwrap_err();
        assert!(message.contains("First name"));
        assert!(message.contains("Password"));
    }

    #[test]
    fn partial_updates_only_check_present_fields() {
        assert!(name_update_errors(&ClaimsUpdate::default()).is_empty());
        assert_eq!(
            name_update_errors(&ClaimsUpdate {
                first_name: Some(" ".into()),
                last_name: None,
            })
            .len(),
            1
        );
        assert!(content_update_errors(&ContentUpdate::deactivate()).is_empty());
        assert_eq!(
            content_update_errors(&ContentUpdate {
                title: Some(String::new()),
                content: Some("\n".into()),
                is_active: None,
            })
            .len(),
            2
        );
    }
}
