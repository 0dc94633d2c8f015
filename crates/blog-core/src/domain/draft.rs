//! User-submitted changes, validated before they touch an entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

const MAX_TITLE_LEN: usize = 256;
const MAX_USERNAME_LEN: usize = 150;
const MAX_NAME_LEN: usize = 150;
const MIN_PASSWORD_LEN: usize = 8;

/// Fields an author may set on a post.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub is_published: bool,
}

impl PostDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("Title is required".into()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "Title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if self.text.trim().is_empty() {
            return Err(DomainError::Validation("Text is required".into()));
        }
        if self.category_id.is_none() {
            return Err(DomainError::Validation("Category is required".into()));
        }
        if matches!(&self.image, Some(image) if image.trim().is_empty()) {
            return Err(DomainError::Validation("Image reference is empty".into()));
        }
        Ok(())
    }
}

/// Comment body as submitted.
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub text: String,
}

impl CommentDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.text.trim().is_empty() {
            return Err(DomainError::Validation("Comment text is required".into()));
        }
        Ok(())
    }
}

/// Editable profile fields of the signed-in user.
#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl ProfileChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        if self.first_name.chars().count() > MAX_NAME_LEN
            || self.last_name.chars().count() > MAX_NAME_LEN
        {
            return Err(DomainError::Validation(format!(
                "Names must be at most {MAX_NAME_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Sign-up data.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewAccount {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Letters, digits and `@.+-_`, at most 150 characters.
fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
        return Err(DomainError::Validation(format!(
            "Username must be 1 to {MAX_USERNAME_LEN} characters"
        )));
    }
    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if !valid {
        return Err(DomainError::Validation(
            "Username may contain only letters, digits and @/./+/-/_".into(),
        ));
    }
    Ok(())
}

/// Empty is allowed; anything else needs a local part and a domain.
fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.is_empty() {
        return Ok(());
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(DomainError::Validation("Invalid email address".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PostDraft {
        PostDraft {
            title: "Hello".into(),
            text: "World".into(),
            pub_date: Utc::now(),
            image: None,
            location_id: None,
            category_id: Some(Uuid::new_v4()),
            is_published: true,
        }
    }

    #[test]
    fn test_post_draft_requires_title_text_and_category() {
        assert!(draft().validate().is_ok());

        let mut blank_title = draft();
        blank_title.title = "   ".into();
        assert!(matches!(blank_title.validate(), Err(DomainError::Validation(_))));

        let mut blank_text = draft();
        blank_text.text = String::new();
        assert!(blank_text.validate().is_err());

        let mut no_category = draft();
        no_category.category_id = None;
        assert!(no_category.validate().is_err());
    }

    #[test]
    fn test_post_draft_title_length() {
        let mut long = draft();
        long.title = "x".repeat(257);
        assert!(long.validate().is_err());
        long.title = "x".repeat(256);
        assert!(long.validate().is_ok());
    }

    #[test]
    fn test_comment_draft_rejects_blank() {
        assert!(CommentDraft { text: "nice".into() }.validate().is_ok());
        assert!(CommentDraft { text: " \n".into() }.validate().is_err());
    }

    #[test]
    fn test_profile_changes_username_and_email() {
        let mut changes = ProfileChanges {
            username: "alice.w+blog".into(),
            email: String::new(),
            first_name: "Alice".into(),
            last_name: String::new(),
        };
        assert!(changes.validate().is_ok());

        changes.email = "alice@example.com".into();
        assert!(changes.validate().is_ok());

        changes.email = "not-an-email".into();
        assert!(changes.validate().is_err());

        changes.email = String::new();
        changes.username = "alice smith".into();
        assert!(changes.validate().is_err());
    }

    #[test]
    fn test_new_account_password_length() {
        let account = NewAccount {
            username: "bob".into(),
            email: "bob@example.com".into(),
            password: "short".into(),
        };
        assert!(account.validate().is_err());

        let account = NewAccount {
            password: "long-enough".into(),
            ..account
        };
        assert!(account.validate().is_ok());
    }
}
