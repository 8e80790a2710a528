use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// A user row as the identity provider left it. `name` and `image` may be unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) name: Option<String>,
    pub(crate) image: Option<String>,
}

/// Public projection of a user. Every field is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Author {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) image: String,
}

impl TryFrom<User> for Author {
    type Error = DomainError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        match (user.name, user.image) {
            (Some(name), Some(image)) => Ok(Self {
                id: user.id,
                name,
                image,
            }),
            _ => Err(DomainError::IntegrityFault(format!(
                "user {} is missing name or image",
                user.id
            ))),
        }
    }
}

pub(crate) fn require_identifier(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation {
            field,
            message: "must not be empty",
        });
    }
    Ok(())
}
