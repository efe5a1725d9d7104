use core::fmt;
use std::{borrow::Cow, string::String};

use crate::error::{Error, Result};

/// Separator between the tag and the code in a [`ResourceId`].
///
/// [`ResourceId`]: crate::ResourceId
pub const SEPARATOR: char = '-';

/// A short prefix naming the kind of resource an identifier belongs to.
///
/// ```
/// use ridgen::ResourceTag;
///
/// assert_eq!(ResourceTag::USER.as_str(), "mu");
/// assert_eq!(ResourceTag::new("org").unwrap().to_string(), "org");
/// assert!(ResourceTag::new("my-org").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceTag(Cow<'static, str>);

impl ResourceTag {
    /// Users.
    pub const USER: Self = Self(Cow::Borrowed("mu"));

    /// Validates a custom tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTag`] if the tag is empty, contains the
    /// [`SEPARATOR`], or contains whitespace or control characters.
    pub fn new(tag: impl Into<Cow<'static, str>>) -> Result<Self> {
        let tag = tag.into();
        let reason = if tag.is_empty() {
            Some("tag is empty")
        } else if tag.contains(SEPARATOR) {
            Some("tag contains the separator")
        } else if tag.chars().any(|c| c.is_whitespace() || c.is_control()) {
            Some("tag contains whitespace or control characters")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidTag {
                tag: String::from(tag),
                reason,
            }),
            None => Ok(Self(tag)),
        }
    }

    /// The tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the tag in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a validated tag.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceTag {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
