use core::fmt;
use std::string::String;

/// A formatted resource identifier: `tag`, [`SEPARATOR`], then the short
/// code.
///
/// [`SEPARATOR`]: crate::SEPARATOR
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId {
    value: String,
    tag_len: usize,
}

impl ResourceId {
    pub(crate) fn from_parts(tag: &str, code: &str) -> Self {
        let mut value = String::with_capacity(tag.len() + 1 + code.len());
        value.push_str(tag);
        value.push(crate::SEPARATOR);
        value.push_str(code);
        Self {
            value,
            tag_len: tag.len(),
        }
    }

    /// The resource tag, e.g. `mu`.
    pub fn tag(&self) -> &str {
        &self.value[..self.tag_len]
    }

    /// The short code after the separator.
    pub fn code(&self) -> &str {
        &self.value[self.tag_len + 1..]
    }

    /// The full identifier.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consumes the identifier, returning the full string.
    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.value
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}
