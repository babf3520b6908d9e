//! Newtype identifiers for the resources the engine manages.
//!
//! Streams, queries, and observers are addressed by name in the URL path. Each
//! kind of name is a distinct newtype so a [`QueryName`] cannot be passed where
//! a [`StreamName`] is expected, even though both are strings on the wire.
//!
//! The client does not track whether a name exists; that is entirely the
//! server's business. The only local rule is that a name must fit in a single
//! URL path segment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a string was rejected as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSegment {
    #[error("name is empty")]
    Empty,

    #[error("'{0}' is a relative path component")]
    DotSegment(String),

    #[error("'{name}' contains {found:?}, which cannot appear in a URL path segment")]
    ReservedCharacter {
        /// The rejected name.
        name: String,
        /// The first offending character.
        found: char,
    },
}

/// Checks that `value` can be placed verbatim between two `/` in a URL path.
///
/// Percent-escapes (`%2F`) are allowed and passed through untouched; the raw
/// characters `/`, `\`, `?`, `#`, whitespace, and control characters are not.
/// Neither are `.` and `..`, spelled plainly or with `%2e` escapes, since URL
/// parsers resolve those against the preceding path.
pub fn check_path_segment(value: &str) -> Result<(), InvalidSegment> {
    if value.is_empty() {
        return Err(InvalidSegment::Empty);
    }
    if is_dot_segment(value) {
        return Err(InvalidSegment::DotSegment(value.to_string()));
    }
    if let Some(found) = value
        .chars()
        .find(|c| matches!(c, '/' | '\\' | '?' | '#') || c.is_whitespace() || c.is_control())
    {
        return Err(InvalidSegment::ReservedCharacter {
            name: value.to_string(),
            found,
        });
    }
    Ok(())
}

/// `.` or `..`, where any dot may be written as `%2e` or `%2E`.
fn is_dot_segment(value: &str) -> bool {
    let unescaped = value.to_ascii_lowercase().replace("%2e", ".");
    unescaped == "." || unescaped == ".."
}

// ---------------------------------------------------------------------------
// Macro for path-segment newtypes.
// Generates: struct, parse() returning Result<Self, InvalidSegment>, as_str(),
// Display, TryFrom<&str>.
// ---------------------------------------------------------------------------
macro_rules! segment_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, rejecting values that are not a single
            /// URL path segment.
            pub fn parse(value: impl Into<String>) -> Result<Self, InvalidSegment> {
                let v = value.into();
                check_path_segment(&v)?;
                Ok(Self(v))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = InvalidSegment;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidSegment;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

segment_id! {
    /// Name of an RDF stream registered with the engine (`/streams/{name}`).
    ///
    /// Distinct from the stream's IRI, which travels in the request body.
    StreamName
}

segment_id! {
    /// Name of a continuous query registered with the engine (`/queries/{name}`).
    QueryName
}

segment_id! {
    /// Server-assigned identifier of a result observer, scoped under a query
    /// (`/queries/{name}/observers/{id}`).
    ObserverId
}
