//! Identifier definition macros for logicgraph
//!
//! Every entity in a circuit is addressed by an opaque string id. These macros generate the
//! newtype wrappers so node, port and wire ids can never be mixed up.

/// Macro for declaring a string-backed identifier newtype
///
/// # Example
/// ```rust,ignore
/// string_id!(
///     /// Identifier of a node
///     NodeId
/// );
/// let id = NodeId::from("and-1");
/// assert_eq!(id.as_str(), "and-1");
/// ```
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an id from any string-like value
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the raw id string
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the id is the empty string
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}
