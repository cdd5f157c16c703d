//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. The backend issues
//! opaque string identifiers, so the wrapper holds a `String`.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `From<$name> for String`
///
/// # Example
///
/// ```rust
/// # use pet_haven_core::define_id;
/// define_id!(UserId);
/// define_id!(PetId);
///
/// let user_id = UserId::new("66b2f0c1a9");
/// let pet_id = PetId::new("66b2f0c1a9");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = pet_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(UserId);
define_id!(PetId);
define_id!(VendorApplicationId);
define_id!(AdoptionRequestId);
define_id!(BlogId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = PetId::new("66b2f0c1a9");
        assert_eq!(id.to_string(), "66b2f0c1a9");
        assert_eq!(id.as_str(), "66b2f0c1a9");
    }

    #[test]
    fn test_id_conversions() {
        let id: UserId = "abc123".into();
        let s: String = id.clone().into();
        assert_eq!(s, "abc123");
        assert_eq!(id, UserId::from(String::from("abc123")));
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = BlogId::new("b1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"b1\"");

        let parsed: BlogId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
