//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Scopes and link phases travel as fixed strings (in token requests and in
//! logs). This macro maps each variant to its wire name in both directions.
//!
//! # Example
//!
//! ```rust
//! use idlink_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Grant {
//!     Read,
//!     Write,
//! }
//!
//! impl_wire_name_conversions!(Grant {
//!     Read => "read:things",
//!     Write => "write:things",
//! });
//!
//! assert_eq!(Grant::Read.to_string(), "read:things");
//! ```

/// Implements Display and FromStr traits for enums with a fixed wire name
///
/// Parsing is case-insensitive; output always uses the declared string.
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Wire name of this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestGrant {
        Read,
        Update,
    }

    impl_wire_name_conversions!(TestGrant {
        Read => "read:current_user",
        Update => "update:users",
    });

    #[test]
    fn test_display_uses_wire_name() {
        assert_eq!(TestGrant::Read.to_string(), "read:current_user");
        assert_eq!(TestGrant::Update.as_str(), "update:users");
    }

    #[test]
    fn test_fromstr_ignores_case() {
        assert_eq!(TestGrant::from_str("READ:CURRENT_USER").unwrap(), TestGrant::Read);
        assert_eq!(TestGrant::from_str("update:users").unwrap(), TestGrant::Update);
    }

    #[test]
    fn test_fromstr_invalid() {
        let err = TestGrant::from_str("delete:users").unwrap_err();
        assert!(err.contains("TestGrant"));
        assert!(err.contains("delete:users"));
    }
}
