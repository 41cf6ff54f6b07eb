//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Several small enums (HTTP verbs, log levels, rate-limit origins) travel as
//! fixed strings in configuration files, log fields and request lines. This
//! macro gives each of them a single source of truth for that spelling.
//!
//! # Example
//!
//! ```rust
//! use jiralink_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Verbosity {
//!     Quiet,
//!     Loud,
//! }
//!
//! impl_wire_name_conversions!(Verbosity {
//!     Quiet => "quiet",
//!     Loud => "loud",
//! });
//!
//! assert_eq!(Verbosity::Loud.to_string(), "loud");
//! assert_eq!("QUIET".parse::<Verbosity>().unwrap(), Verbosity::Quiet);
//! ```

/// Implements `Display`, `FromStr` and `as_str` for wire-name enums
///
/// Parsing is ASCII case-insensitive; `Display` always produces the exact
/// spelling given in the mapping.
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical wire spelling of this value.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return ::std::result::Result::Ok(Self::$variant);
                    }
                )+
                ::std::result::Result::Err(::std::format!(
                    "Invalid {}: {}",
                    ::std::stringify!($enum_name),
                    s
                ))
            }
        }
    };
}
