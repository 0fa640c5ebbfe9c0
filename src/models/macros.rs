//! Macros for the rule vocabulary enums
//!
//! Funding configuration documents spell every enum value in PascalCase, with a
//! handful of acronyms (`UKPRN`, `LACode`) kept upper case. `define_code_enum!`
//! keeps the Rust variant names idiomatic while pinning the document spelling.

/// Generate a fieldless enum with a canonical string code per variant
///
/// The generated type serialises to and from its code, implements `Display`
/// with the code, and parses case-insensitively through `FromStr`.
macro_rules! define_code_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $code:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Code used in configuration documents and diagnostics
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::GroupingError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| {
                        $crate::error::GroupingError::InvalidConfiguration(format!(
                            "Unknown {} '{}'",
                            stringify!($name),
                            trimmed
                        ))
                    })
            }
        }
    };
}
