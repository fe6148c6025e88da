//! Closed sets of symbols (units, categories, locations).

use thiserror::Error;

/// A symbol that is not a member of its fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownSymbol {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Declares a closed, lowercase-serialized symbol enum.
///
/// Each variant lists its canonical spelling first, then any accepted aliases.
/// Parsing is case-insensitive and ignores surrounding whitespace.
macro_rules! symbol_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => [$canonical:literal $(, $alias:literal)*] ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "lowercase")]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $canonical),+
                }
            }

            /// Canonical spellings joined for messages.
            pub fn expected() -> String {
                Self::ALL
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl core::str::FromStr for $name {
            type Err = $crate::symbol::UnknownSymbol;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_ascii_lowercase();
                $(
                    if needle == $canonical $(|| needle == $alias)* {
                        return Ok($name::$variant);
                    }
                )+
                Err($crate::symbol::UnknownSymbol {
                    kind: $kind,
                    value: s.to_string(),
                    expected: Self::expected(),
                })
            }
        }
    };
}

pub(crate) use symbol_enum;
