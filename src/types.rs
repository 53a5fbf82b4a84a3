// src/types.rs

//! Closed token sets used by the configuration schema.
//!
//! Every enum here maps one-to-one onto the lowercase tokens accepted in the
//! config file. Matching is exact: `"EN"` is not a language.

use std::fmt;
use std::str::FromStr;

macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All accepted tokens, in declaration order.
            pub const TOKENS: &'static [&'static str] = &[$($token),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    other => Err(format!(
                        "invalid {}: {other:?} (expected one of {:?})",
                        $label,
                        Self::TOKENS
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

token_enum! {
    /// Interface language (`settings.language`).
    Language, "language" {
        En => "en",
        Ru => "ru",
    }
}

token_enum! {
    /// Colour theme (`settings.theme`).
    Theme, "theme" {
        Auto => "auto",
        Light => "light",
        Dark => "dark",
    }
}

token_enum! {
    /// Vehicle energy strategy (`vehicle.fuel-mode`).
    FuelMode, "fuel mode" {
        Intellectual => "intellectual",
        Electric => "electric",
        Fuel => "fuel",
        Save => "save",
    }
}

token_enum! {
    /// Vehicle driving profile (`vehicle.drive-mode`).
    DriveMode, "drive mode" {
        Eco => "eco",
        Comfort => "comfort",
        Sport => "sport",
        Snow => "snow",
        Outing => "outing",
        Individual => "individual",
    }
}
