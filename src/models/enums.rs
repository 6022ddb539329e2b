use serde::{Deserialize, Serialize};

use crate::pipeline::schema::SchemaError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Parsing is case-insensitive; unknown values surface as `UnknownModule`.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = SchemaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(SchemaError::UnknownModule(s.to_string())),
                }
            }
        }
    };
}

str_enum!(ModuleId {
    Heart => "heart",
    Lung => "lung",
    Breast => "breast",
    Diabetes => "diabetes",
});

impl ModuleId {
    pub const ALL: [ModuleId; 4] = [
        ModuleId::Heart,
        ModuleId::Lung,
        ModuleId::Breast,
        ModuleId::Diabetes,
    ];

    /// Stable position in `ALL`.
    pub fn index(&self) -> usize {
        match self {
            Self::Heart => 0,
            Self::Lung => 1,
            Self::Breast => 2,
            Self::Diabetes => 3,
        }
    }
}

/// How a module feeds the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// Clinical parameters sent as a JSON object.
    Parameters,
    /// An image upload plus a few demographic fields, sent as multipart.
    Image,
}

/// Display classification of a verdict. Only drives presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictClass {
    Negative,
    Positive,
}

impl VerdictClass {
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::Negative)
    }
}
