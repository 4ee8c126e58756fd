use crate::db::DatabaseError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde goes through the same strings, so JSON and SQLite agree.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(DocumentStatus {
    Processing => "processing",
    Completed => "completed",
    Failed => "failed",
});

str_enum!(RiskLevel {
    High => "High",
    Medium => "Medium",
    Low => "Low",
});

impl DocumentStatus {
    /// A document leaves `processing` exactly once and never comes back.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl RiskLevel {
    /// Lenient parse for model output: case-insensitive, anything
    /// unrecognized degrades to Medium (same default as a missing key).
    pub fn from_model_output(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_roundtrip() {
        for status in [
            DocumentStatus::Processing,
            DocumentStatus::Completed,
            DocumentStatus::Failed,
        ] {
            assert_eq!(DocumentStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn invalid_status_rejected() {
        assert!(DocumentStatus::from_str("pending").is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(!DocumentStatus::Processing.is_terminal());
        assert!(DocumentStatus::Completed.is_terminal());
        assert!(DocumentStatus::Failed.is_terminal());
    }

    #[test]
    fn serde_uses_storage_strings() {
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"High\"");
        let parsed: DocumentStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(parsed, DocumentStatus::Failed);
        assert!(serde_json::from_str::<DocumentStatus>("\"pending\"").is_err());
    }

    #[test]
    fn risk_level_lenient_parse() {
        assert_eq!(RiskLevel::from_model_output("High"), RiskLevel::High);
        assert_eq!(RiskLevel::from_model_output("  low "), RiskLevel::Low);
        assert_eq!(RiskLevel::from_model_output("MEDIUM"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_model_output("extreme"), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_model_output(""), RiskLevel::Medium);
    }
}
