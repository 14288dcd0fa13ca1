//! Gender enumeration for user records.

use serde::{Deserialize, Serialize};

/// A user's self-reported gender.
///
/// Serialized on the wire and stored in the database with its capitalised
/// variant name (`"Male"`, `"Female"`, `"Other"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "gender"))]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Returns the canonical name of this variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            other => Err(format!("unknown gender '{other}' (expected Male, Female or Other)")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"Female\"");
        let parsed: Gender = serde_json::from_str("\"Other\"").unwrap();
        assert_eq!(parsed, Gender::Other);
        assert!(serde_json::from_str::<Gender>("\"male\"").is_err());
    }

    #[test]
    fn test_from_str_matches_display() {
        for gender in [Gender::Male, Gender::Female, Gender::Other] {
            assert_eq!(gender.to_string().parse::<Gender>().unwrap(), gender);
        }
        assert!("Unknown".parse::<Gender>().is_err());
    }
}
