//! Region column selection for consumer-side aggregation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::schema::columns;

/// Which region code column a consumer wants to group by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionPreference {
    /// Pick the column with greater non-null coverage; ties go to destination.
    #[default]
    Auto,
    Destination,
    Origin,
}

impl FromStr for RegionPreference {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(RegionPreference::Auto),
            "destination" | "destino" => Ok(RegionPreference::Destination),
            "origin" | "origem" => Ok(RegionPreference::Origin),
            other => Err(ModelError::UnknownRegionPreference(other.to_string())),
        }
    }
}

impl fmt::Display for RegionPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RegionPreference::Auto => "auto",
            RegionPreference::Destination => "destination",
            RegionPreference::Origin => "origin",
        };
        f.write_str(label)
    }
}

/// A concrete region code column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionColumn {
    Destination,
    Origin,
}

impl RegionColumn {
    /// Canonical column name.
    pub fn column_name(self) -> &'static str {
        match self {
            RegionColumn::Destination => columns::SIGLA_UF_DESTINO,
            RegionColumn::Origin => columns::SIGLA_UF_ORIGEM,
        }
    }
}

impl fmt::Display for RegionColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_and_portuguese_labels() {
        assert_eq!("AUTO".parse(), Ok(RegionPreference::Auto));
        assert_eq!("destino".parse(), Ok(RegionPreference::Destination));
        assert_eq!("origin".parse(), Ok(RegionPreference::Origin));
        assert!("north".parse::<RegionPreference>().is_err());
    }

    #[test]
    fn column_names() {
        assert_eq!(RegionColumn::Destination.column_name(), "SIGLA_UF_DESTINO");
        assert_eq!(RegionColumn::Origin.to_string(), "SIGLA_UF_ORIGEM");
    }
}
