//! Source ledgers known to the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::mapping::ColumnMapping;

/// One annual payment ledger. Each year is exported independently with its
/// own column names, header offset and separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceYear {
    Y2022,
    Y2023,
    Y2024,
}

impl SourceYear {
    /// All source years, in unification order.
    pub const ALL: [SourceYear; 3] = [SourceYear::Y2022, SourceYear::Y2023, SourceYear::Y2024];

    /// Calendar year of the ledger.
    pub fn as_i32(self) -> i32 {
        match self {
            SourceYear::Y2022 => 2022,
            SourceYear::Y2023 => 2023,
            SourceYear::Y2024 => 2024,
        }
    }

    /// Rename table from this year's source headers to canonical names.
    pub fn mapping(self) -> &'static ColumnMapping {
        ColumnMapping::for_year(self)
    }
}

impl fmt::Display for SourceYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

impl TryFrom<i32> for SourceYear {
    type Error = ModelError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            2022 => Ok(SourceYear::Y2022),
            2023 => Ok(SourceYear::Y2023),
            2024 => Ok(SourceYear::Y2024),
            other => Err(ModelError::UnsupportedYear(other)),
        }
    }
}

impl FromStr for SourceYear {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix(['y', 'Y']).unwrap_or(trimmed);
        match digits.parse::<i32>() {
            Ok(year) => SourceYear::try_from(year),
            Err(_) => Err(ModelError::UnsupportedYear(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_from_calendar_year() {
        assert_eq!(SourceYear::try_from(2023), Ok(SourceYear::Y2023));
        assert_eq!(
            SourceYear::try_from(2021),
            Err(ModelError::UnsupportedYear(2021))
        );
    }

    #[test]
    fn parses_prefixed_labels() {
        assert_eq!("y2024".parse::<SourceYear>(), Ok(SourceYear::Y2024));
        assert_eq!(" 2022 ".parse::<SourceYear>(), Ok(SourceYear::Y2022));
    }

    #[test]
    fn display_is_calendar_year() {
        assert_eq!(SourceYear::Y2022.to_string(), "2022");
    }
}
