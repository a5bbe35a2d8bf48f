use std::{fmt::{self, Formatter, Display}, str::FromStr, result::Result};

/// Sex of a sample, as found within a sample manifest.
/// Integer codes follow the PLINK/IMPUTE2 convention: `1` male, `2` female, anything else unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown
}

impl Sex {
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    #[must_use]
    pub fn is_male(&self) -> bool {
        matches!(self, Self::Male)
    }

    #[must_use]
    pub fn is_female(&self) -> bool {
        matches!(self, Self::Female)
    }

    /// PLINK integer code of this sex. Unknown maps to `0`.
    #[must_use]
    pub fn code(&self) -> u8 {
        match self {
            Self::Male    => 1,
            Self::Female  => 2,
            Self::Unknown => 0,
        }
    }
}

impl From<i64> for Sex {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::Male,
            2 => Self::Female,
            _ => Self::Unknown,
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "male"   | "m" | "1" => Self::Male,
            "female" | "f" | "2" => Self::Female,
            _                    => Self::Unknown,
        })
    }
}

impl Display for Sex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            Self::Female  => "female",
            Self::Male    => "male",
            Self::Unknown => "unknown"
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(format!("{}", Sex::Female), "female");
        assert_eq!(format!("{}", Sex::Male), "male");
        assert_eq!(format!("{}", Sex::Unknown), "unknown");
    }

    #[test]
    fn from_str() {
        assert_eq!(Sex::from_str("FEMALE"), Ok(Sex::Female));
        assert_eq!(Sex::from_str("2"), Ok(Sex::Female));
        assert_eq!(Sex::from_str("MALE"), Ok(Sex::Male));
        assert_eq!(Sex::from_str("1"), Ok(Sex::Male));
        assert_eq!(Sex::from_str(""), Ok(Sex::Unknown));
        assert_eq!(Sex::from_str("0"), Ok(Sex::Unknown));
        assert_eq!(Sex::from_str("NA"), Ok(Sex::Unknown));
        assert_eq!(Sex::from_str("-9"), Ok(Sex::Unknown));
    }

    #[test]
    fn from_code() {
        assert_eq!(Sex::from(1), Sex::Male);
        assert_eq!(Sex::from(2), Sex::Female);
        for code in [-9, 0, 3, 12] {
            assert!(Sex::from(code).is_unknown());
        }
    }

    #[test]
    fn code_roundtrip() {
        for sex in [Sex::Male, Sex::Female, Sex::Unknown] {
            assert_eq!(Sex::from(i64::from(sex.code())), sex);
        }
    }
}
