//! Domain models shared by the clinic services

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Patient gender
///
/// Canonical spellings are `Masculino` and `Feminino`. Input is matched
/// ignoring case, and the English `Masculine`/`Feminine` are accepted as
/// aliases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    Masculine,
    Feminine,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Masculine, Gender::Feminine];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Masculine => "Masculino",
            Gender::Feminine => "Feminino",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "masculino" | "masculine" => Ok(Gender::Masculine),
            "feminino" | "feminine" => Ok(Gender::Feminine),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse_is_case_insensitive() {
        assert_eq!("masculino".parse::<Gender>().unwrap(), Gender::Masculine);
        assert_eq!("FEMININO".parse::<Gender>().unwrap(), Gender::Feminine);
        assert_eq!(" Feminino ".parse::<Gender>().unwrap(), Gender::Feminine);
        assert!("other".parse::<Gender>().is_err());
        assert!("masc".parse::<Gender>().is_err());
    }

    #[test]
    fn test_english_spellings_are_aliases() {
        assert_eq!("masculine".parse::<Gender>().unwrap(), Gender::Masculine);
        assert_eq!("Feminine".parse::<Gender>().unwrap(), Gender::Feminine);
        assert_eq!(Gender::Feminine.to_string(), "Feminino");
        assert!("".parse::<Gender>().is_err());
    }

    #[test]
    fn test_gender_display_is_canonical() {
        assert_eq!(Gender::Masculine.to_string(), "Masculino");
        assert_eq!(Gender::Feminine.to_string(), "Feminino");
    }
}
