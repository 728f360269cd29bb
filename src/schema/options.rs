//! Fixed option sets for experiment definitions.
//!
//! All four enums are closed: the identifier format splits on `_`, so no
//! option name may ever contain that character.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The communication channel an experiment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Program {
    /// Email outreach.
    Email,
    /// Calls to a home phone number.
    #[serde(rename = "Home phone")]
    HomePhone,
    /// Calls or texts to a mobile phone number.
    #[serde(rename = "Mobile phone")]
    MobilePhone,
}

impl Program {
    /// Every selectable program, in display order.
    pub const ALL: [Self; 3] = [Self::Email, Self::HomePhone, Self::MobilePhone];

    /// Canonical display name, as stored in identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::HomePhone => "Home phone",
            Self::MobilePhone => "Mobile phone",
        }
    }

    /// Look up a program by its canonical name.
    ///
    /// Returns `None` for names outside the option set.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mechanism being experimentally varied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Lever {
    /// When the communication is sent.
    #[serde(rename = "timing")]
    Timing,
    /// Which phone line is used.
    #[serde(rename = "phone")]
    Phone,
    /// The "ll" lever.
    #[serde(rename = "ll")]
    Ll,
}

impl Lever {
    /// Every selectable lever, in display order.
    pub const ALL: [Self; 3] = [Self::Timing, Self::Phone, Self::Ll];

    /// Canonical display name, as stored in identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timing => "timing",
            Self::Phone => "phone",
            Self::Ll => "ll",
        }
    }

    /// Look up a lever by its canonical name.
    ///
    /// Returns `None` for names outside the option set.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == name)
    }
}

impl fmt::Display for Lever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A categorical tag used to segment subjects.
///
/// A row's attribute mapping carries one free-text value per attribute
/// selected for the parent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// The "Green" segment tag.
    Green,
    /// The "Yellow" segment tag.
    Yellow,
    /// The "Red" segment tag.
    Red,
    /// The "Blue" segment tag.
    Blue,
}

impl Attribute {
    /// Every selectable attribute, in display order.
    pub const ALL: [Self; 4] = [Self::Green, Self::Yellow, Self::Red, Self::Blue];

    /// Canonical display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Red => "Red",
            Self::Blue => "Blue",
        }
    }

    /// Look up an attribute by its canonical name.
    ///
    /// Returns `None` for names outside the option set.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two per-stage level kinds.
///
/// Each stage of a multi-stage intervention contributes one level key per
/// kind, synthesized as `"{kind}_{stage}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LevelKind {
    /// The intervention arm of a stage.
    #[serde(rename = "intervention")]
    Intervention,
    /// The cohort arm of a stage.
    #[serde(rename = "cohort")]
    Cohort,
}

impl LevelKind {
    /// Both level kinds, in key-synthesis order.
    pub const ALL: [Self; 2] = [Self::Intervention, Self::Cohort];

    /// Canonical display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intervention => "intervention",
            Self::Cohort => "cohort",
        }
    }

    /// Synthesize the level key for this kind at a 1-based stage.
    #[must_use]
    pub fn key(self, stage: u32) -> String {
        format!("{}_{stage}", self.as_str())
    }
}

impl fmt::Display for LevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full level-key grid for a stage count: every [`LevelKind`] crossed
/// with stages `1..=stage_count`, stage-major.
#[must_use]
pub fn level_keys(stage_count: u32) -> Vec<String> {
    (1..=stage_count)
        .flat_map(|stage| LevelKind::ALL.into_iter().map(move |kind| kind.key(stage)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_round_trip() {
        for program in Program::ALL {
            assert_eq!(Program::from_name(program.as_str()), Some(program));
        }
        assert_eq!(Program::from_name("Fax"), None);
    }

    #[test]
    fn test_lever_name_round_trip() {
        for lever in Lever::ALL {
            assert_eq!(Lever::from_name(lever.as_str()), Some(lever));
        }
        assert_eq!(Lever::from_name("Timing"), None); // case-sensitive
    }

    #[test]
    fn test_attribute_serde_uses_display_names() {
        let json = serde_json::to_string(&Attribute::Green).unwrap();
        assert_eq!(json, "\"Green\"");
        let back: Attribute = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Attribute::Green);
    }

    #[test]
    fn test_program_serde_rename() {
        let json = serde_json::to_string(&Program::HomePhone).unwrap();
        assert_eq!(json, "\"Home phone\"");
    }

    #[test]
    fn test_option_names_never_contain_delimiter() {
        // The id format splits on '_'; a name containing it would break parsing.
        for program in Program::ALL {
            assert!(!program.as_str().contains('_'));
        }
        for lever in Lever::ALL {
            assert!(!lever.as_str().contains('_'));
        }
    }

    #[test]
    fn test_level_keys_two_stages() {
        assert_eq!(
            level_keys(2),
            vec!["intervention_1", "cohort_1", "intervention_2", "cohort_2"]
        );
    }

    #[test]
    fn test_level_keys_zero_stages_is_empty() {
        assert!(level_keys(0).is_empty());
    }
}
