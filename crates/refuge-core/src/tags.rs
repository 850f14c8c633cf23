//! Closed tag types shared by every layer.
//!
//! Each tag is defined once. Its serde form, its `Display` form, and its
//! column encoding in storage backends are the same SCREAMING_SNAKE_CASE
//! string (e.g. `"MALE_ONLY"`), parsed back through [`std::str::FromStr`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Returned when a string names no variant of a tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {tag} {value:?}")]
pub struct UnknownTag {
  pub tag:   &'static str,
  pub value: String,
}

/// Implements `as_str`, `Display` and `FromStr` from one variant table.
macro_rules! tag_strings {
  ($tag:ident, $label:literal, { $($variant:ident => $s:literal),+ $(,)? }) => {
    impl $tag {
      pub const ALL: &'static [$tag] = &[$($tag::$variant),+];

      pub fn as_str(self) -> &'static str {
        match self {
          $($tag::$variant => $s,)+
        }
      }
    }

    impl fmt::Display for $tag {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
    }

    impl FromStr for $tag {
      type Err = UnknownTag;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
          $($s => Ok($tag::$variant),)+
          other => Err(UnknownTag { tag: $label, value: other.to_owned() }),
        }
      }
    }
  };
}

/// Which specialised record a person carries. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonRole {
  Staff,
  Resident,
}

tag_strings!(PersonRole, "person role", {
  Staff => "STAFF",
  Resident => "RESIDENT",
});

/// Who a shelter takes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShelterKind {
  MaleOnly,
  FemaleOnly,
  Mixed,
  Family,
}

tag_strings!(ShelterKind, "shelter kind", {
  MaleOnly => "MALE_ONLY",
  FemaleOnly => "FEMALE_ONLY",
  Mixed => "MIXED",
  Family => "FAMILY",
});

/// A staff member's working shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shift {
  Morning,
  Afternoon,
  Night,
  Full,
}

tag_strings!(Shift, "shift", {
  Morning => "MORNING",
  Afternoon => "AFTERNOON",
  Night => "NIGHT",
  Full => "FULL",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentStatus {
  #[default]
  Active,
  Inactive,
  OnLeave,
}

tag_strings!(EmploymentStatus, "employment status", {
  Active => "ACTIVE",
  Inactive => "INACTIVE",
  OnLeave => "ON_LEAVE",
});

/// Aggregate case status of a resident. Transitions between these are
/// case-management decisions made outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResidencyStatus {
  #[default]
  Active,
  Transferred,
  Discharged,
  Absconded,
}

tag_strings!(ResidencyStatus, "residency status", {
  Active => "ACTIVE",
  Transferred => "TRANSFERRED",
  Discharged => "DISCHARGED",
  Absconded => "ABSCONDED",
});
