//! Character creation and the deterministic starting-resource formula.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{
    AGE_MAX, AGE_MIN, AGE_SENIOR_CUTOFF, AGE_YOUNG_CUTOFF, CIS_LANGUAGE_BONUS, CIS_NATIONALITIES,
    CIS_STRESS_RELIEF, LANGUAGE_MAX, SENIOR_MONEY_BONUS, SENIOR_STRESS_PENALTY,
    START_DAYS_DEFAULT, START_DAYS_TOURISM, START_LANGUAGE_STUDY, START_LANGUAGE_TOURISM,
    START_LANGUAGE_WORK, START_MONEY_STUDY, START_MONEY_TOURISM, START_MONEY_WORK,
    START_STRESS_DEFAULT, START_STRESS_WORK, YOUNG_LANGUAGE_BONUS, YOUNG_STRESS_RELIEF,
};
use crate::resources::Resources;

/// Purpose of the visit. Gates document skips and seeds starting resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    #[default]
    Study,
    Work,
    Tourism,
}

impl Purpose {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Work => "work",
            Self::Tourism => "tourism",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Purpose {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "study" => Ok(Self::Study),
            "work" => Ok(Self::Work),
            "tourism" => Ok(Self::Tourism),
            _ => Err(()),
        }
    }
}

/// Validation failure during character creation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacterError {
    #[error("age must be between {min} and {max} (got {age})")]
    AgeOutOfRange { age: u8, min: u8, max: u8 },
    #[error("nationality must not be empty")]
    EmptyNationality,
}

/// Immutable player character. Created once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub age: u8,
    pub nationality: String,
    pub purpose: Purpose,
}

impl Character {
    /// Validate and construct a character.
    ///
    /// # Errors
    ///
    /// Returns an error when the age is outside `[18, 99]` or the
    /// nationality string is blank.
    pub fn new(age: u8, nationality: &str, purpose: Purpose) -> Result<Self, CharacterError> {
        if !(AGE_MIN..=AGE_MAX).contains(&age) {
            return Err(CharacterError::AgeOutOfRange {
                age,
                min: AGE_MIN,
                max: AGE_MAX,
            });
        }
        let nationality = nationality.trim();
        if nationality.is_empty() {
            return Err(CharacterError::EmptyNationality);
        }
        Ok(Self {
            age,
            nationality: nationality.to_string(),
            purpose,
        })
    }

    /// Whether the nationality is in the visa-lenient set.
    #[must_use]
    pub fn has_regional_leniency(&self) -> bool {
        CIS_NATIONALITIES
            .iter()
            .any(|country| country.eq_ignore_ascii_case(&self.nationality))
    }
}

/// Compute starting resources for a character.
///
/// Pure and deterministic: the character-creation preview and the actual run
/// start must agree exactly, so no randomness is allowed here. Purpose picks
/// the base line, age and nationality adjust it additively, and only the
/// creation-relevant bounds are applied (language ceiling, stress floor).
#[must_use]
pub fn starting_resources(character: &Character) -> Resources {
    let (mut money, days, mut language, mut stress) = match character.purpose {
        Purpose::Study => (
            START_MONEY_STUDY,
            START_DAYS_DEFAULT,
            START_LANGUAGE_STUDY,
            START_STRESS_DEFAULT,
        ),
        Purpose::Work => (
            START_MONEY_WORK,
            START_DAYS_DEFAULT,
            START_LANGUAGE_WORK,
            START_STRESS_WORK,
        ),
        Purpose::Tourism => (
            START_MONEY_TOURISM,
            START_DAYS_TOURISM,
            START_LANGUAGE_TOURISM,
            START_STRESS_DEFAULT,
        ),
    };

    if character.age < AGE_YOUNG_CUTOFF {
        language += YOUNG_LANGUAGE_BONUS;
        stress -= YOUNG_STRESS_RELIEF;
    } else if character.age > AGE_SENIOR_CUTOFF {
        stress += SENIOR_STRESS_PENALTY;
        money += SENIOR_MONEY_BONUS;
    }

    if character.has_regional_leniency() {
        language += CIS_LANGUAGE_BONUS;
        stress -= CIS_STRESS_RELIEF;
    }

    Resources::new(days, money, language.min(LANGUAGE_MAX), stress.max(0))
}
