//! Static document catalog: locations, costs, timing, and branch tables.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::character::Purpose;
use crate::constants::LANGUAGE_MAX;
use crate::resources::Delta;

/// Location a document is issued at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationId {
    Airport,
    Accommodation,
    University,
    Telecom,
    Hospital,
    Migration,
}

impl LocationId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Airport => "airport",
            Self::Accommodation => "accommodation",
            Self::University => "university",
            Self::Telecom => "telecom",
            Self::Hospital => "hospital",
            Self::Migration => "migration",
        }
    }

    /// Display name for hosts without their own localization layer.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Airport => "the Airport",
            Self::Accommodation => "your Accommodation",
            Self::University => "the University",
            Self::Telecom => "the Phone Shop & Bank",
            Self::Hospital => "the Hospital",
            Self::Migration => "the Migration Center",
        }
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "airport" => Ok(Self::Airport),
            "accommodation" => Ok(Self::Accommodation),
            "university" => Ok(Self::University),
            "telecom" => Ok(Self::Telecom),
            "hospital" => Ok(Self::Hospital),
            "migration" => Ok(Self::Migration),
            _ => Err(()),
        }
    }
}

/// Named alternative to a document's base cost (e.g. hotel vs. apartment
/// registration). Time is in hours, replacing the document base when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostOption {
    pub id: String,
    pub cost: i64,
    #[serde(default)]
    pub time_hours: Option<f32>,
}

/// Purpose-dependent cost table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurposeCosts {
    pub study: i64,
    pub work: i64,
    pub tourism: i64,
}

impl PurposeCosts {
    #[must_use]
    pub const fn for_purpose(&self, purpose: Purpose) -> i64 {
        match purpose {
            Purpose::Study => self.study,
            Purpose::Work => self.work,
            Purpose::Tourism => self.tourism,
        }
    }
}

/// Threshold-branched action attached to a document.
///
/// The resolver compares the player's language skill against the threshold
/// and applies either the success or the failure delta; both sides and the
/// cutoff itself are data, never resolver logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchChoice {
    pub id: String,
    pub language_threshold: i32,
    pub success: Delta,
    pub failure: Delta,
}

/// Static description of one required document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSpec {
    pub id: String,
    pub name: String,
    pub location: LocationId,
    #[serde(default)]
    pub base_cost: i64,
    #[serde(default)]
    pub cost_options: Vec<CostOption>,
    #[serde(default)]
    pub cost_by_purpose: Option<PurposeCosts>,
    pub base_time_hours: f32,
    #[serde(default)]
    pub time_range_hours: Option<(f32, f32)>,
    #[serde(default)]
    pub waiting_days: u32,
    pub language_required: i32,
    #[serde(default)]
    pub required_purpose: Option<Purpose>,
    #[serde(default)]
    pub branches: Vec<BranchChoice>,
    #[serde(default)]
    pub desc: String,
}

impl DocumentSpec {
    /// Base cost for a purpose, before any cost-option or express surcharge.
    #[must_use]
    pub fn cost_for(&self, purpose: Purpose) -> i64 {
        self.cost_by_purpose
            .as_ref()
            .map_or(self.base_cost, |table| table.for_purpose(purpose))
    }

    #[must_use]
    pub fn cost_option(&self, id: &str) -> Option<&CostOption> {
        self.cost_options.iter().find(|option| option.id == id)
    }

    #[must_use]
    pub fn branch(&self, id: &str) -> Option<&BranchChoice> {
        self.branches.iter().find(|branch| branch.id == id)
    }
}

/// Catalog validation failure. These are load-time programming or data
/// errors, not user-recoverable conditions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one document")]
    Empty,
    #[error("document {id} duplicates an earlier id")]
    DuplicateId { id: String },
    #[error("document {id}: language requirement {value} outside [0, 100]")]
    LanguageRequirementOutOfRange { id: String, value: i32 },
    #[error("document {id}: base time must be positive (got {value})")]
    NonPositiveTime { id: String, value: f32 },
    #[error("document {id}: time range inverted ({min} > {max})")]
    InvertedTimeRange { id: String, min: f32, max: f32 },
}

/// Ordered, immutable set of required documents for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub documents: Vec<DocumentSpec>,
}

impl Catalog {
    /// Load a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid catalog data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of documents a run must collect.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document at a cursor position.
    #[must_use]
    pub fn document_at(&self, index: usize) -> Option<&DocumentSpec> {
        self.documents.get(index)
    }

    /// First document issued at a location.
    #[must_use]
    pub fn by_location(&self, location: LocationId) -> Option<&DocumentSpec> {
        self.documents.iter().find(|doc| doc.location == location)
    }

    /// Validate structural invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.documents.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (idx, doc) in self.documents.iter().enumerate() {
            if self.documents[..idx].iter().any(|other| other.id == doc.id) {
                return Err(CatalogError::DuplicateId { id: doc.id.clone() });
            }
            if !(0..=LANGUAGE_MAX).contains(&doc.language_required) {
                return Err(CatalogError::LanguageRequirementOutOfRange {
                    id: doc.id.clone(),
                    value: doc.language_required,
                });
            }
            if doc.base_time_hours <= 0.0 {
                return Err(CatalogError::NonPositiveTime {
                    id: doc.id.clone(),
                    value: doc.base_time_hours,
                });
            }
            if let Some((min, max)) = doc.time_range_hours
                && min > max
            {
                return Err(CatalogError::InvertedTimeRange {
                    id: doc.id.clone(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Compiled-in catalog: the six documents of the 90-day settlement run.
    #[must_use]
    pub fn builtin() -> Self {
        let documents = vec![
            DocumentSpec {
                id: "migration-card".to_string(),
                name: "Migration Card".to_string(),
                location: LocationId::Airport,
                base_cost: 0,
                cost_options: Vec::new(),
                cost_by_purpose: None,
                base_time_hours: 3.0,
                time_range_hours: Some((2.0, 4.0)),
                waiting_days: 0,
                language_required: 15,
                required_purpose: None,
                branches: builtin_airport_branches(),
                desc: "Get your migration card at the airport immigration desk".to_string(),
            },
            DocumentSpec {
                id: "registration".to_string(),
                name: "Registration".to_string(),
                location: LocationId::Accommodation,
                base_cost: 500,
                cost_options: vec![
                    CostOption {
                        id: "hotel".to_string(),
                        cost: 0,
                        time_hours: Some(1.0),
                    },
                    CostOption {
                        id: "dormitory".to_string(),
                        cost: 500,
                        time_hours: Some(1.0),
                    },
                    CostOption {
                        id: "apartment".to_string(),
                        cost: 5_000,
                        time_hours: Some(1.0),
                    },
                ],
                cost_by_purpose: None,
                base_time_hours: 1.0,
                time_range_hours: None,
                waiting_days: 1,
                language_required: 15,
                required_purpose: None,
                branches: Vec::new(),
                desc: "Register your address at your accommodation".to_string(),
            },
            DocumentSpec {
                id: "university-reg".to_string(),
                name: "University Registration".to_string(),
                location: LocationId::University,
                base_cost: 0,
                cost_options: Vec::new(),
                cost_by_purpose: None,
                base_time_hours: 3.0,
                time_range_hours: Some((2.0, 4.0)),
                waiting_days: 0,
                language_required: 20,
                required_purpose: Some(Purpose::Study),
                branches: Vec::new(),
                desc: "Complete your registration at the university".to_string(),
            },
            DocumentSpec {
                id: "sim-bank".to_string(),
                name: "SIM Card & Bank Card".to_string(),
                location: LocationId::Telecom,
                base_cost: 6_000,
                cost_options: Vec::new(),
                cost_by_purpose: None,
                base_time_hours: 2.0,
                time_range_hours: None,
                waiting_days: 1,
                language_required: 25,
                required_purpose: None,
                branches: Vec::new(),
                desc: "Get a local SIM card and open a bank account".to_string(),
            },
            DocumentSpec {
                id: "medical".to_string(),
                name: "Medical Certificate".to_string(),
                location: LocationId::Hospital,
                base_cost: 6_000,
                cost_options: Vec::new(),
                cost_by_purpose: None,
                base_time_hours: 3.0,
                time_range_hours: Some((2.0, 4.0)),
                waiting_days: 3,
                language_required: 20,
                required_purpose: None,
                branches: Vec::new(),
                desc: "Obtain required medical examination certificate".to_string(),
            },
            DocumentSpec {
                id: "fingerprint".to_string(),
                name: "Fingerprint Card".to_string(),
                location: LocationId::Migration,
                base_cost: 1_600,
                cost_options: Vec::new(),
                cost_by_purpose: Some(PurposeCosts {
                    study: 1_600,
                    work: 16_000,
                    tourism: 16_000,
                }),
                base_time_hours: 4.5,
                time_range_hours: Some((3.0, 6.0)),
                waiting_days: 5,
                language_required: 25,
                required_purpose: None,
                branches: Vec::new(),
                desc: "Get fingerprinted at the migration center (final document!)".to_string(),
            },
        ];
        Self { documents }
    }
}

fn builtin_airport_branches() -> Vec<BranchChoice> {
    const fn branch_delta(money: i64, days: i32, language: i32, stress: i32) -> Delta {
        Delta {
            days,
            money,
            language,
            stress,
            log: None,
        }
    }

    let with_log = |mut delta: Delta, key: &str| {
        delta.log = Some(key.to_string());
        delta
    };

    vec![
        // Customs desk
        BranchChoice {
            id: "customs-queue-help".to_string(),
            language_threshold: 20,
            success: with_log(
                branch_delta(0, 0, 2, -2),
                "branch.customs-queue-help.success",
            ),
            failure: with_log(branch_delta(0, 0, 0, 5), "branch.customs-queue-help.failure"),
        },
        BranchChoice {
            id: "customs-greeting".to_string(),
            language_threshold: 30,
            success: with_log(branch_delta(0, 0, 3, -5), "branch.customs-greeting.success"),
            failure: with_log(branch_delta(0, 0, 0, 3), "branch.customs-greeting.failure"),
        },
        BranchChoice {
            id: "customs-questions".to_string(),
            language_threshold: 15,
            success: with_log(branch_delta(0, 0, 5, 5), "branch.customs-questions.success"),
            failure: with_log(
                branch_delta(-500, -1, 0, 10),
                "branch.customs-questions.failure",
            ),
        },
        // Taxi
        BranchChoice {
            id: "taxi-official".to_string(),
            language_threshold: 0,
            success: with_log(branch_delta(-2_000, 0, 0, -5), "branch.taxi-official.success"),
            failure: with_log(branch_delta(-2_000, 0, 0, -5), "branch.taxi-official.success"),
        },
        BranchChoice {
            id: "taxi-negotiate".to_string(),
            language_threshold: 40,
            success: with_log(branch_delta(-1_200, 0, 5, -2), "branch.taxi-negotiate.success"),
            failure: with_log(branch_delta(-3_000, -1, 0, 10), "branch.taxi-negotiate.failure"),
        },
        BranchChoice {
            id: "taxi-card".to_string(),
            language_threshold: 25,
            success: with_log(branch_delta(-2_000, 0, 3, 2), "branch.taxi-card.success"),
            failure: with_log(branch_delta(-2_500, 0, 0, 8), "branch.taxi-card.failure"),
        },
        // Metro
        BranchChoice {
            id: "metro-navigate".to_string(),
            language_threshold: 35,
            success: with_log(branch_delta(-700, 0, 8, 5), "branch.metro-navigate.success"),
            failure: with_log(
                branch_delta(-700, -1, 5, 15),
                "branch.metro-navigate.failure",
            ),
        },
        BranchChoice {
            id: "metro-ask-help".to_string(),
            language_threshold: 15,
            success: with_log(branch_delta(-700, 0, 7, -3), "branch.metro-ask-help.success"),
            failure: with_log(branch_delta(-700, -1, 3, 8), "branch.metro-ask-help.failure"),
        },
        BranchChoice {
            id: "metro-give-up".to_string(),
            language_threshold: 0,
            success: with_log(branch_delta(-2_500, 0, 0, 12), "branch.metro-give-up.success"),
            failure: with_log(branch_delta(-2_500, 0, 0, 12), "branch.metro-give-up.success"),
        },
        // Friend pickup, the free option
        BranchChoice {
            id: "friend-pickup".to_string(),
            language_threshold: 0,
            success: with_log(branch_delta(0, 0, 0, -15), "branch.friend-pickup.success"),
            failure: with_log(branch_delta(0, 0, 0, -15), "branch.friend-pickup.success"),
        },
    ]
}
