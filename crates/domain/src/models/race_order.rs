//! Race order templates for team racing.
//!
//! A template is a look-up table that fixes the order in which the teams of
//! a round-robin meet. Teams are referred to by their 1-based position in
//! the round, so a template can be reused by any round with the same
//! parameters (see [`TemplateKey`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::errors::TemplateError;

/// How often boats are rotated between teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationFrequency {
    Frequent,
    Infrequent,
    None,
}

impl RotationFrequency {
    /// All frequencies in display order.
    pub fn all() -> &'static [RotationFrequency] {
        &[
            RotationFrequency::Frequent,
            RotationFrequency::Infrequent,
            RotationFrequency::None,
        ]
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RotationFrequency::Frequent => "Frequent rotation",
            RotationFrequency::Infrequent => "Infrequent rotation",
            RotationFrequency::None => "No rotation",
        }
    }

    /// Whether teams keep their boats for the whole round.
    pub fn is_none(&self) -> bool {
        matches!(self, RotationFrequency::None)
    }
}

impl fmt::Display for RotationFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationFrequency::Frequent => write!(f, "frequent"),
            RotationFrequency::Infrequent => write!(f, "infrequent"),
            RotationFrequency::None => write!(f, "none"),
        }
    }
}

impl FromStr for RotationFrequency {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "frequent" => Ok(RotationFrequency::Frequent),
            "infrequent" => Ok(RotationFrequency::Infrequent),
            "none" => Ok(RotationFrequency::None),
            _ => Err(TemplateError::InvalidFrequency),
        }
    }
}

/// One race of the order: the `team_a`-th team against the `team_b`-th team.
///
/// Direction is significant: `2-5` and `5-2` are the same handshake with
/// the teams swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pairing {
    pub team_a: i32,
    pub team_b: i32,
}

impl Pairing {
    pub fn new(team_a: i32, team_b: i32) -> Self {
        Self { team_a, team_b }
    }

    /// The unordered form `(min, max)` used for handshake membership.
    pub fn normalized(&self) -> (i32, i32) {
        if self.team_a <= self.team_b {
            (self.team_a, self.team_b)
        } else {
            (self.team_b, self.team_a)
        }
    }

    pub fn is_self_pairing(&self) -> bool {
        self.team_a == self.team_b
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.team_a, self.team_b)
    }
}

/// Parse error for the stored `"A-B"` encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid pair encoding: {0}")]
pub struct PairingParseError(pub String);

impl FromStr for Pairing {
    type Err = PairingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once('-')
            .ok_or_else(|| PairingParseError(s.to_string()))?;
        let team_a = a
            .trim()
            .parse()
            .map_err(|_| PairingParseError(s.to_string()))?;
        let team_b = b
            .trim()
            .parse()
            .map_err(|_| PairingParseError(s.to_string()))?;
        Ok(Pairing::new(team_a, team_b))
    }
}

/// The parameters that identify a template.
///
/// At most one template exists per key. An absent list of master teams and
/// an empty one are the same key; master team sizes are compared in order
/// since they fix which team indices belong to which group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateKey {
    pub num_divisions: i32,
    pub num_teams: i32,
    pub num_boats: i32,
    pub frequency: RotationFrequency,
    pub master_teams: Vec<i32>,
}

impl TemplateKey {
    /// Builds a key, checking that master team sizes (if any) are positive
    /// and add up to `num_teams`.
    pub fn new(
        num_divisions: i32,
        num_teams: i32,
        num_boats: i32,
        frequency: RotationFrequency,
        master_teams: Option<Vec<i32>>,
    ) -> Result<Self, TemplateError> {
        let master_teams = master_teams.unwrap_or_default();
        if !master_teams.is_empty() {
            if master_teams.iter().any(|&size| size < 1) {
                return Err(TemplateError::InvalidTeamCount);
            }
            if master_teams.iter().sum::<i32>() != num_teams {
                return Err(TemplateError::MasterTeamsMismatch);
            }
        }

        Ok(Self {
            num_divisions,
            num_teams,
            num_boats,
            frequency,
            master_teams,
        })
    }

    /// Races shown together in one flight of the form grid.
    pub fn races_per_flight(&self) -> usize {
        if self.num_divisions <= 0 {
            return 1;
        }
        ((self.num_boats / self.num_divisions / 2).max(1)) as usize
    }

    pub fn has_master_teams(&self) -> bool {
        !self.master_teams.is_empty()
    }

    /// Sort key matching the listing order of the store.
    pub fn sort_key(&self) -> (i32, i32, i32, &[i32], RotationFrequency) {
        (
            self.num_divisions,
            self.num_teams,
            self.num_boats,
            &self.master_teams,
            self.frequency,
        )
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.num_divisions, self.num_teams, self.num_boats, self.frequency
        )?;
        if self.has_master_teams() {
            let groups: Vec<String> = self.master_teams.iter().map(|g| g.to_string()).collect();
            write!(f, "-{}", groups.join(","))?;
        }
        Ok(())
    }
}

/// Account that last saved a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    pub id: Uuid,
    pub email: String,
}

/// A stored race order template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceOrder {
    pub id: Uuid,
    #[serde(flatten)]
    pub key: TemplateKey,
    pub pairings: Vec<Pairing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RaceOrder {
    /// Pairing for the race at `index` (0-based), if the template has one.
    pub fn pair(&self, index: usize) -> Option<Pairing> {
        self.pairings.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    /// Tab-separated dump of the order, one race per line.
    pub fn export_dump(&self) -> String {
        self.pairings
            .iter()
            .map(|p| format!("{}\t{}\n", p.team_a, p.team_b))
            .collect()
    }
}

/// A validated template ready to be saved.
#[derive(Debug, Clone)]
pub struct NewRaceOrder {
    pub key: TemplateKey,
    pub pairings: Vec<Pairing>,
    pub description: Option<String>,
    pub author: Option<AuthorRef>,
}

// ============================================================================
// Request / response types
// ============================================================================

/// Metadata fields of the race order form.
///
/// `teams` is either a bare number of teams or a comma/space separated list
/// of master team sizes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaceOrderMetadataForm {
    #[serde(default)]
    pub teams: Option<String>,
    #[serde(default)]
    pub divs: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub boats: Option<String>,
}

/// Form submission creating or editing a template.
///
/// Pairings come either from the parallel `team1[]`/`team2[]` lists or from
/// the `race_order` text dump; a non-blank dump wins.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitRaceOrderRequest {
    /// Present only when editing an existing template.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub teams: Option<String>,
    #[serde(default)]
    pub divs: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub boats: Option<String>,
    #[serde(default, rename = "team1[]", alias = "team1")]
    pub team1: Vec<String>,
    #[serde(default, rename = "team2[]", alias = "team2")]
    pub team2: Vec<String>,
    #[serde(default)]
    pub race_order: Option<String>,
    /// `Some("")` when sent empty, `None` when the field is absent.
    #[serde(default, deserialize_with = "submitted_value")]
    #[validate(custom(function = "shared::validation::validate_description"))]
    pub description: Option<String>,
}

/// Keeps an explicitly submitted empty form value instead of folding it
/// into `None`.
fn submitted_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

impl SubmitRaceOrderRequest {
    pub fn metadata(&self) -> RaceOrderMetadataForm {
        RaceOrderMetadataForm {
            teams: self.teams.clone(),
            divs: self.divs.clone(),
            frequency: self.frequency.clone(),
            boats: self.boats.clone(),
        }
    }

    /// Template being edited, `None` for blank or absent values.
    pub fn template_id(&self) -> Option<&str> {
        self.template
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Trimmed description, `None` when blank.
    pub fn normalized_description(&self) -> Option<String> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    }
}

/// Request to delete several templates at once.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRaceOrdersRequest {
    #[validate(length(min = 1, message = "No list of templates to delete provided."))]
    pub templates: Vec<String>,
}

/// One race slot of the form grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSlot {
    pub number: usize,
    pub team_a: Option<i32>,
    pub team_b: Option<i32>,
}

/// Races grouped for display; grouping has no effect on validation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub number: usize,
    pub races: Vec<RaceSlot>,
}

/// Everything needed to render the pairing form for one template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceOrderGrid {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<Uuid>,
    #[serde(flatten)]
    pub key: TemplateKey,
    pub frequency_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub num_races: usize,
    pub races_per_flight: usize,
    pub flights: Vec<Flight>,
}

/// Listing entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceOrderSummary {
    pub id: Uuid,
    #[serde(flatten)]
    pub key: TemplateKey,
    pub num_races: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<RaceOrder> for RaceOrderSummary {
    fn from(order: RaceOrder) -> Self {
        Self {
            id: order.id,
            num_races: order.pairings.len(),
            key: order.key,
            description: order.description,
            author: order.author.map(|a| a.email),
            updated_at: order.updated_at,
        }
    }
}

/// Selectable rotation frequency.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyChoice {
    pub value: RotationFrequency,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRaceOrdersResponse {
    pub data: Vec<RaceOrderSummary>,
    pub frequencies: Vec<FrequencyChoice>,
}

/// Response after a template was created or edited.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRaceOrderResponse {
    pub message: String,
    pub template: RaceOrder,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRaceOrdersResponse {
    pub message: String,
    pub deleted: usize,
}
