//! Race order form handling: metadata parsing, grid layout and the full
//! submission pipeline (enumerate, validate, build).

use shared::validation::parse_bounded_int;

use crate::errors::TemplateError;
use crate::models::{
    AuthorRef, Flight, NewRaceOrder, Pairing, RaceOrder, RaceOrderGrid, RaceOrderMetadataForm,
    RaceSlot, RotationFrequency, SubmitRaceOrderRequest, TemplateKey,
};
use crate::services::pairing::{required_handshakes, required_race_count};
use crate::services::template_validation::{collect_pairings, validate_pairings};

/// Upper bounds applied to submitted metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLimits {
    pub max_teams: i32,
    pub max_boats: i32,
    pub max_divisions: i32,
}

impl Default for FormLimits {
    fn default() -> Self {
        Self {
            max_teams: 100,
            max_boats: 100,
            max_divisions: 5,
        }
    }
}

/// Parses the `teams` field: a bare team count, or a comma/space separated
/// list of master team sizes which is summed.
///
/// Returns the team count and the master team sizes (empty for a bare
/// count).
pub fn parse_teams_field(raw: &str, limits: &FormLimits) -> Result<(i32, Vec<i32>), TemplateError> {
    let tokens: Vec<&str> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let sizes = tokens
        .iter()
        .map(|t| parse_bounded_int(t, 1, limits.max_teams).ok_or(TemplateError::InvalidTeamCount))
        .collect::<Result<Vec<i32>, _>>()?;

    let total = sizes
        .iter()
        .try_fold(0i32, |acc, &size| acc.checked_add(size))
        .ok_or(TemplateError::InvalidTeamCount)?;
    if sizes.is_empty() || !(2..=limits.max_teams).contains(&total) {
        return Err(TemplateError::InvalidTeamCount);
    }

    let master_teams = if sizes.len() > 1 { sizes } else { Vec::new() };
    Ok((total, master_teams))
}

/// Validates the metadata fields and builds the template key.
///
/// With no rotation the boat count is always `divs * teams`; otherwise it
/// is required and must fill whole flights (`divs * 2` boats per race).
pub fn parse_metadata(
    form: &RaceOrderMetadataForm,
    limits: &FormLimits,
) -> Result<TemplateKey, TemplateError> {
    let (num_teams, master_teams) =
        parse_teams_field(form.teams.as_deref().unwrap_or_default(), limits)?;

    let num_divisions = form
        .divs
        .as_deref()
        .and_then(|d| parse_bounded_int(d, 1, limits.max_divisions))
        .ok_or(TemplateError::InvalidDivisionCount)?;

    let frequency: RotationFrequency = form
        .frequency
        .as_deref()
        .ok_or(TemplateError::InvalidFrequency)?
        .parse()?;

    let num_boats = if frequency.is_none() {
        num_divisions * num_teams
    } else {
        let boats = form
            .boats
            .as_deref()
            .and_then(|b| parse_bounded_int(b, 1, limits.max_boats))
            .ok_or(TemplateError::InvalidBoatCount)?;
        if boats % (num_divisions * 2) != 0 {
            return Err(TemplateError::BoatsNotDivisible);
        }
        boats
    };

    TemplateKey::new(
        num_divisions,
        num_teams,
        num_boats,
        frequency,
        Some(master_teams),
    )
}

/// Lays out the race slots of a template in flights.
///
/// When `existing` is given its pairings prefill the slots.
pub fn build_grid(key: &TemplateKey, existing: Option<&RaceOrder>) -> RaceOrderGrid {
    let num_races = required_race_count(key.num_teams, &key.master_teams);
    let races_per_flight = key.races_per_flight();

    let slots: Vec<RaceSlot> = (0..num_races)
        .map(|index| {
            let pair = existing.and_then(|order| order.pair(index));
            RaceSlot {
                number: index + 1,
                team_a: pair.map(|p| p.team_a),
                team_b: pair.map(|p| p.team_b),
            }
        })
        .collect();

    let flights = slots
        .chunks(races_per_flight)
        .enumerate()
        .map(|(index, races)| Flight {
            number: index + 1,
            races: races.to_vec(),
        })
        .collect();

    RaceOrderGrid {
        template_id: existing.map(|order| order.id),
        key: key.clone(),
        frequency_label: key.frequency.label(),
        description: existing.and_then(|order| order.description.clone()),
        num_races,
        races_per_flight,
        flights,
    }
}

/// Runs a submission through enumeration and validation.
///
/// Returns a template ready to be saved; nothing is built if any check
/// fails.
pub fn prepare_template(
    key: TemplateKey,
    request: &SubmitRaceOrderRequest,
    author: Option<AuthorRef>,
) -> Result<NewRaceOrder, TemplateError> {
    let pairings: Vec<Pairing> = collect_pairings(
        request.race_order.as_deref(),
        &request.team1,
        &request.team2,
        key.num_teams,
    )?;

    let required = required_handshakes(key.num_teams, &key.master_teams);
    if let Err(e) = validate_pairings(&pairings, &required) {
        tracing::debug!(
            key = %key,
            submitted = pairings.len(),
            required = required.len(),
            error = %e,
            "Race order rejected"
        );
        return Err(e);
    }

    Ok(NewRaceOrder {
        key,
        pairings,
        description: request.normalized_description(),
        author,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn form(teams: &str, divs: &str, frequency: &str, boats: Option<&str>) -> RaceOrderMetadataForm {
        RaceOrderMetadataForm {
            teams: Some(teams.to_string()),
            divs: Some(divs.to_string()),
            frequency: Some(frequency.to_string()),
            boats: boats.map(str::to_string),
        }
    }

    fn limits() -> FormLimits {
        FormLimits::default()
    }

    #[test]
    fn test_parse_teams_bare_number() {
        assert_eq!(parse_teams_field("6", &limits()), Ok((6, vec![])));
        assert_eq!(parse_teams_field(" 6 ", &limits()), Ok((6, vec![])));
    }

    #[test]
    fn test_parse_teams_master_groups() {
        assert_eq!(parse_teams_field("3,3", &limits()), Ok((6, vec![3, 3])));
        assert_eq!(parse_teams_field("2 2, 2", &limits()), Ok((6, vec![2, 2, 2])));
        assert_eq!(parse_teams_field("4,", &limits()), Ok((4, vec![])));
    }

    #[test]
    fn test_parse_teams_sum_overflow_is_rejected() {
        let limits = FormLimits {
            max_teams: i32::MAX,
            ..FormLimits::default()
        };
        let raw = format!("{},{}", i32::MAX, i32::MAX);
        assert_eq!(
            parse_teams_field(&raw, &limits),
            Err(TemplateError::InvalidTeamCount)
        );
    }

    #[test]
    fn test_parse_teams_rejects() {
        for raw in ["", "1", "abc", "3,x", "0,4", "101", "60,60"] {
            assert_eq!(
                parse_teams_field(raw, &limits()),
                Err(TemplateError::InvalidTeamCount),
                "input {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_parse_metadata_with_rotation() {
        let key = parse_metadata(&form("6", "3", "frequent", Some("18")), &limits()).unwrap();
        assert_eq!(key.num_teams, 6);
        assert_eq!(key.num_divisions, 3);
        assert_eq!(key.num_boats, 18);
        assert_eq!(key.frequency, RotationFrequency::Frequent);
        assert!(key.master_teams.is_empty());
    }

    #[test]
    fn test_parse_metadata_no_rotation_computes_boats() {
        let key = parse_metadata(&form("3,3", "2", "none", Some("7")), &limits()).unwrap();
        assert_eq!(key.num_boats, 12);
        assert_eq!(key.master_teams, vec![3, 3]);

        let key = parse_metadata(&form("4", "3", "none", None), &limits()).unwrap();
        assert_eq!(key.num_boats, 12);
    }

    #[test]
    fn test_parse_metadata_boats_required_with_rotation() {
        assert_eq!(
            parse_metadata(&form("6", "3", "infrequent", None), &limits()).unwrap_err(),
            TemplateError::InvalidBoatCount
        );
        assert_eq!(
            parse_metadata(&form("6", "3", "infrequent", Some("0")), &limits()).unwrap_err(),
            TemplateError::InvalidBoatCount
        );
    }

    #[test]
    fn test_parse_metadata_boats_must_fill_flights() {
        assert_eq!(
            parse_metadata(&form("6", "3", "frequent", Some("20")), &limits()).unwrap_err(),
            TemplateError::BoatsNotDivisible
        );
    }

    #[test]
    fn test_parse_metadata_divisions_and_frequency() {
        assert_eq!(
            parse_metadata(&form("6", "6", "frequent", Some("24")), &limits()).unwrap_err(),
            TemplateError::InvalidDivisionCount
        );
        assert_eq!(
            parse_metadata(&form("6", "3", "sometimes", Some("18")), &limits()).unwrap_err(),
            TemplateError::InvalidFrequency
        );
        let missing = RaceOrderMetadataForm {
            frequency: None,
            ..form("6", "3", "frequent", Some("18"))
        };
        assert_eq!(
            parse_metadata(&missing, &limits()).unwrap_err(),
            TemplateError::InvalidFrequency
        );
    }

    #[test]
    fn test_build_grid_empty() {
        let key = parse_metadata(&form("6", "3", "frequent", Some("18")), &limits()).unwrap();
        let grid = build_grid(&key, None);
        assert_eq!(grid.num_races, 15);
        assert_eq!(grid.races_per_flight, 3);
        assert_eq!(grid.flights.len(), 5);
        assert!(grid.template_id.is_none());
        assert!(grid
            .flights
            .iter()
            .flat_map(|f| &f.races)
            .all(|slot| slot.team_a.is_none() && slot.team_b.is_none()));
        assert_eq!(grid.flights[4].races[2].number, 15);
    }

    #[test]
    fn test_build_grid_partial_last_flight() {
        let key = parse_metadata(&form("5", "2", "frequent", Some("8")), &limits()).unwrap();
        let grid = build_grid(&key, None);
        assert_eq!(grid.num_races, 10);
        assert_eq!(grid.races_per_flight, 2);
        assert_eq!(grid.flights.len(), 5);

        let key = parse_metadata(&form("4", "1", "frequent", Some("6")), &limits()).unwrap();
        let grid = build_grid(&key, None);
        assert_eq!(grid.races_per_flight, 3);
        assert_eq!(grid.flights.len(), 2);
        assert_eq!(grid.flights[1].races.len(), 3);
    }

    #[test]
    fn test_build_grid_prefilled() {
        let key = parse_metadata(&form("2,2", "1", "frequent", Some("4")), &limits()).unwrap();
        let order = RaceOrder {
            id: Uuid::new_v4(),
            key: key.clone(),
            pairings: vec![
                Pairing::new(1, 3),
                Pairing::new(4, 2),
                Pairing::new(1, 4),
                Pairing::new(3, 2),
            ],
            description: Some("carry-over".to_string()),
            author: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let grid = build_grid(&key, Some(&order));
        assert_eq!(grid.template_id, Some(order.id));
        assert_eq!(grid.num_races, 4);
        assert_eq!(grid.flights.len(), 2);
        assert_eq!(grid.flights[0].races[1].team_a, Some(4));
        assert_eq!(grid.flights[0].races[1].team_b, Some(2));
        assert_eq!(grid.description.as_deref(), Some("carry-over"));
    }

    #[test]
    fn test_prepare_template_from_lists() {
        let key = parse_metadata(&form("3", "1", "frequent", Some("2")), &limits()).unwrap();
        let request = SubmitRaceOrderRequest {
            team1: vec!["1".into(), "3".into(), "2".into()],
            team2: vec!["2".into(), "1".into(), "3".into()],
            description: Some(" three teams ".into()),
            ..Default::default()
        };
        let template = prepare_template(key, &request, None).unwrap();
        assert_eq!(template.pairings[1], Pairing::new(3, 1));
        assert_eq!(template.description.as_deref(), Some("three teams"));
    }

    #[test]
    fn test_prepare_template_rejects_incomplete_dump() {
        let key = parse_metadata(&form("4", "1", "frequent", Some("2")), &limits()).unwrap();
        let request = SubmitRaceOrderRequest {
            race_order: Some("1 2\n3 4\n".into()),
            ..Default::default()
        };
        assert_eq!(
            prepare_template(key, &request, None).unwrap_err(),
            TemplateError::MissingPairings
        );
    }
}
