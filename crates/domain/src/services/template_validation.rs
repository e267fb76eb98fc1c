//! Validation of submitted race orders.
//!
//! Both input modes (parallel team lists and the free-text dump) are turned
//! into one ordered `Vec<Pairing>` which is then checked against the
//! required handshakes.

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::TemplateError;
use crate::models::Pairing;
use crate::services::pairing::HandshakeSet;

lazy_static! {
    static ref NON_DIGITS: Regex = Regex::new(r"[^0-9]+").expect("valid non-digit pattern");
}

/// Checks that `pairings` covers `required` exactly once each.
///
/// Entries are checked in order: self pairings first, then membership in
/// the handshake set, then duplicates. Missing handshakes are reported
/// after every entry has been seen.
pub fn validate_pairings(pairings: &[Pairing], required: &HandshakeSet) -> Result<(), TemplateError> {
    let mut remaining = required.clone();
    for pairing in pairings {
        if pairing.is_self_pairing() {
            return Err(TemplateError::SelfPairing);
        }
        let (a, b) = pairing.normalized();
        if !required.contains(a, b) {
            return Err(TemplateError::InvalidPairing);
        }
        if !remaining.remove((a, b)) {
            return Err(TemplateError::DuplicatePairing);
        }
    }

    if !remaining.is_empty() {
        return Err(TemplateError::MissingPairings);
    }
    Ok(())
}

/// Zips the `team1[]` and `team2[]` lists into pairings.
///
/// Both lists must be non-empty and of equal length; every value must be a
/// team index in `1..=num_teams`.
pub fn pairings_from_lists(
    team1: &[String],
    team2: &[String],
    num_teams: i32,
) -> Result<Vec<Pairing>, TemplateError> {
    if team1.is_empty() {
        return Err(TemplateError::IncompleteTeamAList);
    }
    if team2.len() != team1.len() {
        return Err(TemplateError::IncompleteTeamBList);
    }

    team1
        .iter()
        .zip(team2)
        .map(|(a, b)| {
            let team_a = shared::validation::parse_bounded_int(a, 1, num_teams)
                .ok_or(TemplateError::InvalidTeamA)?;
            let team_b = shared::validation::parse_bounded_int(b, 1, num_teams)
                .ok_or(TemplateError::InvalidTeamB)?;
            Ok(Pairing::new(team_a, team_b))
        })
        .collect()
}

/// Parses the bulk dump format: one race per line, two team numbers per
/// line separated by anything that is not a digit (`1 2`, `1-2`, `1\t2`).
///
/// Blank lines are skipped; any other line must yield exactly two numbers.
/// Line numbers in errors are 1-based and count blank lines.
pub fn parse_race_order_dump(dump: &str) -> Result<Vec<Pairing>, TemplateError> {
    let mut pairings = Vec::new();
    for (index, line) in dump.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;
        let tokens: Vec<&str> = NON_DIGITS
            .split(line)
            .filter(|token| !token.is_empty())
            .collect();
        if tokens.len() != 2 {
            return Err(TemplateError::InvalidDumpLine(line_number));
        }
        let team_a = tokens[0]
            .parse()
            .map_err(|_| TemplateError::InvalidDumpLine(line_number))?;
        let team_b = tokens[1]
            .parse()
            .map_err(|_| TemplateError::InvalidDumpLine(line_number))?;
        pairings.push(Pairing::new(team_a, team_b));
    }
    Ok(pairings)
}

/// Picks the input mode: a non-blank dump takes precedence over the lists.
pub fn collect_pairings(
    dump: Option<&str>,
    team1: &[String],
    team2: &[String],
    num_teams: i32,
) -> Result<Vec<Pairing>, TemplateError> {
    match dump.filter(|d| !d.trim().is_empty()) {
        Some(dump) => parse_race_order_dump(dump),
        None => pairings_from_lists(team1, team2, num_teams),
    }
}
