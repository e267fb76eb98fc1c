//! Domain error types.

use thiserror::Error;

/// User-facing validation failure while processing a race order submission.
///
/// Every variant aborts the submission; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Invalid number of teams specified.")]
    InvalidTeamCount,

    #[error("Invalid number of boats specified.")]
    InvalidBoatCount,

    #[error("Invalid number of boats per team specified.")]
    InvalidDivisionCount,

    #[error("Invalid number of boats in flight given number of boats per team.")]
    BoatsNotDivisible,

    #[error("Invalid rotation frequency specified.")]
    InvalidFrequency,

    #[error("Master team sizes must add up to the number of teams.")]
    MasterTeamsMismatch,

    #[error("Invalid or incomplete list for \"Team A\".")]
    IncompleteTeamAList,

    #[error("Invalid or incomplete list for \"Team B\".")]
    IncompleteTeamBList,

    #[error("Invalid Team A index provided.")]
    InvalidTeamA,

    #[error("Invalid partner for Team A provided.")]
    InvalidTeamB,

    #[error("Invalid team pairing in line {0}.")]
    InvalidDumpLine(usize),

    #[error("Teams cannot sail against themselves.")]
    SelfPairing,

    #[error("Invalid team pairing provided.")]
    InvalidPairing,

    #[error("Duplicate team pairing provided.")]
    DuplicatePairing,

    #[error("Not all pairings have been accounted for.")]
    MissingPairings,
}

/// Failure reported by a template or credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_messages() {
        assert_eq!(
            TemplateError::SelfPairing.to_string(),
            "Teams cannot sail against themselves."
        );
        assert_eq!(
            TemplateError::MissingPairings.to_string(),
            "Not all pairings have been accounted for."
        );
        assert_eq!(
            TemplateError::InvalidDumpLine(3).to_string(),
            "Invalid team pairing in line 3."
        );
        assert_eq!(
            TemplateError::IncompleteTeamAList.to_string(),
            "Invalid or incomplete list for \"Team A\"."
        );
    }

    #[test]
    fn test_store_error_from_sqlx() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Unavailable(_)));

        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
