//! Race order entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::errors::StoreError;
use domain::models::{AuthorRef, Pairing, RaceOrder, RotationFrequency, TemplateKey};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for rotation_frequency that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "rotation_frequency", rename_all = "lowercase")]
pub enum RotationFrequencyDb {
    Frequent,
    Infrequent,
    None,
}

impl From<RotationFrequencyDb> for RotationFrequency {
    fn from(db: RotationFrequencyDb) -> Self {
        match db {
            RotationFrequencyDb::Frequent => RotationFrequency::Frequent,
            RotationFrequencyDb::Infrequent => RotationFrequency::Infrequent,
            RotationFrequencyDb::None => RotationFrequency::None,
        }
    }
}

impl From<RotationFrequency> for RotationFrequencyDb {
    fn from(frequency: RotationFrequency) -> Self {
        match frequency {
            RotationFrequency::Frequent => RotationFrequencyDb::Frequent,
            RotationFrequency::Infrequent => RotationFrequencyDb::Infrequent,
            RotationFrequency::None => RotationFrequencyDb::None,
        }
    }
}

/// Database row mapping for the race_orders table, with the author's email.
#[derive(Debug, Clone, FromRow)]
pub struct RaceOrderEntity {
    pub id: Uuid,
    pub num_divisions: i32,
    pub num_teams: i32,
    pub num_boats: i32,
    pub frequency: RotationFrequencyDb,
    pub master_teams: Vec<i32>,
    pub pairings: Vec<String>,
    pub description: Option<String>,
    pub author_id: Option<Uuid>,
    pub author_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Encodes pairings in the stored `"A-B"` form.
pub fn encode_pairings(pairings: &[Pairing]) -> Vec<String> {
    pairings.iter().map(Pairing::to_string).collect()
}

impl TryFrom<RaceOrderEntity> for RaceOrder {
    type Error = StoreError;

    fn try_from(entity: RaceOrderEntity) -> Result<Self, Self::Error> {
        let pairings = entity
            .pairings
            .iter()
            .map(|p| p.parse::<Pairing>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Backend(format!("race order {}: {}", entity.id, e)))?;

        let author = match (entity.author_id, entity.author_email) {
            (Some(id), Some(email)) => Some(AuthorRef { id, email }),
            _ => None,
        };

        Ok(Self {
            id: entity.id,
            // Rows are written from validated keys, so no re-validation here.
            key: TemplateKey {
                num_divisions: entity.num_divisions,
                num_teams: entity.num_teams,
                num_boats: entity.num_boats,
                frequency: entity.frequency.into(),
                master_teams: entity.master_teams,
            },
            pairings,
            description: entity.description,
            author,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
