//! Race order repository for database operations.

use domain::errors::StoreError;
use domain::models::{NewRaceOrder, RaceOrder, TemplateKey};
use domain::services::RaceOrderStore;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::race_order::encode_pairings;
use crate::entities::{RaceOrderEntity, RotationFrequencyDb};
use crate::metrics::{record_pool_metrics, QueryTimer};

/// Columns selected for a race order, including the author's email.
const RACE_ORDER_COLUMNS: &str = r#"
    r.id, r.num_divisions, r.num_teams, r.num_boats, r.frequency,
    r.master_teams, r.pairings, r.description, r.author_id,
    a.email AS author_email, r.created_at, r.updated_at
"#;

/// Repository for race order templates.
#[derive(Clone)]
pub struct RaceOrderRepository {
    pool: PgPool,
}

impl RaceOrderRepository {
    /// Creates a new RaceOrderRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn into_orders(entities: Vec<RaceOrderEntity>) -> Result<Vec<RaceOrder>, StoreError> {
        entities.into_iter().map(RaceOrder::try_from).collect()
    }
}

#[async_trait::async_trait]
impl RaceOrderStore for RaceOrderRepository {
    async fn list(&self) -> Result<Vec<RaceOrder>, StoreError> {
        let timer = QueryTimer::new("list_race_orders");
        let result = sqlx::query_as::<_, RaceOrderEntity>(&format!(
            r#"
            SELECT {RACE_ORDER_COLUMNS}
            FROM race_orders r
            LEFT JOIN admin_accounts a ON a.id = r.author_id
            ORDER BY r.num_divisions, r.num_teams, r.num_boats, r.master_teams, r.frequency
            "#
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Self::into_orders(result?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RaceOrder>, StoreError> {
        let timer = QueryTimer::new("find_race_order_by_id");
        let result = sqlx::query_as::<_, RaceOrderEntity>(&format!(
            r#"
            SELECT {RACE_ORDER_COLUMNS}
            FROM race_orders r
            LEFT JOIN admin_accounts a ON a.id = r.author_id
            WHERE r.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result?.map(RaceOrder::try_from).transpose()
    }

    async fn find_existing(&self, key: &TemplateKey) -> Result<Option<RaceOrder>, StoreError> {
        let timer = QueryTimer::new("find_race_order_by_key");
        let result = sqlx::query_as::<_, RaceOrderEntity>(&format!(
            r#"
            SELECT {RACE_ORDER_COLUMNS}
            FROM race_orders r
            LEFT JOIN admin_accounts a ON a.id = r.author_id
            WHERE r.num_divisions = $1 AND r.num_teams = $2 AND r.num_boats = $3
              AND r.frequency = $4 AND r.master_teams = $5
            "#
        ))
        .bind(key.num_divisions)
        .bind(key.num_teams)
        .bind(key.num_boats)
        .bind(RotationFrequencyDb::from(key.frequency))
        .bind(&key.master_teams)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result?.map(RaceOrder::try_from).transpose()
    }

    async fn save(&self, template: NewRaceOrder) -> Result<RaceOrder, StoreError> {
        let timer = QueryTimer::new("save_race_order");
        let result = sqlx::query_as::<_, RaceOrderEntity>(&format!(
            r#"
            WITH r AS (
                INSERT INTO race_orders
                    (num_divisions, num_teams, num_boats, frequency, master_teams,
                     pairings, description, author_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT ON CONSTRAINT race_orders_key DO UPDATE SET
                    pairings = EXCLUDED.pairings,
                    description = EXCLUDED.description,
                    author_id = EXCLUDED.author_id,
                    updated_at = NOW()
                RETURNING *
            )
            SELECT {RACE_ORDER_COLUMNS}
            FROM r
            LEFT JOIN admin_accounts a ON a.id = r.author_id
            "#
        ))
        .bind(template.key.num_divisions)
        .bind(template.key.num_teams)
        .bind(template.key.num_boats)
        .bind(RotationFrequencyDb::from(template.key.frequency))
        .bind(&template.key.master_teams)
        .bind(encode_pairings(&template.pairings))
        .bind(&template.description)
        .bind(template.author.as_ref().map(|a| a.id))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        RaceOrder::try_from(result?)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, StoreError> {
        let timer = QueryTimer::new("delete_race_orders");
        let result = sqlx::query("DELETE FROM race_orders WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        record_pool_metrics(&self.pool);
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
