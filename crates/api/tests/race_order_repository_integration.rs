//! PostgreSQL tests for the race order and API key repositories.
//!
//! These need a database: set TEST_DATABASE_URL and run with
//! `cargo test -- --ignored`.

mod common;

use common::create_test_pool;
use domain::models::{AuthorRef, NewRaceOrder, Pairing, RotationFrequency, TemplateKey};
use domain::services::{CredentialStore, RaceOrderStore};
use persistence::repositories::{ApiKeyRepository, RaceOrderRepository};
use sqlx::PgPool;
use uuid::Uuid;

/// Boat count no other test run uses, so keys never collide in a shared
/// database.
fn unique_boats() -> i32 {
    (Uuid::new_v4().as_u128() % 900_000) as i32 + 100_000
}

async fn create_author(pool: &PgPool) -> AuthorRef {
    let email = format!("scorer-{}@regatta.test", Uuid::new_v4());
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO admin_accounts (email, is_admin) VALUES ($1, TRUE) RETURNING id",
    )
    .bind(&email)
    .fetch_one(pool)
    .await
    .unwrap();
    AuthorRef { id, email }
}

fn key(
    num_teams: i32,
    num_boats: i32,
    frequency: RotationFrequency,
    master: Option<Vec<i32>>,
) -> TemplateKey {
    TemplateKey::new(1, num_teams, num_boats, frequency, master).unwrap()
}

fn three_team_order(key: TemplateKey, reversed: bool) -> NewRaceOrder {
    let pairings = if reversed {
        vec![Pairing::new(2, 1), Pairing::new(3, 2), Pairing::new(1, 3)]
    } else {
        vec![Pairing::new(1, 2), Pairing::new(2, 3), Pairing::new(3, 1)]
    };
    NewRaceOrder {
        key,
        pairings,
        description: None,
        author: None,
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_save_same_key_updates_row_in_place() {
    let pool = create_test_pool().await;
    let repo = RaceOrderRepository::new(pool.clone());
    let author = create_author(&pool).await;
    let key = key(3, unique_boats(), RotationFrequency::Frequent, None);

    let first = repo
        .save(NewRaceOrder {
            description: Some("Nationals order".to_string()),
            author: Some(author.clone()),
            ..three_team_order(key.clone(), false)
        })
        .await
        .unwrap();
    assert_eq!(first.author.as_ref().map(|a| a.email.as_str()), Some(author.email.as_str()));

    let second = repo.save(three_team_order(key.clone(), true)).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.pairings[0], Pairing::new(2, 1));
    assert_eq!(second.description, None);
    assert!(second.author.is_none());

    let found = repo.find_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(found.pairings, second.pairings);

    repo.delete_many(&[first.id]).await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_absent_and_empty_master_teams_share_a_key() {
    let pool = create_test_pool().await;
    let repo = RaceOrderRepository::new(pool);
    let boats = unique_boats();

    let saved = repo
        .save(three_team_order(key(3, boats, RotationFrequency::None, Some(vec![])), false))
        .await
        .unwrap();

    let found = repo
        .find_existing(&key(3, boats, RotationFrequency::None, None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, saved.id);
    assert!(found.key.master_teams.is_empty());

    let resaved = repo
        .save(three_team_order(key(3, boats, RotationFrequency::None, None), true))
        .await
        .unwrap();
    assert_eq!(resaved.id, saved.id);

    let grouped = repo
        .find_existing(&key(3, boats, RotationFrequency::None, Some(vec![1, 2])))
        .await
        .unwrap();
    assert!(grouped.is_none());

    repo.delete_many(&[saved.id]).await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_list_orders_by_key() {
    let pool = create_test_pool().await;
    let repo = RaceOrderRepository::new(pool);
    let boats = unique_boats();

    let four_grouped_none = repo
        .save(three_team_order(key(4, boats, RotationFrequency::None, Some(vec![2, 2])), false))
        .await
        .unwrap();
    let four_grouped_frequent = repo
        .save(three_team_order(key(4, boats, RotationFrequency::Frequent, Some(vec![2, 2])), false))
        .await
        .unwrap();
    let four_plain = repo
        .save(three_team_order(key(4, boats, RotationFrequency::Frequent, None), false))
        .await
        .unwrap();
    let three_plain = repo
        .save(three_team_order(key(3, boats, RotationFrequency::Frequent, None), false))
        .await
        .unwrap();

    let expected = vec![
        three_plain.id,
        four_plain.id,
        four_grouped_frequent.id,
        four_grouped_none.id,
    ];
    let listed: Vec<Uuid> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|order| order.id)
        .filter(|id| expected.contains(id))
        .collect();
    assert_eq!(listed, expected);

    repo.delete_many(&expected).await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_delete_many_counts_removed_rows() {
    let pool = create_test_pool().await;
    let repo = RaceOrderRepository::new(pool);
    let boats = unique_boats();

    let first = repo
        .save(three_team_order(key(3, boats, RotationFrequency::Frequent, None), false))
        .await
        .unwrap();
    let second = repo
        .save(three_team_order(key(3, boats, RotationFrequency::Infrequent, None), false))
        .await
        .unwrap();

    let deleted = repo
        .delete_many(&[first.id, second.id, Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert!(repo.find_by_id(first.id).await.unwrap().is_none());
    assert!(repo.find_by_id(second.id).await.unwrap().is_none());

    assert_eq!(repo.delete_many(&[first.id]).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_api_key_lookup_joins_account() {
    let pool = create_test_pool().await;
    let repo = ApiKeyRepository::new(pool.clone());
    let author = create_author(&pool).await;
    let raw_key = format!("ra_{}", Uuid::new_v4().simple());
    let hash = shared::crypto::sha256_hex(&raw_key);

    sqlx::query(
        "INSERT INTO api_keys (account_id, key_hash, key_prefix, name) VALUES ($1, $2, $3, 'test')",
    )
    .bind(author.id)
    .bind(&hash)
    .bind(shared::crypto::extract_key_prefix(&raw_key).unwrap())
    .execute(&pool)
    .await
    .unwrap();

    let credential = repo.find_by_key_hash(&hash).await.unwrap().unwrap();
    assert_eq!(credential.email, author.email);
    assert!(credential.is_admin);
    assert!(credential.is_valid());

    repo.touch(credential.key_id).await.unwrap();
    assert!(repo.find_by_key_hash("0".repeat(64).as_str()).await.unwrap().is_none());
}
