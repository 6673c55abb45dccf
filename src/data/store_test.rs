//! Credential store tests

use super::*;
use chrono::Utc;
use tempfile::TempDir;

/// Helper to create a test database
async fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::connect(&db_path).await.unwrap();
    (db, temp_dir)
}

fn test_user(username: &str) -> User {
    User {
        id: EntityId::new().0,
        username: username.to_string(),
        password_hash: "$scrypt$ln=17,r=8,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_database_connection() {
    let (_db, _temp_dir) = create_test_db().await;
    // Connection successful if we get here without panicking
}

#[tokio::test]
async fn test_insert_and_lookup_user() {
    let (db, _temp_dir) = create_test_db().await;

    let user = test_user("alice");
    let inserted = db.insert_user_if_username_free(&user).await.unwrap();
    assert!(inserted);

    // Lookup by username
    let retrieved = db.find_user_by_username("alice").await.unwrap();
    assert!(retrieved.is_some());
    let retrieved = retrieved.unwrap();
    assert_eq!(retrieved.id, user.id);
    assert_eq!(retrieved.username, "alice");
    assert_eq!(retrieved.password_hash, user.password_hash);

    // Lookup by id
    let retrieved = db.find_user_by_id(&user.id).await.unwrap();
    assert!(retrieved.is_some());
    assert_eq!(retrieved.unwrap().username, "alice");
}

#[tokio::test]
async fn test_unknown_username_is_none() {
    let (db, _temp_dir) = create_test_db().await;

    let retrieved = db.find_user_by_username("nobody").await.unwrap();
    assert!(retrieved.is_none());

    let retrieved = db.find_user_by_id("01ARZ3NDEKTSV4RRFFQ69G5FAV").await.unwrap();
    assert!(retrieved.is_none());
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let (db, _temp_dir) = create_test_db().await;

    let first = test_user("alice");
    assert!(db.insert_user_if_username_free(&first).await.unwrap());

    // Same username, different id and hash
    let second = test_user("alice");
    let inserted = db.insert_user_if_username_free(&second).await.unwrap();
    assert!(!inserted);

    // The original record is untouched
    let retrieved = db.find_user_by_username("alice").await.unwrap().unwrap();
    assert_eq!(retrieved.id, first.id);
    assert_eq!(db.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_count_users() {
    let (db, _temp_dir) = create_test_db().await;

    assert_eq!(db.count_users().await.unwrap(), 0);

    db.insert_user_if_username_free(&test_user("alice"))
        .await
        .unwrap();
    db.insert_user_if_username_free(&test_user("bob"))
        .await
        .unwrap();

    assert_eq!(db.count_users().await.unwrap(), 2);
}
