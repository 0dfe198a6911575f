use deskflow::adapters::sqlite::{
    all_embedded_migrations, initialize_database, initialize_from_config, verify_connection,
    Migrator,
};
use deskflow::domain::models::DatabaseConfig;

#[tokio::test]
async fn initialize_database_creates_file_and_applies_schema() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("deskflow.db");
    let url = format!("sqlite:{}", db_path.display());

    let pool = initialize_database(&url).await.expect("initialize database");
    assert!(db_path.exists());
    verify_connection(&pool).await.expect("verify connection");

    // Schema is present and usable.
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workflows")
        .fetch_one(&pool)
        .await
        .expect("query workflows");
    assert_eq!(count, 0);

    let migrator = Migrator::new(pool.clone());
    assert_eq!(migrator.get_current_version().await.expect("version"), 1);

    pool.close().await;
}

#[tokio::test]
async fn initialize_from_config_respects_the_configured_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("nested").join("deskflow.db");
    let config = DatabaseConfig {
        path: db_path.display().to_string(),
        max_connections: 2,
    };

    let pool = initialize_from_config(&config).await.expect("initialize");
    assert!(db_path.exists());
    verify_connection(&pool).await.expect("verify connection");
    pool.close().await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite:{}", dir.path().join("deskflow.db").display());

    let pool = initialize_database(&url).await.expect("first initialize");
    pool.close().await;

    // Re-opening the same database applies nothing new.
    let pool = initialize_database(&url).await.expect("second initialize");
    let migrator = Migrator::new(pool.clone());
    let applied = migrator
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .expect("rerun migrations");
    assert_eq!(applied, 0);

    pool.close().await;
}
