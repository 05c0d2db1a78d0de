mod support;

use support::{memory_config, setup_test_db};
use user_service_lib::infra::Database;

#[tokio::test]
async fn test_ping() {
    let db = setup_test_db().await;

    assert!(db.ping().await.is_ok());
}

#[tokio::test]
async fn test_migration_status_after_connect() {
    let db = setup_test_db().await;

    let status = db.migration_status().await.unwrap();

    assert_eq!(status.len(), 2);
    assert!(status.iter().all(|(_, applied)| *applied));
}

#[tokio::test]
async fn test_migration_status_without_migrations() {
    let db = Database::connect_without_migrations(&memory_config())
        .await
        .unwrap();
    db.run_migrations().await.unwrap();
    db.rollback_migration().await.unwrap();

    let status = db.migration_status().await.unwrap();

    assert_eq!(
        status.iter().filter(|(_, applied)| *applied).count(),
        1
    );
}
