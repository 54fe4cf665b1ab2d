mod common;

use green_server::{AppError, FileMetadata, FileStore, LocalFileStore};

#[tokio::test]
async fn test_local_store_writes_and_returns_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new(dir.path().join("uploads"), "http://cdn.test/files/");

    let meta = FileMetadata {
        original_name: Some("cake.jpg".into()),
        content_type: Some("image/jpeg".into()),
    };
    let url = store.upload_file(b"jpeg bytes", &meta).await.unwrap();

    let key = url.strip_prefix("http://cdn.test/files/").unwrap();
    assert!(key.ends_with(".jpg"));
    let stored = std::fs::read(dir.path().join("uploads").join(key)).unwrap();
    assert_eq!(stored, b"jpeg bytes");
}

#[tokio::test]
async fn test_local_store_rejects_empty_and_oversized() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new(dir.path(), "http://cdn.test");
    let meta = FileMetadata::default();

    let err = store.upload_file(&[], &meta).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let big = vec![0u8; green_server::services::MAX_FILE_SIZE + 1];
    let err = store.upload_file(&big, &meta).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_product_image_upload_records_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileStore::new(dir.path(), "http://cdn.test");
    let state = common::state().await;
    common::merchant(&state, "bakery").await;
    let cat = common::category(&state, "Cakes").await;
    let cake = common::product(&state, "bakery", cat, "Sponge", 4.5).await;

    let meta = FileMetadata {
        original_name: None,
        content_type: Some("image/png".into()),
    };
    let updated = state
        .catalog
        .upload_product_image(cake.id, b"png bytes", &meta, &store)
        .await
        .unwrap();
    let url = updated.image_url.unwrap();
    assert!(url.starts_with("http://cdn.test/"));
    assert!(url.ends_with(".png"));

    let err = state
        .catalog
        .upload_product_image(cake.id + 1, b"png bytes", &meta, &store)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(green_server::EntityKind::Product)));
}

#[tokio::test]
async fn test_state_uses_configured_store() {
    let state = common::state().await;
    common::merchant(&state, "bakery").await;
    let cat = common::category(&state, "Cakes").await;
    let cake = common::product(&state, "bakery", cat, "Sponge", 4.5).await;

    let meta = FileMetadata {
        original_name: Some("sponge.webp".into()),
        content_type: None,
    };
    let updated = state
        .upload_product_image(cake.id, b"webp bytes", &meta)
        .await
        .unwrap();
    let url = updated.image_url.unwrap();
    assert!(url.starts_with("http://localhost:3000/uploads/"));
    assert!(url.ends_with(".webp"));
}
