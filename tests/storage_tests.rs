use portfolio_api::models::SavedImage;
use portfolio_api::storage::{ImageStore, InMemoryImageStore};

fn image(id: &str, content_type: Option<&str>, data: &[u8]) -> SavedImage {
    SavedImage {
        id: id.to_string(),
        content_type: content_type.map(str::to_owned),
        data: data.to_vec(),
    }
}

#[tokio::test]
async fn test_put_and_get_roundtrip() {
    let store = InMemoryImageStore::new();

    store
        .put_image(&image("1234567", Some("image/png"), &[0xAA, 0xBB]))
        .await
        .unwrap();

    let fetched = store.get_image("1234567").await.unwrap().unwrap();
    assert_eq!(fetched.id, "1234567");
    assert_eq!(fetched.content_type.as_deref(), Some("image/png"));
    assert_eq!(fetched.data, vec![0xAA, 0xBB]);
}

#[tokio::test]
async fn test_get_unknown_id_is_none() {
    let store = InMemoryImageStore::new();
    assert!(store.get_image("7654321").await.unwrap().is_none());
}

#[tokio::test]
async fn test_colliding_identifier_overwrites_silently() {
    let store = InMemoryImageStore::new();

    store
        .put_image(&image("1234567", Some("image/png"), &[1]))
        .await
        .unwrap();
    // Same identifier, different blob: the later write wins outright.
    store
        .put_image(&image("1234567", Some("image/jpeg"), &[2, 3]))
        .await
        .unwrap();

    let fetched = store.get_image("1234567").await.unwrap().unwrap();
    assert_eq!(fetched.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(fetched.data, vec![2, 3]);
}

#[tokio::test]
async fn test_missing_content_type_is_preserved_as_none() {
    let store = InMemoryImageStore::new();

    store.put_image(&image("1234567", None, &[9])).await.unwrap();

    // The octet-stream fallback is applied at retrieval time by the handler,
    // not baked into the stored record.
    let fetched = store.get_image("1234567").await.unwrap().unwrap();
    assert!(fetched.content_type.is_none());
}

#[tokio::test]
async fn test_failing_double_errors_on_every_operation() {
    let store = InMemoryImageStore::new_failing();

    assert!(store.ensure_collection().await.is_err());
    assert!(store.put_image(&image("1234567", None, &[1])).await.is_err());
    assert!(store.get_image("1234567").await.is_err());
}
