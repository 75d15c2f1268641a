use std::sync::Arc;
use std::time::Duration;

use certum_nullables::{NullContentStore, StoreCall};
use certum_store::{fetch_metadata, FetchError, ImageAsset, PublishError, Publisher, StoreError};
use certum_types::{Attribute, MetadataDocument, MetadataProperties};

fn document(name: &str, serial: &str) -> MetadataDocument {
    MetadataDocument {
        name: name.into(),
        description: "Noise cancelling".into(),
        image_reference: None,
        attributes: vec![
            Attribute {
                trait_type: "Category".into(),
                value: "Electronics".into(),
            },
            Attribute {
                trait_type: "Serial".into(),
                value: serial.into(),
            },
        ],
        properties: MetadataProperties::default(),
    }
}

fn publisher(store: &Arc<NullContentStore>) -> Publisher<NullContentStore> {
    Publisher::new(store.clone(), Duration::from_millis(200))
}

#[tokio::test]
async fn published_document_reads_back_unchanged() {
    let store = Arc::new(NullContentStore::new());
    let doc = document("Solana Headphones V1", "SH-001");

    let published = publisher(&store).publish_metadata(&doc).await.unwrap();
    let fetched = fetch_metadata(store.as_ref(), &published.uri, Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(fetched, doc);
    assert_eq!(
        store.calls()[0],
        StoreCall::PublishJson {
            name: "Solana-Headphones-V1-metadata.json".into()
        }
    );
}

#[tokio::test]
async fn identical_content_gets_identical_identifier() {
    let store = Arc::new(NullContentStore::new());
    let publisher = publisher(&store);
    let doc = document("Widget", "W-1");

    let first = publisher.publish_metadata(&doc).await.unwrap();
    let second = publisher.publish_metadata(&doc).await.unwrap();
    let other = publisher
        .publish_metadata(&document("Widget", "W-2"))
        .await
        .unwrap();

    assert_eq!(first.cid, second.cid);
    assert_ne!(first.cid, other.cid);
    assert_eq!(store.object_count(), 2);
}

#[tokio::test]
async fn duplicate_traits_never_reach_the_store() {
    let store = Arc::new(NullContentStore::new());
    let mut doc = document("Widget", "W-1");
    doc.attributes.push(Attribute {
        trait_type: "Serial".into(),
        value: "W-2".into(),
    });

    let err = publisher(&store).publish_metadata(&doc).await.unwrap_err();
    assert!(matches!(err, PublishError::InvalidDocument(_)));
    assert_eq!(store.publish_count(), 0);
}

#[tokio::test]
async fn store_failure_names_the_asset() {
    let store = Arc::new(NullContentStore::new());
    store.fail_publishes(StoreError::Http {
        status: 503,
        detail: "maintenance".into(),
    });

    let image = ImageAsset::new(vec![0x89, b'P', b'N', b'G', 1, 2, 3], "widget.png");
    match publisher(&store).publish_image(&image).await {
        Err(PublishError::Store { asset, source }) => {
            assert_eq!(asset, "image widget.png");
            assert!(source.is_retryable());
        }
        other => panic!("expected store failure, got {other:?}"),
    }
}

#[tokio::test]
async fn hung_store_times_out() {
    let store = Arc::new(NullContentStore::new());
    store.set_delay(Duration::from_secs(5));

    let err = publisher(&store)
        .publish_metadata(&document("Widget", "W-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, PublishError::Timeout { .. }));
}

#[tokio::test]
async fn fetch_of_non_document_is_malformed() {
    let store = Arc::new(NullContentStore::new());
    let published = store.insert(b"not json".to_vec());

    let err = fetch_metadata(store.as_ref(), &published.uri, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Malformed(_)));
}
