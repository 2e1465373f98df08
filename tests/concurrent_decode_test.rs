mod common;
use common::*;

use futures::future::join_all;
use pgenum::codec::{ColumnCodec, EnumColumnCodec, RawValue};
use pgenum::{EnumRegistry, PgEnum, PgEnumError, global_registry};
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const ITERATIONS: usize = 1_000;

#[test]
fn test_racing_registrations_publish_one_descriptor() {
    init_tracing();
    let registry = Arc::new(EnumRegistry::new());

    let descriptors: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let registry = Arc::clone(&registry);
                s.spawn(move || registry.register::<PostStatus>(POST_STATUS_TYPE).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(registry.len(), 1);
    for descriptor in &descriptors[1..] {
        assert!(Arc::ptr_eq(&descriptors[0], descriptor));
    }
}

#[test]
fn test_concurrent_decode_from_threads() {
    init_tracing();
    let registry = EnumRegistry::new();
    registry.register::<PostStatus>(POST_STATUS_TYPE).unwrap();
    let codec = EnumColumnCodec::<PostStatus>::new(&registry).unwrap();

    thread::scope(|s| {
        for t in 0..THREADS {
            let codec = codec.clone();
            s.spawn(move || {
                for i in 0..ITERATIONS {
                    let expected = PostStatus::VARIANTS[(t + i) % PostStatus::VARIANTS.len()];
                    let raw = RawValue::from(expected.label());
                    assert_eq!(codec.decode(&raw).unwrap(), Some(expected));

                    let encoded = codec.encode(Some(&expected)).unwrap();
                    assert_eq!(encoded.label(), Some(expected.label()));
                }
                assert!(matches!(
                    codec.decode(&RawValue::from("UNKNOWN")),
                    Err(PgEnumError::UnknownEnumLabel { .. })
                ));
            });
        }
    });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_decode_from_tasks() {
    init_tracing();
    global_registry().register::<PostStatus>(POST_STATUS_TYPE).unwrap();

    let tasks = (0..64).map(|n| {
        tokio::spawn(async move {
            // Each task resolves its own codec from the shared registry
            let codec = EnumColumnCodec::<PostStatus>::global()?;
            let mut decoded = Vec::with_capacity(PostStatus::VARIANTS.len());
            for label in PostStatus::labels() {
                decoded.push(codec.decode(&RawValue::from(label))?);
                tokio::task::yield_now().await;
            }
            let null = codec.decode(&RawValue::Null)?;
            Ok::<_, PgEnumError>((n, decoded, null))
        })
    });

    for result in join_all(tasks).await {
        let (_, decoded, null) = result.unwrap().unwrap();
        assert_eq!(
            decoded,
            vec![Some(PostStatus::PENDING), Some(PostStatus::APPROVED), Some(PostStatus::SPAM)]
        );
        assert_eq!(null, None);
    }
}

#[tokio::test]
async fn test_registry_reads_during_registration() {
    init_tracing();
    let registry = Arc::new(EnumRegistry::new());

    let reader = {
        let registry = Arc::clone(&registry);
        tokio::task::spawn_blocking(move || {
            // Either unregistered or fully registered, never partial
            for _ in 0..ITERATIONS {
                match registry.get::<PostStatus>() {
                    Ok(descriptor) => assert_eq!(descriptor.labels(), PostStatus::labels().as_slice()),
                    Err(err) => assert!(matches!(err, PgEnumError::UnregisteredFamily { .. })),
                }
            }
        })
    };

    registry.register::<PostStatus>(POST_STATUS_TYPE).unwrap();
    reader.await.unwrap();
    assert!(registry.is_registered::<PostStatus>());
}
