//! Concurrent access: handle uniqueness, parallel cipher work and destroy races

use keycore::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const THREADS: usize = 8;
const CREATES_PER_THREAD: usize = 125;

#[test]
fn test_concurrent_creates_yield_distinct_handles() {
    let store = KeyStore::new();

    let handles: Vec<Handle> = thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    (0..CREATES_PER_THREAD)
                        .map(|_| {
                            store
                                .create(KeyAlgorithm::Ec, KeyParameters::Curve(EcCurve::P256))
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|worker| worker.join().unwrap())
            .collect()
    });

    let unique: HashSet<Handle> = handles.iter().copied().collect();
    assert_eq!(handles.len(), THREADS * CREATES_PER_THREAD);
    assert_eq!(unique.len(), 1000);
    assert_eq!(store.len(), 1000);
}

#[test]
fn test_parallel_cipher_work_on_distinct_handles() {
    let store = KeyStore::new();
    let handles: Vec<Handle> = (0..4)
        .map(|_| {
            store
                .create(KeyAlgorithm::Rsa, KeyParameters::ModulusBits(2048))
                .unwrap()
        })
        .collect();

    thread::scope(|scope| {
        for (index, handle) in handles.iter().copied().enumerate() {
            let store = &store;
            scope.spawn(move || {
                for round in 0..5u8 {
                    let message = [index as u8, round, 0xEE];
                    let ciphertext = store.encrypt(handle, Padding::Oaep, &message).unwrap();
                    let plaintext = store.decrypt(handle, Padding::Oaep, &ciphertext).unwrap();
                    assert_eq!(plaintext, message);
                }
            });
        }
    });
}

#[test]
fn test_destroy_racing_decrypt_never_exposes_wiped_material() {
    let store = KeyStore::new();
    let handle = store
        .create(KeyAlgorithm::Rsa, KeyParameters::ModulusBits(2048))
        .unwrap();
    let ciphertext = store.encrypt(handle, Padding::Oaep, b"racing").unwrap();

    thread::scope(|scope| {
        let readers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    for _ in 0..10 {
                        match store.decrypt(handle, Padding::Oaep, &ciphertext) {
                            Ok(plaintext) => assert_eq!(plaintext, b"racing"),
                            Err(err) => assert!(err.is_handle_not_found(), "unexpected {err}"),
                        }
                    }
                })
            })
            .collect();

        scope.spawn(|| {
            thread::sleep(Duration::from_millis(5));
            store.destroy(handle).unwrap();
        });

        for reader in readers {
            reader.join().unwrap();
        }
    });

    assert!(!store.contains(handle));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_blocking_pool_with_caller_timeout() {
    let store = Arc::new(KeyStore::new());

    let creator = Arc::clone(&store);
    let handle = tokio::task::spawn_blocking(move || {
        creator.create(KeyAlgorithm::Rsa, KeyParameters::ModulusBits(2048))
    })
    .await
    .unwrap()
    .unwrap();

    let encryptor = Arc::clone(&store);
    let ciphertext = tokio::time::timeout(
        Duration::from_secs(60),
        tokio::task::spawn_blocking(move || encryptor.encrypt(handle, Padding::Oaep, b"pooled")),
    )
    .await
    .expect("encrypt timed out")
    .unwrap()
    .unwrap();

    let decryptor = Arc::clone(&store);
    let plaintext = tokio::time::timeout(
        Duration::from_secs(60),
        tokio::task::spawn_blocking(move || decryptor.decrypt(handle, Padding::Oaep, &ciphertext)),
    )
    .await
    .expect("decrypt timed out")
    .unwrap()
    .unwrap();

    assert_eq!(plaintext, b"pooled");
    store.destroy(handle).unwrap();
}
