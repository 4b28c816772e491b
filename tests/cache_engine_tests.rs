//! Integration Tests for the Cache Engine
//!
//! Exercises the public cache contract with the real system clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use herd_cache::{cache_key, create_key, Cache, CacheConfig};
use herd_cache::cache::KeyPart;

fn cache_with(max_size: usize) -> Cache<String> {
    Cache::new(CacheConfig::new(max_size, Duration::from_secs(300)).unwrap())
}

#[test]
fn test_round_trip() {
    let cache = cache_with(100);

    cache.set("animal:1", "Bessie".to_string());

    assert_eq!(cache.get("animal:1"), Some("Bessie".to_string()));
}

#[test]
fn test_expiry_counts_a_miss() {
    let cache = cache_with(100);

    cache.set_with_ttl("k", "v".to_string(), Duration::from_millis(50));
    sleep(Duration::from_millis(60));

    let misses_before = cache.metrics().misses;
    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.metrics().misses, misses_before + 1);
    assert_eq!(cache.size(), 0);
}

#[test]
fn test_bounded_size_evicts_least_recently_used() {
    let cache = cache_with(3);

    cache.set("k1", "1".to_string());
    cache.set("k2", "2".to_string());
    cache.set("k3", "3".to_string());
    cache.get("k1");
    cache.set("k4", "4".to_string());

    assert_eq!(cache.get("k2"), None);
    assert!(cache.get("k1").is_some());
    assert!(cache.get("k3").is_some());
    assert!(cache.get("k4").is_some());
    assert_eq!(cache.metrics().evictions, 1);
}

#[test]
fn test_refresh_does_not_evict() {
    let cache = cache_with(3);

    cache.set("k1", "1".to_string());
    cache.set("k2", "2".to_string());
    cache.set("k3", "3".to_string());

    for round in 0..5 {
        cache.set("k2", format!("refresh {}", round));
        assert_eq!(cache.size(), 3);
    }

    assert_eq!(cache.metrics().evictions, 0);
    assert!(cache.has("k1"));
}

#[test]
fn test_prefix_invalidation() {
    let cache = cache_with(100);

    cache.set("user:1", "a".to_string());
    cache.set("user:2", "b".to_string());
    cache.set("post:1", "c".to_string());

    assert_eq!(cache.invalidate_prefix("user:"), 2);
    assert_eq!(cache.get("user:1"), None);
    assert_eq!(cache.get("user:2"), None);
    assert_eq!(cache.get("post:1"), Some("c".to_string()));
}

#[test]
fn test_cleanup_exactness() {
    let cache = cache_with(100);

    cache.set_with_ttl("short:1", "x".to_string(), Duration::from_millis(20));
    cache.set_with_ttl("short:2", "x".to_string(), Duration::from_millis(20));
    cache.set_with_ttl("long", "kept".to_string(), Duration::from_secs(60));
    cache.get("long");
    let before = cache.peek_metadata("long").unwrap();

    sleep(Duration::from_millis(40));

    assert_eq!(cache.cleanup(), 2);
    assert_eq!(cache.size(), 1);

    let after = cache.peek_metadata("long").unwrap();
    assert_eq!(after.access_count, before.access_count);
    assert_eq!(after.ttl, before.ttl);
    assert_eq!(cache.get("long"), Some("kept".to_string()));
}

#[test]
fn test_hit_ratio() {
    let cache = cache_with(100);
    assert_eq!(cache.metrics().hit_ratio, 0.0);

    cache.set("k", "v".to_string());
    cache.get("k");
    cache.get("k");
    cache.get("k");
    cache.get("missing");

    let metrics = cache.metrics();
    assert_eq!(metrics.hits, 3);
    assert_eq!(metrics.misses, 1);
    assert_eq!(metrics.hit_ratio, 0.75);
}

#[test]
fn test_key_construction_is_deterministic() {
    let expected = "user:123:profile";

    for _ in 0..3 {
        assert_eq!(cache_key!("user", 123, "profile"), expected);
        assert_eq!(
            create_key([KeyPart::from("user"), KeyPart::from(123), KeyPart::from("profile")]),
            expected
        );
    }
}

#[test]
fn test_shared_across_threads() {
    let cache = cache_with(1000);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let cache = cache.clone();
            std::thread::spawn(move || {
                for i in 0..100 {
                    let key = cache_key!("thread", t, i);
                    cache.set(key.clone(), key.clone());
                    assert_eq!(cache.get(&key), Some(key));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.size(), 400);
    assert_eq!(cache.metrics().hits, 400);
}

#[tokio::test]
async fn test_get_or_set_error_propagates_unchanged() {
    #[derive(Debug, PartialEq)]
    struct DecodeError(&'static str);

    let cache = cache_with(10);

    let result = cache
        .get_or_set("image:7", || async { Err::<String, _>(DecodeError("bad header")) })
        .await;

    assert_eq!(result, Err(DecodeError("bad header")));
    assert!(!cache.has("image:7"));
    assert_eq!(cache.size(), 0);
}

#[tokio::test]
async fn test_get_or_set_single_flight_across_tasks() {
    let cache: Cache<Arc<String>> =
        Cache::new(CacheConfig::new(10, Duration::from_secs(60)).unwrap());
    let calls = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let cache = cache.clone();
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .get_or_set("stats:herd:1", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, String>(Arc::new("summary".to_string()))
                    })
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().as_str(), "summary");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let metrics = cache.metrics();
    assert_eq!(metrics.hits + metrics.misses, 16);
}
