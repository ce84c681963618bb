#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use std::sync::Arc;

    use crate::cache::{
        read_through, CacheError, CacheKey, CacheStatus, CacheStore, CachedValue, Lookup,
        ResponseCache,
    };
    use crate::config;
    use crate::model::Source;
    use crate::shared::time::ManualClock;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn setup() -> (Arc<ManualClock>, ResponseCache) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 6, 15, 8, 0, 0).unwrap(),
        ));
        let cache = ResponseCache::new(&config::new_test_config(), clock.clone());
        (clock, cache)
    }

    fn put(cache: &ResponseCache, key: CacheKey, value: CachedValue) {
        let generation = cache.generation(key.device());
        assert!(cache.put(key, value, generation).unwrap());
    }

    #[test]
    fn test_keys_are_deterministic_and_distinct() {
        let a = CacheKey::period("47200413", d("2025-01-01"), d("2025-06-30"));
        let b = CacheKey::period("47200413", d("2025-01-01"), d("2025-06-30"));
        let c = CacheKey::period("47100144", d("2025-01-01"), d("2025-06-30"));
        let m = CacheKey::monthly("47200413", 2025);

        assert_eq!(a, b);
        assert_eq!(a.hash(), b.hash());
        assert_ne!(a.hash(), c.hash());
        assert_eq!(a.as_str(), "yoy:period:47200413:2025-01-01:2025-06-30");
        assert_eq!(m.as_str(), "yoy:monthly:47200413:2025");
        assert_eq!(m.device(), "47200413");
    }

    #[test]
    fn test_read_through_computes_once_then_serves_cached() {
        let (_, cache) = setup();
        let key = CacheKey::monthly("47200413", 2024);
        let mut calls = 0;

        let first = read_through::<()>(&cache, key.clone(), || {
            calls += 1;
            Ok(CachedValue::Total(7))
        })
        .unwrap();
        assert_eq!(first, Lookup::Live(CachedValue::Total(7)));
        assert_eq!(first.source(), Source::Live);

        let second = read_through::<()>(&cache, key, || {
            calls += 1;
            Ok(CachedValue::Total(99))
        })
        .unwrap();
        assert_eq!(second, Lookup::Cached(CachedValue::Total(7)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_expired_entries_are_never_served() {
        let (clock, cache) = setup();
        let key = CacheKey::period("47100122", d("2024-01-01"), d("2024-12-31"));
        put(&cache, key.clone(), CachedValue::Total(1));

        clock.advance(Duration::hours(23));
        assert_eq!(cache.get(&key).unwrap(), Some(CachedValue::Total(1)));

        clock.advance(Duration::hours(1));
        assert_eq!(cache.get(&key).unwrap(), None);

        // rewinding does not bring it back: the entry was dropped on read
        clock.advance(Duration::hours(-24));
        assert_eq!(cache.get(&key).unwrap(), None);
        assert_eq!(cache.status().total_cached_entries, 0);
    }

    #[test]
    fn test_status_lists_live_entries_most_recent_first() {
        let (clock, cache) = setup();
        for year in 2015..2030 {
            put(&cache, CacheKey::monthly("47200413", year), CachedValue::Monthly([0; 12]));
            clock.advance(Duration::minutes(1));
        }

        let CacheStatus {
            total_cached_entries,
            cache_ttl_hours,
            recent_entries,
        } = cache.status();
        assert_eq!(total_cached_entries, 15);
        assert_eq!(cache_ttl_hours, 24);
        assert_eq!(recent_entries.len(), 10);
        assert_eq!(recent_entries[0].cache_key, "yoy:monthly:47200413:2029");
        for pair in recent_entries.windows(2) {
            assert!(pair[0].cached_at >= pair[1].cached_at);
        }
    }

    #[test]
    fn test_clear_drops_everything() {
        let (_, cache) = setup();
        put(&cache, CacheKey::monthly("1", 2024), CachedValue::Total(1));
        put(&cache, CacheKey::monthly("2", 2024), CachedValue::Total(2));

        assert_eq!(cache.clear(), 2);
        assert_eq!(cache.status().total_cached_entries, 0);
        assert_eq!(cache.clear(), 0);
    }

    #[test]
    fn test_invalidate_device_keeps_other_devices() {
        let (_, cache) = setup();
        put(&cache, CacheKey::monthly("1", 2024), CachedValue::Total(1));
        put(&cache, CacheKey::monthly("1", 2025), CachedValue::Total(1));
        put(&cache, CacheKey::monthly("2", 2024), CachedValue::Total(2));

        assert_eq!(cache.invalidate_device("1"), 2);
        assert_eq!(cache.status().total_cached_entries, 1);
        assert!(cache.get(&CacheKey::monthly("2", 2024)).unwrap().is_some());
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let (clock, cache) = setup();
        put(&cache, CacheKey::monthly("1", 2024), CachedValue::Total(1));
        clock.advance(Duration::hours(20));
        put(&cache, CacheKey::monthly("2", 2024), CachedValue::Total(2));
        clock.advance(Duration::hours(5));

        assert_eq!(cache.sweep(), 1);
        assert_eq!(cache.status().total_cached_entries, 1);
    }

    #[test]
    fn test_disabled_cache_always_computes() {
        let mut cfg = config::new_test_config();
        if let Some(c) = cfg.dashboard.cache.as_mut() {
            c.enabled = false;
        }
        let cache = ResponseCache::new(&cfg, Arc::new(ManualClock::new(Utc::now())));
        let key = CacheKey::monthly("1", 2024);

        for _ in 0..2 {
            let got = read_through::<()>(&cache, key.clone(), || Ok(CachedValue::Total(3))).unwrap();
            assert_eq!(got.source(), Source::Live);
        }
        assert_eq!(cache.status().total_cached_entries, 0);
    }

    struct Broken;

    impl CacheStore for Broken {
        fn get(&self, _key: &CacheKey) -> Result<Option<CachedValue>, CacheError> {
            Err(CacheError::Unavailable("disk gone".to_string()))
        }
        fn generation(&self, _device_id: &str) -> u64 {
            0
        }
        fn put(&self, _key: CacheKey, _value: CachedValue, _generation: u64) -> Result<bool, CacheError> {
            Err(CacheError::Unavailable("disk gone".to_string()))
        }
        fn status(&self) -> CacheStatus {
            CacheStatus {
                total_cached_entries: 0,
                cache_ttl_hours: 24,
                recent_entries: vec![],
            }
        }
        fn clear(&self) -> usize {
            0
        }
        fn invalidate_device(&self, _device_id: &str) -> usize {
            0
        }
        fn sweep(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_failing_store_degrades_to_live() {
        let got = read_through::<()>(&Broken, CacheKey::monthly("1", 2024), || {
            Ok(CachedValue::Total(5))
        })
        .unwrap();
        assert_eq!(got, Lookup::Live(CachedValue::Total(5)));
    }

    #[test]
    fn test_value_computed_across_an_invalidation_is_not_stored() {
        let (_, cache) = setup();
        let key = CacheKey::period("47200413", d("2025-01-01"), d("2025-06-30"));

        let got = read_through::<()>(&cache, key.clone(), || {
            // new jobs land while the figure is being computed
            cache.invalidate_device("47200413");
            Ok(CachedValue::Total(100))
        })
        .unwrap();
        assert_eq!(got, Lookup::Live(CachedValue::Total(100)));
        assert_eq!(cache.get(&key).unwrap(), None);

        let again = read_through::<()>(&cache, key.clone(), || Ok(CachedValue::Total(120))).unwrap();
        assert_eq!(again, Lookup::Live(CachedValue::Total(120)));
        assert_eq!(cache.get(&key).unwrap(), Some(CachedValue::Total(120)));
    }

    #[test]
    fn test_clear_rejects_writes_started_before_it() {
        let (_, cache) = setup();
        let key = CacheKey::monthly("1", 2024);
        let generation = cache.generation("1");

        cache.clear();
        assert!(!cache.put(key.clone(), CachedValue::Total(1), generation).unwrap());
        assert_eq!(cache.get(&key).unwrap(), None);
    }

    #[test]
    fn test_invalidating_one_device_keeps_writes_of_others() {
        let (_, cache) = setup();
        let generation = cache.generation("2");

        cache.invalidate_device("1");
        assert!(cache
            .put(CacheKey::monthly("2", 2024), CachedValue::Total(2), generation)
            .unwrap());
    }

    #[test]
    fn test_compute_error_is_propagated_and_not_cached() {
        let (_, cache) = setup();
        let key = CacheKey::monthly("1", 2024);

        let err = read_through(&cache, key.clone(), || Err("boom")).unwrap_err();
        assert_eq!(err, "boom");
        assert!(cache.get(&key).unwrap().is_none());
    }
}
