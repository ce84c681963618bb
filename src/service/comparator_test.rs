#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use crate::cache::{CacheKey, CacheStore, CachedValue};
    use crate::http::AppError;
    use crate::model::{DeviceScope, JobFilter, Source, TrendDirection};
    use crate::service::testkit;
    use crate::service::DateRange;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn range(from: &str, to: &str) -> DateRange {
        DateRange {
            from: Some(d(from)),
            to: Some(d(to)),
        }
    }

    #[tokio::test]
    async fn test_previous_period_is_one_year_back() {
        let kit = testkit::synced().await;
        let cmp = kit
            .services
            .comparator
            .compare(&DeviceScope::All, range("2025-01-01", "2025-06-30"))
            .unwrap();

        assert_eq!(cmp.current_period.from, d("2025-01-01"));
        assert_eq!(cmp.current_period.to, d("2025-06-30"));
        assert_eq!(cmp.previous_period.from, d("2024-01-01"));
        assert_eq!(cmp.previous_period.to, d("2024-06-30"));
        assert_eq!(cmp.current_period.year, 2025);
        assert_eq!(cmp.previous_period.year, 2024);
    }

    #[tokio::test]
    async fn test_totals_match_store_and_change_is_derived() {
        let kit = testkit::synced().await;
        let scope = DeviceScope::Device("47100144".to_string());
        let cmp = kit
            .services
            .comparator
            .compare(&scope, range("2025-01-01", "2025-05-31"))
            .unwrap();

        let cur = kit
            .services
            .store
            .totals(&JobFilter::for_device(scope.clone()).between(d("2025-01-01"), d("2025-05-31")));
        let prev = kit
            .services
            .store
            .totals(&JobFilter::for_device(scope).between(d("2024-01-01"), d("2024-05-31")));

        assert_eq!(cmp.current_period.total_impressions, cur.total_impressions);
        assert_eq!(cmp.previous_period.total_impressions, prev.total_impressions);
        assert_eq!(
            cmp.change_absolute,
            cur.total_impressions as i64 - prev.total_impressions as i64
        );
        assert_eq!(cmp.trend, TrendDirection::from_change_percent(cmp.change_percent));
    }

    #[tokio::test]
    async fn test_empty_previous_period_is_stable() {
        let kit = testkit::synced().await;
        // fixture history starts 2024-01-01, so 2023 is empty
        let cmp = kit
            .services
            .comparator
            .compare(&DeviceScope::All, range("2024-02-01", "2024-02-29"))
            .unwrap();

        assert_eq!(cmp.previous_period.total_impressions, 0);
        assert_eq!(cmp.previous_period.to, d("2023-02-28"));
        assert_eq!(cmp.change_percent, 0.0);
        assert_eq!(cmp.trend, TrendDirection::Stable);
    }

    #[tokio::test]
    async fn test_second_request_is_cached_and_identical() {
        let kit = testkit::synced().await;
        let comparator = &kit.services.comparator;
        let r = range("2025-01-01", "2025-06-30");

        let first = comparator.compare(&DeviceScope::All, r).unwrap();
        let second = comparator.compare(&DeviceScope::All, r).unwrap();

        assert_eq!(first.current_period.source, Source::Live);
        assert_eq!(second.current_period.source, Source::Cached);
        assert_eq!(second.previous_period.source, Source::Cached);
        assert_eq!(
            first.current_period.total_impressions,
            second.current_period.total_impressions
        );
        assert_eq!(
            first.previous_period.total_impressions,
            second.previous_period.total_impressions
        );
        // three devices, two periods
        assert_eq!(kit.cache.status().total_cached_entries, 6);
    }

    #[tokio::test]
    async fn test_cache_expires_after_ttl() {
        let kit = testkit::synced().await;
        let comparator = &kit.services.comparator;
        let r = range("2025-01-01", "2025-03-31");

        comparator.compare(&DeviceScope::All, r).unwrap();
        kit.clock.advance(Duration::hours(24));
        let again = comparator.compare(&DeviceScope::All, r).unwrap();
        assert_eq!(again.current_period.source, Source::Live);
    }

    #[tokio::test]
    async fn test_default_window_ends_today() {
        let kit = testkit::synced().await;
        let cmp = kit
            .services
            .comparator
            .compare(&DeviceScope::All, DateRange::default())
            .unwrap();

        assert_eq!(cmp.current_period.from, d("2024-06-16"));
        assert_eq!(cmp.current_period.to, d("2025-06-15"));
        assert_eq!(cmp.previous_period.from, d("2023-06-16"));
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let kit = testkit::synced().await;
        let err = kit
            .services
            .comparator
            .compare(&DeviceScope::All, range("2025-06-30", "2025-01-01"))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_device_is_not_found() {
        let kit = testkit::synced().await;
        let err = kit
            .services
            .comparator
            .trend(&DeviceScope::Device("nope".to_string()), None, None)
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_trend_has_twelve_localized_months() {
        let kit = testkit::synced().await;
        for scope in [
            DeviceScope::All,
            DeviceScope::Device("47200413".to_string()),
        ] {
            let trend = kit.services.comparator.trend(&scope, None, None).unwrap();
            assert_eq!(trend.current_year, 2025);
            assert_eq!(trend.previous_year, 2024);
            let months: Vec<&str> = trend.trend.iter().map(|m| m.month).collect();
            assert_eq!(
                months,
                vec!["Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez"]
            );
            // nothing after today
            assert!(trend.trend[6..].iter().all(|m| m.current_year == 0));
        }
    }

    #[tokio::test]
    async fn test_trend_year_overrides_and_sum() {
        let kit = testkit::synced().await;
        let trend = kit
            .services
            .comparator
            .trend(&DeviceScope::All, Some(2024), Some(2023))
            .unwrap();

        let total_2024 = kit
            .services
            .store
            .totals(&JobFilter::default().between(d("2024-01-01"), d("2024-12-31")))
            .total_impressions;
        assert_eq!(trend.trend.iter().map(|m| m.current_year).sum::<u64>(), total_2024);
        assert!(trend.trend.iter().all(|m| m.previous_year == 0));
    }

    fn plant_total(kit: &testkit::Kit, device: &str, from: &str, to: &str, total: u64) {
        let key = CacheKey::period(device, d(from), d(to));
        let generation = kit.cache.generation(device);
        assert!(kit.cache.put(key, CachedValue::Total(total), generation).unwrap());
    }

    #[tokio::test]
    async fn test_out_of_range_totals_fail_instead_of_wrapping() {
        let kit = testkit::synced().await;
        plant_total(&kit, "47200413", "2025-01-01", "2025-06-30", u64::MAX);

        let err = kit
            .services
            .comparator
            .compare(
                &DeviceScope::Device("47200413".to_string()),
                range("2025-01-01", "2025-06-30"),
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Aggregation(_)));

        plant_total(&kit, "47100144", "2025-01-01", "2025-06-30", u64::MAX / 2 + 1);
        plant_total(&kit, "47200413", "2025-01-01", "2025-06-30", u64::MAX / 2 + 1);
        let err = kit
            .services
            .comparator
            .compare(&DeviceScope::All, range("2025-01-01", "2025-06-30"))
            .unwrap_err();
        assert!(matches!(err, AppError::Aggregation(_)));
    }
}
