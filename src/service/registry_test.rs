#[cfg(test)]
mod tests {
    use crate::http::AppError;
    use crate::model::{DeviceStatus, JobFilter, PressState};
    use crate::service::testkit;
    use crate::shared::time::Clock;

    #[tokio::test]
    async fn test_list_returns_configured_devices() {
        let kit = testkit::synced().await;
        let devices = kit.services.registry.list().await;

        let ids: Vec<&str> = devices.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["47200413", "47100144", "47100122"]);
        assert_eq!(devices[1].status, DeviceStatus::Busy);
    }

    #[tokio::test]
    async fn test_status_combines_press_state_and_store() {
        let kit = testkit::synced().await;
        kit.source.set_state("47100122", PressState::Error);

        let detail = kit.services.registry.status("47100122").await.unwrap();
        assert_eq!(detail.status, DeviceStatus::Error);
        assert_eq!(detail.press_state, PressState::Error);
        assert_eq!(detail.total_jobs, 120);
        assert!(detail.last_marker.is_some());
        assert_eq!(detail.last_sync, Some(kit.clock.now()));
    }

    #[tokio::test]
    async fn test_unknown_device_is_not_found() {
        let kit = testkit::synced().await;
        let err = kit.services.registry.status("1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = kit
            .services
            .registry
            .performance("1", &JobFilter::default())
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_performance_is_consistent() {
        let kit = testkit::synced().await;
        let perf = kit
            .services
            .registry
            .performance("47200413", &JobFilter::default())
            .unwrap();

        assert_eq!(perf.total_jobs, 120);
        assert!(perf.printed_jobs + perf.aborted_jobs <= perf.total_jobs);
        let expected = (perf.printed_jobs as f64 / perf.total_jobs as f64 * 1000.0).round() / 10.0;
        assert_eq!(perf.success_rate, expected);
        assert!(perf.success_rate >= 0.0 && perf.success_rate <= 100.0);
    }
}
