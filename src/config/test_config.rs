use super::{Api, Cache, Dashboard, DashboardBox, Data, Device, Locale, Logs, Mock, Upstream};
use std::time::Duration;

/// Creates a new test configuration.
pub fn new_test_config() -> Dashboard {
    Dashboard {
        dashboard: DashboardBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            api: Some(Api {
                name: Some("pressdash:test".to_string()),
                port: Some("0".to_string()),
                prefix: Some("/api".to_string()),
                request_timeout: Some(Duration::from_secs(10)),
            }),
            devices: vec![
                Device {
                    id: "47200413".to_string(),
                    name: "HP Indigo 7K".to_string(),
                    model: "HP Indigo 7K Digital Press".to_string(),
                },
                Device {
                    id: "47100144".to_string(),
                    name: "HP Indigo 7900".to_string(),
                    model: "HP Indigo 7900 Digital Press".to_string(),
                },
                Device {
                    id: "47100122".to_string(),
                    name: "HP Indigo 9129".to_string(),
                    model: "HP Indigo 12000 Digital Press".to_string(),
                },
            ],
            upstream: Some(Upstream {
                timeout: Some(Duration::from_secs(2)),
                sync_batch: Some(500),
                sync_interval: Some(Duration::from_millis(200)),
                auto_sync: false,
            }),
            data: Some(Data {
                mock: Some(Mock {
                    enabled: true,
                    jobs_per_device: Some(120),
                    seed: Some(42),
                }),
            }),
            cache: Some(Cache {
                enabled: true,
                ttl: Some(Duration::from_secs(24 * 3600)),
                preview_len: Some(10),
                sweep_interval: None,
            }),
            locale: Locale::De,
        },
    }
}
