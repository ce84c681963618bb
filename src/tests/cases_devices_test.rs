// Device registry, root info and probe endpoints over HTTP.

#[cfg(test)]
mod tests {
    use crate::model::PressState;
    use crate::tests::support::*;

    #[tokio::test]
    async fn test_root_reports_message_and_version() {
        let server = DashboardServer::start().await;

        for path in ["", "/"] {
            let (status, body) = get_json(&server.api(path)).await;
            assert_equal(200, status);
            assert_equal("HP PrintOS Dashboard API", body["message"].as_str().unwrap());
            assert_equal(env!("CARGO_PKG_VERSION"), body["version"].as_str().unwrap());
        }
    }

    #[tokio::test]
    async fn test_healthz_is_served_outside_prefix() {
        let server = DashboardServer::start().await;

        let (status, body) = get_json(&server.url("/healthz")).await;
        assert_equal(200, status);
        assert_equal("ok", body["message"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_lists_exactly_the_configured_devices() {
        let server = DashboardServer::start().await;

        let (status, body) = get_json(&server.api("/devices")).await;
        assert_equal(200, status);

        let mut ids: Vec<&str> = body
            .as_array()
            .expect("device array")
            .iter()
            .map(|d| d["id"].as_str().unwrap())
            .collect();
        ids.sort_unstable();
        assert_equal(vec!["47100122", "47100144", "47200413"], ids);

        // Second configured press starts out printing.
        let busy = body
            .as_array()
            .unwrap()
            .iter()
            .find(|d| d["id"] == "47100144")
            .unwrap();
        assert_equal("busy", busy["status"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_device_status_follows_press_state() {
        let server = DashboardServer::start().await;

        let (status, body) = get_json(&server.api("/devices/47100144/status")).await;
        assert_equal(200, status);
        assert_equal("PRINTING", body["press_state"].as_str().unwrap());
        assert!(body["current_job_name"].is_string());
        assert_equal(120, u(&body, "total_jobs"));
        assert!(body["last_sync"].is_string());

        server.fixture().set_state("47100144", PressState::Off);
        let (_, body) = get_json(&server.api("/devices/47100144/status")).await;
        assert_equal("offline", body["status"].as_str().unwrap());
        assert!(body["current_job_name"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_device_is_not_found() {
        let server = DashboardServer::start().await;

        for path in ["/devices/nope/status", "/devices/nope/performance"] {
            let (status, body) = get_json(&server.api(path)).await;
            assert_equal(404, status);
            assert!(body["detail"].as_str().unwrap().contains("nope"));
        }
    }

    #[tokio::test]
    async fn test_performance_is_consistent_with_jobs() {
        let server = DashboardServer::start().await;

        let (status, perf) = get_json(&server.api("/devices/47200413/performance")).await;
        assert_equal(200, status);
        assert_equal(120, u(&perf, "total_jobs"));
        assert!(u(&perf, "printed_jobs") + u(&perf, "aborted_jobs") <= 120);

        let (_, page) = get_json(&server.api("/jobs?device_id=47200413&status=PRINTED&limit=1")).await;
        assert_equal(u(&page, "total"), u(&perf, "printed_jobs"));

        let rate = perf["success_rate"].as_f64().unwrap();
        let want = (u(&perf, "printed_jobs") as f64 / 120.0 * 1000.0).round() / 10.0;
        assert_equal(want, rate);
    }
}
