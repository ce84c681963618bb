// Job listing, sync and import over HTTP.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::config;
    use crate::tests::support::*;

    #[tokio::test]
    async fn test_jobs_filtered_by_device_and_limited() {
        let server = DashboardServer::start().await;

        let (status, body) = get_json(&server.api("/jobs?device_id=47100122&limit=10")).await;
        assert_equal(200, status);

        let jobs = body["jobs"].as_array().unwrap();
        assert!(jobs.len() <= 10);
        assert!(!jobs.is_empty());
        assert!(jobs.iter().all(|j| j["press_id"] == "47100122"));
        assert_equal(120, u(&body, "total"));
    }

    #[tokio::test]
    async fn test_pagination_reports_page_count() {
        let server = DashboardServer::start().await;

        let (_, body) = get_json(&server.api("/jobs?limit=7")).await;
        let total = u(&body, "total");
        assert_equal(360, total);
        assert_equal(total.div_ceil(7), u(&body, "pages"));

        let (status, beyond) = get_json(&server.api("/jobs?limit=7&page=1000")).await;
        assert_equal(200, status);
        assert!(beyond["jobs"].as_array().unwrap().is_empty());
        assert_equal(total, u(&beyond, "total"));
        assert_equal(1000, u(&beyond, "page"));
    }

    #[tokio::test]
    async fn test_jobs_newest_first() {
        let server = DashboardServer::start().await;

        let (_, body) = get_json(&server.api("/jobs?limit=100")).await;
        let dates: Vec<&str> = body["jobs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["job_date"].as_str().unwrap())
            .collect();
        let mut sorted = dates.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_equal(sorted, dates);
    }

    #[tokio::test]
    async fn test_malformed_params_degrade_to_defaults() {
        let server = DashboardServer::start().await;

        let (status, body) =
            get_json(&server.api("/jobs?limit=abc&page=-3&from_date=yesterday&to_date=2025-13-40")).await;
        assert_equal(200, status);
        assert_equal(50, u(&body, "limit"));
        assert_equal(1, u(&body, "page"));
        assert_equal(360, u(&body, "total"));

        let (status, body) = get_json(&server.api("/jobs?status=NOT_A_STATUS")).await;
        assert_equal(200, status);
        assert_equal(0, u(&body, "total"));
        assert_equal(0, u(&body, "pages"));

        let (status, body) =
            get_json(&server.api("/jobs?from_date=2025-06-01&to_date=2025-01-01")).await;
        assert_equal(200, status);
        assert_equal(0, u(&body, "total"));
    }

    #[tokio::test]
    async fn test_sync_picks_up_new_jobs_once() {
        let server = DashboardServer::start().await;
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        server.fixture().append("47200413", 5, today);

        let url = server.api("/jobs/sync?device_id=47200413");
        let (status, _, _, body) = assert_ok(do_json("POST", &url, None).await);
        let body = body.unwrap();
        assert_equal(200, status);
        assert_equal("success", body["status"].as_str().unwrap());
        assert_equal(5, u(&body, "jobs_synced"));
        assert!(body["last_marker"].is_u64());

        let (_, _, _, again) = assert_ok(do_json("POST", &url, None).await);
        assert_equal(0, u(&again.unwrap(), "jobs_synced"));

        let (_, page) = get_json(&server.api("/jobs?device_id=47200413&limit=1")).await;
        assert_equal(125, u(&page, "total"));
    }

    #[tokio::test]
    async fn test_sync_all_and_unknown_device() {
        let server = DashboardServer::start().await;

        let (status, _, _, body) =
            assert_ok(do_json("POST", &server.api("/jobs/sync"), None).await);
        assert_equal(200, status);
        assert_equal(0, u(&body.unwrap(), "jobs_synced"));

        let (status, _, _, body) =
            assert_ok(do_json("POST", &server.api("/jobs/sync?device_id=nope"), None).await);
        assert_equal(404, status);
        assert!(body.unwrap()["detail"].is_string());
    }

    #[tokio::test]
    async fn test_import_into_empty_store() {
        let mut cfg = config::new_test_config();
        if let Some(mock) = cfg.dashboard.data.as_mut().and_then(|d| d.mock.as_mut()) {
            mock.jobs_per_device = Some(0);
        }
        let server = DashboardServer::start_with(cfg).await;

        let (_, empty) = get_json(&server.api("/jobs")).await;
        assert_equal(0, u(&empty, "total"));

        let job = |marker: u64, press: &str| {
            json!({
                "marker": marker,
                "press_id": press,
                "job_name": format!("Import {marker}"),
                "status": "PRINTED",
                "total_impressions": 100,
                "sheets": 50,
                "click_category": "EPM",
                "job_date": "2025-06-01"
            })
        };
        let payload = json!({ "jobs": [job(1, "47200413"), job(2, "47200413"), job(3, "ghost")] });

        let url = server.api("/jobs/import");
        let (status, _, _, body) = assert_ok(do_json("POST", &url, Some(&payload)).await);
        let body = body.unwrap();
        assert_equal(200, status);
        assert_equal(2, u(&body, "imported"));
        assert_equal(1, u(&body, "skipped"));

        // Re-importing the same markers changes nothing.
        let (_, _, _, body) = assert_ok(do_json("POST", &url, Some(&payload)).await);
        assert_equal(0, u(&body.unwrap(), "imported"));

        let (_, report) = get_json(&server.api("/clicks/report")).await;
        assert_equal(200, u(&report, "total_impressions"));
        assert_equal(200, u(&report, "epm"));
    }

    #[tokio::test]
    async fn test_import_of_oversized_counts_keeps_overview_intact() {
        let server = DashboardServer::start().await;
        let (_, before) = get_json(&server.api("/stats/overview")).await;

        let job = |marker: u64, impressions: u64, sheets: u64| {
            json!({
                "marker": marker,
                "press_id": "47100144",
                "job_name": "Overflow",
                "status": "PRINTED",
                "total_impressions": impressions,
                "sheets": sheets,
                "click_category": "EPM",
                "job_date": "2025-06-10"
            })
        };
        let payload = json!({ "jobs": [
            job(90_001, u64::MAX, 1),
            job(90_002, u64::MAX, u64::MAX),
            job(90_003, 1, u64::MAX)
        ] });

        let (status, _, _, body) =
            assert_ok(do_json("POST", &server.api("/jobs/import"), Some(&payload)).await);
        let body = body.unwrap();
        assert_equal(200, status);
        assert_equal(0, u(&body, "imported"));
        assert_equal(3, u(&body, "skipped"));

        let (status, after) = get_json(&server.api("/stats/overview")).await;
        assert_equal(200, status);
        assert_equal(before, after);

        let (status, _) = get_json(&server.api("/clicks/yoy?device_id=47100144")).await;
        assert_equal(200, status);
    }

    #[tokio::test]
    async fn test_import_log_lists_latest_imports() {
        let server = DashboardServer::start().await;
        let (status, body) = get_json(&server.api("/import/log")).await;
        assert_equal(200, status);
        assert!(body["logs"].as_array().unwrap().is_empty());

        let url = server.api("/jobs/import");
        for marker in [70_001u64, 70_002, 70_003] {
            let payload = json!({ "jobs": [{
                "marker": marker,
                "press_id": "47100122",
                "job_name": "Import",
                "status": "PRINTED",
                "total_impressions": 10,
                "sheets": 5,
                "click_category": "EPM",
                "job_date": "2025-06-01"
            }] });
            assert_ok(do_json("POST", &url, Some(&payload)).await);
        }

        let (status, body) = get_json(&server.api("/import/log?limit=2")).await;
        assert_equal(200, status);
        let logs = body["logs"].as_array().unwrap();
        assert_equal(2, logs.len());
        assert_equal(1, u(&logs[0], "imported"));
        assert_equal(1, u(&logs[0], "total_jobs"));
        assert!(logs[0]["timestamp"].is_string());
    }
}
