// Aggregate statistics over HTTP.

#[cfg(test)]
mod tests {
    use crate::tests::support::*;

    #[tokio::test]
    async fn test_overview_success_rate_matches_counts() {
        let server = DashboardServer::start().await;

        for query in ["", "?device_id=47100144", "?from_date=2025-01-01&to_date=2025-03-31"] {
            let (status, body) = get_json(&server.api(&format!("/stats/overview{query}"))).await;
            assert_equal(200, status);

            let total = u(&body, "total_jobs");
            let printed = u(&body, "printed_jobs");
            let want = if total == 0 {
                0.0
            } else {
                (printed as f64 / total as f64 * 1000.0).round() / 10.0
            };
            assert_equal(want, body["success_rate"].as_f64().unwrap());
        }
    }

    #[tokio::test]
    async fn test_overview_of_empty_range_is_zero() {
        let server = DashboardServer::start().await;

        let (status, body) =
            get_json(&server.api("/stats/overview?from_date=2001-01-01&to_date=2001-12-31")).await;
        assert_equal(200, status);
        assert_equal(0, u(&body, "total_jobs"));
        assert_equal(0.0, body["success_rate"].as_f64().unwrap());
    }

    #[tokio::test]
    async fn test_overview_totals_match_device_sum() {
        let server = DashboardServer::start().await;

        let (_, all) = get_json(&server.api("/stats/overview")).await;
        let mut impressions = 0;
        for id in ["47200413", "47100144", "47100122"] {
            let (_, one) = get_json(&server.api(&format!("/stats/overview?device_id={id}"))).await;
            impressions += u(&one, "total_impressions");
        }
        assert_equal(u(&all, "total_impressions"), impressions);
        assert_equal(360, u(&all, "total_jobs"));
    }
}
