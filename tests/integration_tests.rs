use anyhow::Result;
use async_trait::async_trait;
use rail_alerts_etl::aggregate::build::{build_dashboard, empty_feature_collection};
use rail_alerts_etl::aggregate::aggregate_dir;
use rail_alerts_etl::fetch::HttpClient;
use rail_alerts_etl::geometry::shapes::fetch_route_shapes_or_empty;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

const HEADER: &str = "alert_id,route_type,last_modified_dt,active_period_start_dt,\
active_period_end_dt,active_period_start_date,cause,cause_detail,effect,effect_detail,\
severity_level,route_id";

fn setup_data_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    // January export: duplicate snapshots of alert 100, a commuter rail
    // alert, one bus row, and one row with no start timestamp.
    let january = format!(
        "{HEADER}\n\
         100,1,2025-01-05T10:00:00Z,2025-01-05T08:00:00Z,2025-01-05T12:00:00Z,2025-01-05,TECHNICAL_PROBLEM,SIGNAL_PROBLEM,DELAY,,WARNING,Orange\n\
         100,1,2025-01-05T11:00:00Z,2025-01-05T08:00:00Z,2025-01-05T12:00:00Z,2025-01-05,TECHNICAL_PROBLEM,SIGNAL_PROBLEM,DELAY,,WARNING,Orange\n\
         101,2,2025-01-10T09:00:00Z,2025-01-10T06:30:00Z,,2025-01-10,MAINTENANCE,,NO_SERVICE,,INFO,CR-Lowell\n\
         999,3,2025-01-11T00:00:00Z,2025-01-11T00:00:00Z,,2025-01-11,ACCIDENT,,DELAY,,INFO,39\n\
         102,1,2025-01-12T00:00:00Z,,,,WEATHER,,DELAY,,INFO,Red\n"
    );
    // February export: alert 100 recurs in a new month bucket.
    let february = format!(
        "{HEADER}\n\
         100,1,2025-02-01T10:00:00Z,2025-02-01T07:00:00Z,2025-02-01T08:30:00Z,2025-02-01,TECHNICAL_PROBLEM,SIGNAL_PROBLEM,DELAY,,WARNING,Orange\n"
    );

    for (name, body) in [("2025-01.csv", &january), ("2025-02.csv", &february)] {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        f.write_all(body.as_bytes()).unwrap();
    }
    dir
}

#[test]
fn test_full_tabular_pipeline() {
    let dir = setup_data_dir("rail_alerts_etl_it_pipeline");
    let (agg, canonical, skipped) = aggregate_dir(&dir).unwrap();

    // Bus row and missing-start row are both dropped
    assert_eq!(skipped, 2);
    assert_eq!(canonical.distinct_alerts(), 2);
    assert_eq!(agg.alert_month_count(), 3);

    let data = build_dashboard(&agg, &canonical, empty_feature_collection());

    assert_eq!(data.months, vec!["2025-01", "2025-02"]);
    assert_eq!(data.causes, vec!["Signal Problem", "Maintenance"]);
    assert_eq!(data.monthly_cause["Signal Problem"], vec![1, 1]);
    assert_eq!(data.monthly_cause["Maintenance"], vec![1, 0]);
    assert_eq!(data.cause_totals["Signal Problem"], 2);
    assert_eq!(data.summary.top_cause, "Signal Problem");
    assert_eq!(data.summary.total_alerts, 2);
    assert_eq!(data.summary.total_alert_months, 3);
    assert_eq!(data.summary.top_route, "Orange");

    // 2025-01-05 is a Sunday; starts at 08:00
    assert_eq!(data.heatmap[6][8], 1);
    // 2025-01-10 is a Friday; starts at 06:30
    assert_eq!(data.heatmap[4][6], 1);
    // 2025-02-01 is a Saturday; starts at 07:00
    assert_eq!(data.heatmap[5][7], 1);

    // Durations: 4.0h (January) and 1.5h (February); the open-ended
    // commuter rail alert contributes no sample
    assert_eq!(data.duration.count, 2);
    assert_eq!(data.duration.median, 2.8);
    assert_eq!(data.duration.p90, 4.0);

    let orange = &data.route_table[0];
    assert_eq!(orange.id, "Orange");
    assert_eq!(orange.count, 2);
    assert_eq!(orange.route_type, "Subway");
    assert_eq!(orange.top_cause, "Signal Problem");
    assert_eq!(orange.monthly_sev["WARNING"], vec![1, 1]);
    assert_eq!(orange.display_name, "Orange Line");
    assert_eq!(data.route_table[1].id, "CR-Lowell");

    let subway = &data.by_route_type["Subway"];
    assert_eq!(subway.heatmap[6][8], 1);
    assert_eq!(subway.causes, vec!["Signal Problem"]);
    let cr = &data.by_route_type["Commuter Rail"];
    assert_eq!(cr.causes, vec!["Maintenance"]);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_output_document_shape() {
    let dir = setup_data_dir("rail_alerts_etl_it_document");
    let (agg, canonical, _) = aggregate_dir(&dir).unwrap();
    let data = build_dashboard(&agg, &canonical, empty_feature_collection());

    let v = serde_json::to_value(&data).unwrap();
    assert_eq!(v["dataRange"]["from"], "2025-01");
    assert_eq!(v["dataRange"]["to"], "2025-02");
    assert_eq!(v["summary"]["totalAlerts"], 2);
    assert_eq!(v["heatmap"].as_array().unwrap().len(), 7);
    assert_eq!(v["heatmap"][0].as_array().unwrap().len(), 24);
    assert_eq!(v["routeTable"][0]["type"], "Subway");
    assert_eq!(v["routeTable"][0]["avgSev"], 2.0);
    assert_eq!(v["routeShapes"]["features"].as_array().unwrap().len(), 0);
    assert_eq!(v["daysPerMonth"].as_array().unwrap().len(), 12);
    assert_eq!(
        v["routeTypeNames"],
        serde_json::json!(["Green Line", "Subway", "Commuter Rail"])
    );

    fs::remove_dir_all(dir).unwrap();
}

struct FailingClient;

#[async_trait]
impl HttpClient for FailingClient {
    async fn execute(&self, _req: reqwest::Request) -> Result<reqwest::Response> {
        Err(anyhow::anyhow!("connection refused"))
    }
}

#[tokio::test]
async fn test_shape_failure_degrades_gracefully() {
    let shapes = fetch_route_shapes_or_empty(
        &FailingClient,
        "http://localhost:1",
        &["Red".to_string(), "Orange".to_string()],
    )
    .await;
    assert!(shapes.features.is_empty());

    // The tabular half of the run is unaffected by the failed overlay
    let dir = setup_data_dir("rail_alerts_etl_it_degraded");
    let (agg, canonical, _) = aggregate_dir(&dir).unwrap();
    let data = build_dashboard(&agg, &canonical, shapes);

    assert!(data.route_shapes.features.is_empty());
    assert_eq!(data.summary.total_alerts, 2);
    assert!(!data.route_table.is_empty());

    fs::remove_dir_all(dir).unwrap();
}
