use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;
use transceiver_exporter::{
    create_app,
    inspector::{fixture::FixtureInterface, DriverInfo, Fixture, InterfaceHandle},
    CollectorConfig, ExporterError, FilterConfig, FixtureInspector, PowerUnit, TransceiverCollector, WebConfig,
};

const LAB_SWITCH: &str = include_str!("../demos/lab-switch.json");

fn lab_switch() -> FixtureInspector {
    FixtureInspector::from_json(LAB_SWITCH).expect("Should parse lab switch fixture")
}

fn driver(name: &str) -> DriverInfo {
    DriverInfo {
        driver_name: name.to_string(),
        driver_version: Some("1.0".to_string()),
        ..Default::default()
    }
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_lab_switch_scrape() {
    let collector = TransceiverCollector::new(lab_switch(), CollectorConfig::default());
    let report = collector.scrape().await.expect("Should scrape fixture");

    assert_eq!(report.samples.len(), 78);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].to_string().contains("eth2"));

    // Only two of eth1's four lanes are monitored
    let eth1_lanes: Vec<_> = report
        .samples
        .iter()
        .filter(|s| s.label("interface") == Some("eth1"))
        .filter_map(|s| s.label("laser_index"))
        .collect();
    assert!(eth1_lanes.iter().all(|idx| *idx == "0" || *idx == "1"));

    // Every sample refers to a described metric with matching label arity
    let described = collector.describe();
    for sample in &report.samples {
        assert!(described.contains(&sample.descriptor), "{} not described", sample.name());
        assert_eq!(sample.descriptor.label_names.len(), sample.label_values.len());
    }
}

#[tokio::test]
async fn test_partial_failure_keeps_other_interfaces() {
    let inspector = FixtureInspector::new(Fixture {
        interfaces: vec![
            FixtureInterface::new(InterfaceHandle::new("eth0")).with_driver_info(driver("ixgbe")),
            FixtureInterface::new(InterfaceHandle::new("eth1")).with_driver_info(driver("i40e")),
            FixtureInterface::new(InterfaceHandle::new("eth2")).with_query_error("No such device"),
        ],
        ..Default::default()
    });
    let collector = TransceiverCollector::new(inspector, CollectorConfig::default());
    let report = collector.scrape().await.unwrap();

    let drivers: Vec<_> = report
        .samples
        .iter()
        .filter(|s| s.name() == "transceiver_driver_name_info")
        .map(|s| (s.label("interface").unwrap(), s.label("driver_name").unwrap()))
        .collect();
    assert_eq!(drivers, [("eth0", "ixgbe"), ("eth1", "i40e")]);
    assert_eq!(report.errors.len(), 1);
    assert!(matches!(
        &report.errors[0],
        ExporterError::InterfaceQuery { interface, .. } if interface == "eth2"
    ));
}

#[tokio::test]
async fn test_filters_and_features_switch() {
    let filter = FilterConfig::new()
        .with_exclude_admin_down(true)
        .with_include_pattern("^eth[01]$")
        .unwrap();
    let config = CollectorConfig::default()
        .with_filter(filter)
        .with_interface_features(false)
        .with_power_unit(PowerUnit::Dbm);
    let collector = TransceiverCollector::new(lab_switch(), config);

    assert_eq!(collector.monitored_interfaces().unwrap(), ["eth0", "eth1"]);
    assert_eq!(collector.describe().len(), 50);

    let report = collector.scrape().await.unwrap();
    assert!(report.errors.is_empty());
    assert!(report.samples.iter().all(|s| !s.name().contains("interface_feature")));
    assert!(report.samples.iter().all(|s| !s.name().ends_with("_milliwatts")));
    assert!(report
        .samples
        .iter()
        .any(|s| s.name() == "transceiver_laser_rx_power_dbm"));
}

#[tokio::test]
async fn test_inspector_init_failure() {
    let inspector = FixtureInspector::from_json(r#"{"init_error": "netlink socket unavailable"}"#).unwrap();
    let collector = TransceiverCollector::new(inspector, CollectorConfig::default());

    let err = collector.scrape().await.unwrap_err();
    assert!(matches!(err, ExporterError::InspectorInit(_)));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let collector = TransceiverCollector::new(lab_switch(), CollectorConfig::default());
    let app = create_app(&WebConfig::default(), collector).unwrap();

    let (status, content_type, body) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(prometheus::TEXT_FORMAT));
    assert!(body.contains("# TYPE transceiver_module_temperature_degrees_celsius gauge"));
    assert!(body.contains("transceiver_laser_tx_power_milliwatts"));
    assert!(!body.contains(r#"interface="eth2""#));
    assert!(!body.contains(r#"interface="lo""#));
    assert!(!body.contains("transceiver_laser_supports_monitoring_bool"));
}

#[tokio::test]
async fn test_metrics_endpoint_fails_on_init_error() {
    let inspector = FixtureInspector::from_json(r#"{"init_error": "netlink socket unavailable"}"#).unwrap();
    let collector = TransceiverCollector::new(inspector, CollectorConfig::default());
    let app = create_app(&WebConfig::default(), collector).unwrap();

    let (status, _, body) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("netlink socket unavailable"));
}

#[tokio::test]
async fn test_metrics_endpoint_fails_when_enumeration_fails() {
    let inspector = FixtureInspector::from_json(r#"{"enumeration_error": "netlink dump interrupted"}"#).unwrap();
    let collector = TransceiverCollector::new(inspector, CollectorConfig::default());
    let app = create_app(&WebConfig::default(), collector).unwrap();

    let (status, _, body) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("netlink dump interrupted"));
}

#[tokio::test]
async fn test_custom_metrics_path_and_index() {
    let collector = TransceiverCollector::new(lab_switch(), CollectorConfig::default());
    let config = WebConfig::default().with_metrics_path("/transceivers");
    let app = create_app(&config, collector).unwrap();

    let (status, _, body) = get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<a href="/transceivers">"#));

    let (status, _, _) = get(app.clone(), "/transceivers").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
