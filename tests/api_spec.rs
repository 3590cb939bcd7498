use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use sph_inout::api::{create_router, CreateZoneInput, SaveCaseResponse, SetShapeInput};
use sph_inout::case::{CaseDocument, CaseStore};
use sph_inout::models::*;
use uuid::Uuid;

fn setup() -> TestServer {
    let store = CaseStore::in_memory(CaseDocument::new("test"));
    let app = create_router(store, None);
    TestServer::new(app).expect("Failed to create test server")
}

async fn create_test_zone(server: &TestServer, shape: ZoneShape) -> InletOutletZone {
    server
        .post("/api/v1/inout/zones")
        .json(&CreateZoneInput { shape, proxy: None })
        .await
        .json::<InletOutletZone>()
}

// ============================================================
// Health
// ============================================================

mod health {
    use super::*;

    #[tokio::test]
    async fn returns_ok() {
        let server = setup();

        let response = server.get("/api/v1/health").await;

        response.assert_status_ok();
    }
}

// ============================================================
// Zones
// ============================================================

mod zones {
    use super::*;

    #[tokio::test]
    async fn list_returns_empty_for_a_new_case() {
        let server = setup();

        let response = server.get("/api/v1/inout/zones").await;

        response.assert_status_ok();
        let zones: Vec<InletOutletZone> = response.json();
        assert!(zones.is_empty());
    }

    #[tokio::test]
    async fn create_returns_created_status() {
        let server = setup();

        let response = server
            .post("/api/v1/inout/zones")
            .json(&CreateZoneInput {
                shape: ZoneShape::Circle,
                proxy: Some("InletCircle".to_string()),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let zone: InletOutletZone = response.json();
        assert_eq!(zone.shape(), ZoneShape::Circle);
        assert_eq!(zone.proxy.as_deref(), Some("InletCircle"));
    }

    #[tokio::test]
    async fn list_keeps_creation_order() {
        let server = setup();
        let first = create_test_zone(&server, ZoneShape::Box).await;
        let second = create_test_zone(&server, ZoneShape::Circle).await;

        let zones: Vec<InletOutletZone> = server.get("/api/v1/inout/zones").await.json();

        let ids: Vec<Uuid> = zones.iter().map(|zone| zone.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn create_rejects_mixed_dimensions() {
        let server = setup();
        create_test_zone(&server, ZoneShape::Mk2d).await;

        let response = server
            .post("/api/v1/inout/zones")
            .json(&CreateZoneInput {
                shape: ZoneShape::Box,
                proxy: None,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_returns_not_found_for_unknown_id() {
        let server = setup();

        let response = server
            .get(&format!("/api/v1/inout/zones/{}", Uuid::new_v4()))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_returns_the_removed_zone() {
        let server = setup();
        let a = create_test_zone(&server, ZoneShape::Box).await;
        let b = create_test_zone(&server, ZoneShape::Box).await;
        let c = create_test_zone(&server, ZoneShape::Box).await;

        let response = server
            .delete(&format!("/api/v1/inout/zones/{}", b.id))
            .await;

        response.assert_status_ok();
        let removed: InletOutletZone = response.json();
        assert_eq!(removed.id, b.id);

        let zones: Vec<InletOutletZone> = server.get("/api/v1/inout/zones").await.json();
        let ids: Vec<Uuid> = zones.iter().map(|zone| zone.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn set_shape_resets_geometry_but_keeps_mkfluid() {
        let server = setup();
        let zone = create_test_zone(&server, ZoneShape::Box).await;
        server
            .put(&format!("/api/v1/inout/zones/{}/geometry", zone.id))
            .json(&json!({ "mkfluid": 5, "point": [0, 0, 0], "size": [2, 2, 2] }))
            .await
            .assert_status_ok();

        let response = server
            .put(&format!("/api/v1/inout/zones/{}/shape", zone.id))
            .json(&SetShapeInput {
                shape: ZoneShape::Circle,
            })
            .await;

        response.assert_status_ok();
        let zone: InletOutletZone = response.json();
        assert_eq!(zone.shape(), ZoneShape::Circle);
        assert_eq!(zone.zone_info().mkfluid(), 5);
    }
}

// ============================================================
// Zone edits
// ============================================================

mod zone_edits {
    use super::*;

    #[tokio::test]
    async fn geometry_rejects_bad_fields() {
        let server = setup();
        let zone = create_test_zone(&server, ZoneShape::Circle).await;

        let response = server
            .put(&format!("/api/v1/inout/zones/{}/geometry", zone.id))
            .json(&json!({ "mkfluid": 1, "point": [0, 0, 0], "radius": "wide" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("radius"));
    }

    #[tokio::test]
    async fn edits_on_unknown_zone_return_not_found() {
        let server = setup();

        let response = server
            .put(&format!("/api/v1/inout/zones/{}/density", Uuid::new_v4()))
            .json(&json!({ "value": 1000 }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn jet_circle_is_rejected_on_a_box() {
        let server = setup();
        let zone = create_test_zone(&server, ZoneShape::Box).await;

        let response = server
            .put(&format!("/api/v1/inout/zones/{}/velocity", zone.id))
            .json(&json!({ "mode": "fixed", "spec": "jet_circle" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let unchanged: InletOutletZone = server
            .get(&format!("/api/v1/inout/zones/{}", zone.id))
            .await
            .json();
        assert_eq!(unchanged.velocity().fixed().spec(), FixedVelocitySpec::Constant);
    }

    #[tokio::test]
    async fn velocity_series_is_stored_in_order() {
        let server = setup();
        let zone = create_test_zone(&server, ZoneShape::Box).await;

        let response = server
            .put(&format!("/api/v1/inout/zones/{}/velocity", zone.id))
            .json(&json!({
                "mode": "variable",
                "spec": "uniform_series",
                "values": [[0, 1], [5, 2], [2, 1.5]],
            }))
            .await;

        response.assert_status_ok();
        let zone: InletOutletZone = response.json();
        let times: Vec<f64> = zone
            .velocity()
            .variable()
            .uniform_series
            .iter()
            .map(|row| row.time)
            .collect();
        assert_eq!(times, vec![0.0, 5.0, 2.0]);
    }

    #[tokio::test]
    async fn policy_and_elevation_are_saved() {
        let server = setup();
        let zone = create_test_zone(&server, ZoneShape::Box).await;

        server
            .put(&format!("/api/v1/inout/zones/{}/policy", zone.id))
            .json(&json!({ "refilling": "simple_below_zsurf", "layers": 8 }))
            .await
            .assert_status_ok();
        let response = server
            .put(&format!("/api/v1/inout/zones/{}/elevation", zone.id))
            .json(&json!({ "enabled": true, "zbottom": 0, "zsurf": 1.5 }))
            .await;

        response.assert_status_ok();
        let zone: InletOutletZone = response.json();
        assert_eq!(zone.refilling, RefillingMode::SimpleBelowZsurf);
        assert_eq!(zone.layers(), 8);
        assert!(zone.elevation().is_enabled());
        assert_eq!(zone.elevation().fixed().zsurf, 1.5);
    }

    #[tokio::test]
    async fn rotation_on_a_line_is_rejected() {
        let server = setup();
        let zone = create_test_zone(&server, ZoneShape::Line).await;

        let response = server
            .put(&format!("/api/v1/inout/zones/{}/rotation", zone.id))
            .json(&json!({ "enabled": true, "angle": 45 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

// ============================================================
// Configuration and export
// ============================================================

mod configuration {
    use super::*;

    #[tokio::test]
    async fn settings_are_saved() {
        let server = setup();

        let response = server
            .put("/api/v1/inout/settings")
            .json(&json!({ "refilling_rate": 10, "box_limit": false }))
            .await;

        response.assert_status_ok();
        let config: InletOutletConfig = response.json();
        assert_eq!(config.refilling_rate, 10);
        assert!(!config.box_limit.enabled);

        let config: InletOutletConfig = server.get("/api/v1/inout").await.json();
        assert_eq!(config.refilling_rate, 10);
    }

    #[tokio::test]
    async fn settings_reject_zero_refilling_rate() {
        let server = setup();

        let response = server
            .put("/api/v1/inout/settings")
            .json(&json!({ "refilling_rate": 0 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn xml_export_lists_zones() {
        let server = setup();
        create_test_zone(&server, ZoneShape::Circle).await;

        let response = server.get("/api/v1/inout/xml").await;

        response.assert_status_ok();
        let xml = response.text();
        assert!(xml.starts_with("<inout>"));
        assert!(xml.contains("<circle mkfluid=\"0\" direction=\"left\">"));
    }

    #[tokio::test]
    async fn saving_an_in_memory_case_conflicts() {
        let server = setup();

        let response = server.post("/api/v1/case/save").await;

        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn saving_a_file_backed_case_returns_its_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("case.json");
        let store = CaseStore::open(path.clone()).expect("Failed to open store");
        let server =
            TestServer::new(create_router(store, None)).expect("Failed to create test server");

        let response = server.post("/api/v1/case/save").await;

        response.assert_status_ok();
        let saved: SaveCaseResponse = response.json();
        assert_eq!(saved.path, path.display().to_string());
        assert!(saved.saved_at.is_some());
        assert!(path.exists());
    }
}
