use serde_json::json;
use topicdeck_core::deck::{PANEL_KIND_BAG_PLAYER, PANEL_KIND_LIVE_PLOT, PANEL_KIND_PUBLISH};
use topicdeck_core::{DeckDefinition, DeckError, PanelDefinition};

fn sample_deck() -> DeckDefinition {
    DeckDefinition {
        name: "bench".to_string(),
        panels: vec![
            PanelDefinition {
                kind: PANEL_KIND_PUBLISH.to_string(),
                config: json!({
                    "topic": "/cmd_vel",
                    "type": "geometry_msgs/Twist",
                    "rate_hz": 10,
                    "latch": true,
                }),
            },
            PanelDefinition {
                kind: PANEL_KIND_LIVE_PLOT.to_string(),
                config: json!({
                    "spec": "/cmd_vel:linear.x:angular.z",
                    "history": 250,
                }),
            },
            PanelDefinition {
                kind: PANEL_KIND_BAG_PLAYER.to_string(),
                config: json!({
                    "path": "/data/run.bag",
                    "loop": true,
                }),
            },
        ],
    }
}

#[test]
fn deck_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bench.json");
    let deck = sample_deck();

    deck.save_to_file(&path).expect("save deck");
    let loaded = DeckDefinition::load_from_file(&path).expect("load deck");
    assert_eq!(loaded, deck);
}

#[test]
fn saved_deck_is_readable_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bench.json");
    sample_deck().save_to_file(&path).expect("save deck");

    let text = std::fs::read_to_string(&path).expect("read file");
    // Pretty-printed, so hand edits stay practical.
    assert!(text.contains('\n'));
    assert!(text.contains("\"kind\": \"publish\""));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = DeckDefinition::load_from_file(std::path::Path::new("/nonexistent/deck.json"))
        .unwrap_err();
    assert!(matches!(err, DeckError::Io(_)));
}

#[test]
fn invalid_json_is_a_serde_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").expect("write file");
    let err = DeckDefinition::load_from_file(&path).unwrap_err();
    assert!(matches!(err, DeckError::Serde(_)));
}

#[test]
fn omitted_fields_get_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("sparse.json");
    std::fs::write(
        &path,
        r#"{ "name": "sparse", "panels": [ { "kind": "publish" } ] }"#,
    )
    .expect("write file");

    let deck = DeckDefinition::load_from_file(&path).expect("load deck");
    assert_eq!(deck.panels.len(), 1);
    assert!(deck.panels[0].config.is_null());
}
