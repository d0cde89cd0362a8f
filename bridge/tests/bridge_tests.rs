//! Full bridge against a mocked control service and real webhook posts

use std::time::Duration;

use jishi_api::ClientConfig;
use mockito::Server;
use serde_json::json;
use sonos_bridge::{Bridge, Config};
use sonos_state::{DeviceStatus, NodeAddress};

const ZONES: &str = r#"[
  {
    "uuid": "RINCON_000E5AAAAAAA01400",
    "coordinator": { "uuid": "RINCON_000E5AAAAAAA01400", "roomName": "Kitchen" },
    "members": [
      { "uuid": "RINCON_000E5AAAAAAA01400", "roomName": "Kitchen" },
      { "uuid": "RINCON_000E5BBBBBBB01400", "roomName": "Den" }
    ]
  },
  {
    "uuid": "RINCON_000E5CCCCCCC01400",
    "coordinator": { "uuid": "RINCON_000E5CCCCCCC01400", "roomName": "Office" },
    "members": [
      { "uuid": "RINCON_000E5CCCCCCC01400", "roomName": "Office" }
    ]
  }
]"#;

fn config_for(server: &Server, port_range: (u16, u16), discover: bool) -> Config {
    Config {
        client: ClientConfig::default()
            .with_base_url(format!("{}/", server.url()))
            .with_timeout(Duration::from_secs(2)),
        port_range,
        discover_on_start: discover,
        log_mode: None,
        log_filter: None,
    }
}

/// Poll a node's status until `check` passes or two seconds elapse
async fn wait_for(bridge: &Bridge, slice: &str, check: impl Fn(&DeviceStatus) -> bool) -> bool {
    let address = NodeAddress::new(slice);
    for _ in 0..40 {
        if let Some(status) = bridge.registry().status(&address) {
            if check(&status) {
                return true;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_bridge_end_to_end() {
    let mut api = Server::new_async().await;
    let _zones = api
        .mock("GET", "/zones")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ZONES)
        .expect_at_least(1)
        .create_async()
        .await;

    let bridge = Bridge::start(&config_for(&api, (48500, 48600), true))
        .await
        .unwrap();
    assert_eq!(bridge.registry().len(), 3);

    // Startup refresh reconciles grouping
    assert!(wait_for(&bridge, "aaaaaaa", |s| s.is_coordinator == Some(true)
        && s.group_member_count == Some(2))
    .await);
    assert!(wait_for(&bridge, "bbbbbbb", |s| s.is_coordinator == Some(false)).await);

    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/", bridge.port());

    let response = client
        .post(&url)
        .json(&json!({
            "type": "volume-change",
            "data": {
                "uuid": "RINCON_000E5CCCCCCC01400",
                "roomName": "Office",
                "previousVolume": 10,
                "newVolume": 42
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(wait_for(&bridge, "ccccccc", |s| s.player_volume == Some(42)).await);

    let response = client
        .post(&url)
        .json(&json!({ "type": "mute-change", "data": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let summary = bridge.shutdown().await.unwrap();
    assert_eq!(summary.notifications.forwarded, 1);
    assert!(summary.catalog_refreshes >= 1);
    assert!(summary.engine.topology_passes >= 1);
    assert!(summary.reports_sent >= 7);
}

#[tokio::test]
async fn test_bridge_starts_when_discovery_fails() {
    let mut api = Server::new_async().await;
    let _zones = api
        .mock("GET", "/zones")
        .with_status(500)
        .create_async()
        .await;

    let bridge = Bridge::start(&config_for(&api, (48601, 48700), true))
        .await
        .unwrap();
    assert!(bridge.registry().is_empty());

    let summary = bridge.shutdown().await.unwrap();
    assert_eq!(summary.engine.topology_passes, 0);
    assert_eq!(summary.engine.failed_fetches, 1);
}

#[tokio::test]
async fn test_skip_discovery_registers_nothing() {
    let mut api = Server::new_async().await;
    let _zones = api
        .mock("GET", "/zones")
        .with_status(200)
        .with_body(ZONES)
        .create_async()
        .await;

    let bridge = Bridge::start(&config_for(&api, (48701, 48800), false))
        .await
        .unwrap();
    assert!(bridge.registry().is_empty());

    let summary = bridge.shutdown().await.unwrap();
    // The startup pass still runs; with no nodes it writes nothing
    assert_eq!(summary.engine.updates_published, 0);
    assert_eq!(summary.reports_sent, 0);
}
