//! Client tests against a mocked control service

use jishi_api::{ApiError, ClientConfig, JishiClient, PlayerCommand, SystemCommand, ZoneSource};
use mockito::Server;
use rstest::rstest;

const ZONES: &str = r#"[
  {
    "uuid": "RINCON_000E58A0000101400",
    "coordinator": { "uuid": "RINCON_000E58A0000101400", "roomName": "Kitchen" },
    "members": [
      { "uuid": "RINCON_000E58A0000101400", "roomName": "Kitchen" },
      { "uuid": "RINCON_000E58B0000201400", "roomName": "Den" }
    ]
  },
  {
    "uuid": "RINCON_000E58C0000301400",
    "coordinator": { "uuid": "RINCON_000E58C0000301400", "roomName": "Office" },
    "members": [
      { "uuid": "RINCON_000E58C0000301400", "roomName": "Office" }
    ]
  }
]"#;

fn client_for(server: &Server) -> JishiClient {
    let config = ClientConfig::default().with_base_url(format!("{}/", server.url()));
    JishiClient::with_config(config).unwrap()
}

#[tokio::test]
async fn test_zones_are_parsed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/zones")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ZONES)
        .create_async()
        .await;

    let client = client_for(&server);
    let zones = client.zones().await.unwrap();

    mock.assert_async().await;
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].name(), "Kitchen");
    assert_eq!(zones[0].member_count(), 2);
    assert_eq!(zones[1].members[0].room_name, "Office");
}

#[tokio::test]
async fn test_zone_source_uses_zones_endpoint() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/zones")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(&server);
    let zones = client.fetch_zones().await.unwrap();
    assert!(zones.is_empty());
}

#[tokio::test]
async fn test_favorites_and_playlists() {
    let mut server = Server::new_async().await;
    let _favorites = server
        .mock("GET", "/favorites")
        .with_status(200)
        .with_body(r#"["Jazz FM", "Morning Mix"]"#)
        .create_async()
        .await;
    let _playlists = server
        .mock("GET", "/playlists")
        .with_status(200)
        .with_body(r#"["Dinner"]"#)
        .create_async()
        .await;

    let client = client_for(&server);
    assert_eq!(
        client.favorites().await.unwrap(),
        vec!["Jazz FM".to_string(), "Morning Mix".to_string()]
    );
    assert_eq!(client.playlists().await.unwrap(), vec!["Dinner".to_string()]);
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/zones")
        .with_status(500)
        .create_async()
        .await;

    let client = client_for(&server);
    match client.zones().await {
        Err(ApiError::Status { status, path }) => {
            assert_eq!(status, 500);
            assert_eq!(path, "/zones");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_parse() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/zones")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(matches!(client.zones().await, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn test_unreachable_service_maps_to_network() {
    let config = ClientConfig::default().with_base_url("http://127.0.0.1:1/");
    let client = JishiClient::with_config(config).unwrap();
    assert!(matches!(client.zones().await, Err(ApiError::Network(_))));
}

#[rstest]
#[case(PlayerCommand::Play, "/Living%20Room/play")]
#[case(PlayerCommand::Volume(35), "/Living%20Room/volume/35")]
#[case(PlayerCommand::GroupMute, "/Living%20Room/groupMute")]
#[case(PlayerCommand::Shuffle(true), "/Living%20Room/shuffle/on")]
#[case(PlayerCommand::Playlist("Dinner Party".into()), "/Living%20Room/playlist/Dinner%20Party")]
#[case(PlayerCommand::Leave, "/Living%20Room/leave")]
#[tokio::test]
async fn test_player_commands_hit_expected_path(
    #[case] command: PlayerCommand,
    #[case] path: &str,
) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", path)
        .with_status(200)
        .with_body(r#"{"status":"success"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    client.player("Living Room", &command).await.unwrap();
    mock.assert_async().await;
}

#[rstest]
#[case(SystemCommand::PauseAll(None), "/pauseall")]
#[case(SystemCommand::ResumeAll(Some(20)), "/resumeall/20")]
#[case(SystemCommand::ClipAll("chime.mp3".into()), "/clipall/chime.mp3")]
#[tokio::test]
async fn test_system_commands_hit_expected_path(#[case] command: SystemCommand, #[case] path: &str) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", path)
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server);
    client.system(&command).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_command_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client.player("Kitchen", &PlayerCommand::Volume(150)).await;
    assert!(matches!(result, Err(ApiError::InvalidParameter(_))));

    let result = client.player("", &PlayerCommand::Play).await;
    assert!(matches!(result, Err(ApiError::InvalidParameter(_))));

    mock.assert_async().await;
}
