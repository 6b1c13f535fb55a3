//! Integration tests for the lobby API over real HTTP.
//!
//! Each test starts an in-memory mock lobby on an ephemeral port and drives
//! it through `ReqwestTransport`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use lodestar::commands::{self, Outcome};
use lodestar::config::Command;
use lodestar_client::models::{
    PartyDataUpdateNotif, PartyDataUpdateRequest, ServerGetSessionAttributeResponse,
    ServerSetSessionAttributeRequest,
};
use lodestar_client::{
    ApiClient, ApiResultExt, ErrorCode, ReqwestTransport, Routed, ServerConfig, ServerLobbyApi,
};

const TOKEN: &str = "server-secret";
const NAMESPACE: &str = "game";

#[derive(Clone, Default)]
struct Lobby {
    parties: Arc<Mutex<HashMap<String, PartyDataUpdateNotif>>>,
    attributes: Arc<Mutex<HashMap<String, HashMap<String, String>>>>,
    request_ids: Arc<Mutex<Vec<String>>>,
}

impl Lobby {
    fn check(&self, headers: &HeaderMap) -> Result<(), Response> {
        if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            self.request_ids.lock().push(id.to_owned());
        }
        let expected = format!("Bearer {TOKEN}");
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some(auth) if auth == expected => Ok(()),
            _ => Err(StatusCode::UNAUTHORIZED.into_response()),
        }
    }
}

fn party_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"errorCode": 11901, "errorMessage": "party not found"})),
    )
        .into_response()
}

async fn get_party(
    State(lobby): State<Lobby>,
    Path((_namespace, party_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = lobby.check(&headers) {
        return denied;
    }
    match lobby.parties.lock().get(&party_id) {
        Some(party) => Json(party.clone()).into_response(),
        None => party_not_found(),
    }
}

async fn write_party(
    State(lobby): State<Lobby>,
    Path((_namespace, party_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<PartyDataUpdateRequest>,
) -> Response {
    if let Err(denied) = lobby.check(&headers) {
        return denied;
    }
    let mut parties = lobby.parties.lock();
    let Some(party) = parties.get_mut(&party_id) else {
        return party_not_found();
    };
    if body.updated_at != party.updated_at {
        return (
            StatusCode::PRECONDITION_FAILED,
            Json(json!({"errorCode": 119017, "errorMessage": "party storage was modified"})),
        )
            .into_response();
    }
    party.custom_attribute = body.custom_attribute;
    party.updated_at += 1;
    Json(party.clone()).into_response()
}

async fn get_user_party(
    State(lobby): State<Lobby>,
    Path((_namespace, user_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = lobby.check(&headers) {
        return denied;
    }
    let parties = lobby.parties.lock();
    match parties.values().find(|p| p.members.contains(&user_id)) {
        Some(party) => Json(party.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_attribute(
    State(lobby): State<Lobby>,
    Path((_namespace, user_id, key)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = lobby.check(&headers) {
        return denied;
    }
    let attributes = lobby.attributes.lock();
    match attributes.get(&user_id).and_then(|a| a.get(&key)) {
        Some(value) => Json(ServerGetSessionAttributeResponse {
            key,
            value: value.clone(),
        })
        .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "attribute not set"}))).into_response(),
    }
}

async fn get_attributes(
    State(lobby): State<Lobby>,
    Path((_namespace, user_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = lobby.check(&headers) {
        return denied;
    }
    let attributes = lobby.attributes.lock().get(&user_id).cloned().unwrap_or_default();
    Json(json!({ "attributes": attributes })).into_response()
}

async fn set_attributes(
    State(lobby): State<Lobby>,
    Path((_namespace, user_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<ServerSetSessionAttributeRequest>,
) -> Response {
    if let Err(denied) = lobby.check(&headers) {
        return denied;
    }
    lobby
        .attributes
        .lock()
        .entry(user_id)
        .or_default()
        .extend(body.attributes);
    StatusCode::NO_CONTENT.into_response()
}

/// Boots the mock lobby with one party (`party-1`, members `u1`, `u2`).
/// Returns the base URL (e.g. "http://127.0.0.1:12345") and the state.
async fn spawn_lobby() -> (String, Lobby) {
    let lobby = Lobby::default();
    lobby.parties.lock().insert(
        "party-1".to_owned(),
        PartyDataUpdateNotif {
            updated_at: 100,
            party_id: "party-1".to_owned(),
            leader: "u1".to_owned(),
            namespace: NAMESPACE.to_owned(),
            members: vec!["u1".to_owned(), "u2".to_owned()],
            ..PartyDataUpdateNotif::default()
        },
    );

    let app = Router::new()
        .route(
            "/lobby/v1/admin/party/namespaces/{namespace}/parties/{party_id}",
            get(get_party),
        )
        .route(
            "/lobby/v1/admin/party/namespaces/{namespace}/parties/{party_id}/attributes",
            axum::routing::put(write_party),
        )
        .route(
            "/lobby/v1/admin/party/namespaces/{namespace}/users/{user_id}/party",
            get(get_user_party),
        )
        .route(
            "/lobby/v1/admin/player/namespaces/{namespace}/users/{user_id}/attributes",
            get(get_attributes).put(set_attributes),
        )
        .route(
            "/lobby/v1/admin/player/namespaces/{namespace}/users/{user_id}/attributes/{key}",
            get(get_attribute),
        )
        .with_state(lobby.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), lobby)
}

fn lobby_api(base_url: &str) -> ServerLobbyApi {
    let config = ServerConfig::new(NAMESPACE, base_url).prepare().unwrap();
    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    ServerLobbyApi::from_config(&config, ApiClient::new(transport)).unwrap()
}

// ---------------------------------------------------------------------------
// Party storage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn read_then_write_party_storage() {
    let (base, _lobby) = spawn_lobby().await;
    let api = lobby_api(&base);

    let party = api
        .get_party_storage(NAMESPACE, TOKEN, "party-1")
        .await
        .unwrap();
    assert_eq!(party.updated_at, 100);

    let request = PartyDataUpdateRequest::based_on(
        &party,
        HashMap::from([("map".to_owned(), json!("harbor"))]),
    );
    let written = api
        .write_party_storage(NAMESPACE, TOKEN, &request, "party-1")
        .await
        .into_result()
        .unwrap();
    assert_eq!(written.updated_at, 101);
    assert_eq!(written.custom_attribute["map"], "harbor");
}

#[tokio::test]
async fn stale_write_is_a_conflict_and_retry_succeeds() {
    let (base, _lobby) = spawn_lobby().await;
    let api = lobby_api(&base);

    let stale = PartyDataUpdateRequest {
        custom_attribute: HashMap::from([("mode".to_owned(), json!("ranked"))]),
        updated_at: 1,
    };
    let routed = api
        .write_party_storage(NAMESPACE, TOKEN, &stale, "party-1")
        .await;
    let err = match routed {
        Routed::Conflict(err) => err,
        other => panic!("expected a conflict, got {other:?}"),
    };
    assert_eq!(err.code(), ErrorCode::PartyStorageOutdatedUpdateData);
    assert_eq!(err.message(), "party storage was modified");

    let fresh = api
        .get_party_storage(NAMESPACE, TOKEN, "party-1")
        .await
        .unwrap();
    let retry = PartyDataUpdateRequest::based_on(&fresh, stale.custom_attribute.clone());
    let written = api
        .write_party_storage(NAMESPACE, TOKEN, &retry, "party-1")
        .await
        .into_result()
        .unwrap();
    assert_eq!(written.custom_attribute["mode"], "ranked");
}

#[tokio::test]
async fn conflict_callback_over_http() {
    let (base, _lobby) = spawn_lobby().await;
    let api = lobby_api(&base);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<&'static str>();
    let conflict_tx = tx.clone();

    api.write_party_storage_with_callback(
        NAMESPACE,
        TOKEN,
        PartyDataUpdateRequest::default(),
        "party-1",
        move |_| {
            let _ = tx.send("complete");
        },
        Some(Box::new(move || {
            let _ = conflict_tx.send("conflict");
        })),
    )
    .join()
    .await;

    assert_eq!(rx.recv().await, Some("conflict"));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn unknown_party_is_a_domain_error() {
    let (base, _lobby) = spawn_lobby().await;
    let api = lobby_api(&base);

    let result = api.get_party_storage(NAMESPACE, TOKEN, "nope").await;
    let err = result.error().unwrap();
    assert_eq!(err.code(), ErrorCode::PartyNotFound);
    assert_eq!(err.message(), "party not found");
}

#[tokio::test]
async fn party_by_user() {
    let (base, _lobby) = spawn_lobby().await;
    let api = lobby_api(&base);

    let party = api
        .get_party_data_by_user_id(NAMESPACE, TOKEN, "u2")
        .await
        .unwrap();
    assert_eq!(party.party_id, "party-1");

    let err = api
        .get_party_data_by_user_id(NAMESPACE, TOKEN, "stranger")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

// ---------------------------------------------------------------------------
// Session attributes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_attributes_round_trip() {
    let (base, _lobby) = spawn_lobby().await;
    let api = lobby_api(&base);

    let attrs = HashMap::from([
        ("region".to_owned(), "eu".to_owned()),
        ("tier".to_owned(), "gold".to_owned()),
    ]);
    api.set_session_attribute(NAMESPACE, TOKEN, "u1", &attrs)
        .await
        .unwrap();

    let one = api
        .get_session_attribute(NAMESPACE, TOKEN, "u1", "region")
        .await
        .unwrap();
    assert_eq!(one.value, "eu");

    let all = api
        .get_session_attribute_all(NAMESPACE, TOKEN, "u1")
        .await
        .unwrap();
    assert_eq!(all.attributes, attrs);

    let missing = api
        .get_session_attribute(NAMESPACE, TOKEN, "u1", "nope")
        .await
        .unwrap_err();
    assert_eq!(missing.code(), ErrorCode::NotFound);
    assert_eq!(missing.message(), "attribute not set");
}

// ---------------------------------------------------------------------------
// Transport and auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_token_is_unauthorized() {
    let (base, _lobby) = spawn_lobby().await;
    let api = lobby_api(&base);

    let err = api
        .get_party_storage(NAMESPACE, "wrong", "party-1")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn every_call_carries_a_request_id() {
    let (base, lobby) = spawn_lobby().await;
    let api = lobby_api(&base);

    api.get_party_storage(NAMESPACE, TOKEN, "party-1")
        .await
        .unwrap();
    api.get_party_storage(NAMESPACE, TOKEN, "party-1")
        .await
        .unwrap();

    let ids = lobby.request_ids.lock().clone();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0].len(), 36); // UUID format: 8-4-4-4-12
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn closed_port_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = lobby_api(&format!("http://{addr}"));
    let err = api
        .get_party_storage(NAMESPACE, TOKEN, "party-1")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NetworkError);
}

// ---------------------------------------------------------------------------
// CLI commands
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cli_command_outcomes() {
    let (base, _lobby) = spawn_lobby().await;
    let api = lobby_api(&base);

    let outcome = commands::run(
        &Command::GetPartyStorage {
            party_id: "party-1".to_owned(),
        },
        &api,
        NAMESPACE,
        TOKEN,
    )
    .await;
    let printed = outcome.to_json();
    assert_eq!(printed["ok"], true);
    assert_eq!(printed["value"]["partyId"], "party-1");

    let outcome = commands::run(
        &Command::WritePartyStorage {
            party_id: "party-1".to_owned(),
            data: r#"{"map":"harbor"}"#.to_owned(),
            updated_at: 5,
        },
        &api,
        NAMESPACE,
        TOKEN,
    )
    .await;
    assert!(matches!(outcome, Outcome::Conflict(_)));
    let printed: Value = outcome.to_json();
    assert_eq!(printed["conflict"], true);
    assert_eq!(printed["error"]["code"], 119_017);

    let outcome = commands::run(
        &Command::WritePartyStorage {
            party_id: "party-1".to_owned(),
            data: "[1, 2]".to_owned(),
            updated_at: 100,
        },
        &api,
        NAMESPACE,
        TOKEN,
    )
    .await;
    match outcome {
        Outcome::Failure(err) => assert_eq!(err.code(), ErrorCode::InvalidArgument),
        other => panic!("unexpected outcome: {other:?}"),
    }
}
