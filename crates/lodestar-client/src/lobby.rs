//! Server-side lobby API: party storage and session attributes.
//!
//! Every operation has an async form returning the result and a callback
//! form that runs in the background and returns a [`CallHandle`]. Missing
//! arguments are reported as `InvalidArgument` failures through the same
//! path as any other failure.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use lodestar_core::{ApiResult, Error, ErrorCode};

use crate::callback::{CallHandle, spawn_with_callback, spawn_with_conflict};
use crate::client::ApiClient;
use crate::config::{ConfigError, ServerConfig};
use crate::models::{
    GetSessionAttributeAllResponse, PartyDataUpdateNotif, PartyDataUpdateRequest,
    ServerGetSessionAttributeResponse, ServerSetSessionAttributeRequest,
};
use crate::request::{HttpRequest, HttpRequestBuilder, MediaType};
use crate::routing::{ConflictCallback, DEFAULT_CONFLICT_CODES, Routed};

const PARTY_ATTRIBUTES: &str = "/v1/admin/party/namespaces/{namespace}/parties/{partyId}/attributes";
const PARTY: &str = "/v1/admin/party/namespaces/{namespace}/parties/{partyId}";
const USER_PARTY: &str = "/v1/admin/party/namespaces/{namespace}/users/{userId}/party";
const SESSION_ATTRIBUTE: &str =
    "/v1/admin/player/namespaces/{namespace}/users/{userId}/attributes/{attribute}";
const SESSION_ATTRIBUTES: &str = "/v1/admin/player/namespaces/{namespace}/users/{userId}/attributes";

fn require(name: &str, value: &str) -> ApiResult {
    if value.trim().is_empty() {
        return Err(Error::with_message(
            ErrorCode::InvalidArgument,
            format!("{name} cannot be null or empty"),
        ));
    }
    Ok(())
}

fn invalid_request(err: &crate::request::RequestError) -> Error {
    Error::with_message(ErrorCode::InvalidRequest, err.to_string())
}

/// Lobby endpoints used by dedicated servers.
#[derive(Clone)]
pub struct ServerLobbyApi {
    base_url: String,
    client: ApiClient,
}

impl ServerLobbyApi {
    /// Binds to an explicit lobby base URL such as `https://host/lobby`.
    pub fn new(base_url: impl Into<String>, client: ApiClient) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        }
    }

    /// Binds to the lobby URL of a validated config.
    pub fn from_config(config: &ServerConfig, client: ApiClient) -> Result<Self, ConfigError> {
        config.check_required()?;
        Ok(Self::new(config.lobby_url(), client))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn builder(&self, method: reqwest::Method, path: &str, namespace: &str, token: &str) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, format!("{}{path}", self.base_url))
            .with_path_param("namespace", namespace)
            .with_bearer_auth(token)
            .with_content_type(MediaType::ApplicationJson)
            .accepts(MediaType::ApplicationJson)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: Result<HttpRequest, Error>) -> ApiResult<T> {
        self.client.call_json(request?).await
    }

    /// Writes party custom attributes, guarded by `data.updated_at`.
    ///
    /// A write based on stale state comes back as [`Routed::Conflict`]; the
    /// caller should re-read with [`Self::get_party_storage`] and retry.
    pub async fn write_party_storage(
        &self,
        namespace: &str,
        access_token: &str,
        data: &PartyDataUpdateRequest,
        party_id: &str,
    ) -> Routed<PartyDataUpdateNotif> {
        let request = require("namespace", namespace)
            .and_then(|()| require("accessToken", access_token))
            .and_then(|()| require("partyId", party_id))
            .and_then(|()| {
                self.builder(reqwest::Method::PUT, PARTY_ATTRIBUTES, namespace, access_token)
                    .with_path_param("partyId", party_id)
                    .with_json_body(data)
                    .and_then(HttpRequestBuilder::build)
                    .map_err(|e| invalid_request(&e))
            });

        match request {
            Ok(request) => {
                self.client
                    .call_json_with_conflict(request, DEFAULT_CONFLICT_CODES)
                    .await
            }
            Err(err) => Routed::Completed(Err(err)),
        }
    }

    pub async fn get_party_storage(
        &self,
        namespace: &str,
        access_token: &str,
        party_id: &str,
    ) -> ApiResult<PartyDataUpdateNotif> {
        let request = require("namespace", namespace)
            .and_then(|()| require("accessToken", access_token))
            .and_then(|()| require("partyId", party_id))
            .and_then(|()| {
                self.builder(reqwest::Method::GET, PARTY, namespace, access_token)
                    .with_path_param("partyId", party_id)
                    .build()
                    .map_err(|e| invalid_request(&e))
            });
        self.get_json(request).await
    }

    pub async fn get_party_data_by_user_id(
        &self,
        namespace: &str,
        access_token: &str,
        user_id: &str,
    ) -> ApiResult<PartyDataUpdateNotif> {
        let request = require("namespace", namespace)
            .and_then(|()| require("accessToken", access_token))
            .and_then(|()| require("userId", user_id))
            .and_then(|()| {
                self.builder(reqwest::Method::GET, USER_PARTY, namespace, access_token)
                    .with_path_param("userId", user_id)
                    .build()
                    .map_err(|e| invalid_request(&e))
            });
        self.get_json(request).await
    }

    pub async fn get_session_attribute(
        &self,
        namespace: &str,
        access_token: &str,
        user_id: &str,
        key: &str,
    ) -> ApiResult<ServerGetSessionAttributeResponse> {
        let request = require("namespace", namespace)
            .and_then(|()| require("accessToken", access_token))
            .and_then(|()| require("userId", user_id))
            .and_then(|()| require("key", key))
            .and_then(|()| {
                self.builder(reqwest::Method::GET, SESSION_ATTRIBUTE, namespace, access_token)
                    .with_path_param("userId", user_id)
                    .with_path_param("attribute", key)
                    .build()
                    .map_err(|e| invalid_request(&e))
            });
        self.get_json(request).await
    }

    pub async fn get_session_attribute_all(
        &self,
        namespace: &str,
        access_token: &str,
        user_id: &str,
    ) -> ApiResult<GetSessionAttributeAllResponse> {
        let request = require("namespace", namespace)
            .and_then(|()| require("accessToken", access_token))
            .and_then(|()| require("userId", user_id))
            .and_then(|()| {
                self.builder(reqwest::Method::GET, SESSION_ATTRIBUTES, namespace, access_token)
                    .with_path_param("userId", user_id)
                    .build()
                    .map_err(|e| invalid_request(&e))
            });
        self.get_json(request).await
    }

    /// Replaces session attributes of a user. Succeeds with no value.
    pub async fn set_session_attribute(
        &self,
        namespace: &str,
        access_token: &str,
        user_id: &str,
        attributes: &HashMap<String, String>,
    ) -> ApiResult {
        let request = require("namespace", namespace)
            .and_then(|()| require("accessToken", access_token))
            .and_then(|()| require("userId", user_id))
            .and_then(|()| {
                if attributes.is_empty() {
                    return Err(Error::with_message(
                        ErrorCode::InvalidArgument,
                        "attributes cannot be null or empty",
                    ));
                }
                let body = ServerSetSessionAttributeRequest {
                    attributes: attributes.clone(),
                };
                self.builder(reqwest::Method::PUT, SESSION_ATTRIBUTES, namespace, access_token)
                    .with_path_param("userId", user_id)
                    .with_json_body(&body)
                    .and_then(HttpRequestBuilder::build)
                    .map_err(|e| invalid_request(&e))
            });
        self.client.call_empty(request?).await
    }

    // Callback entry points. Each copies its arguments into a background task.

    pub fn write_party_storage_with_callback<C>(
        &self,
        namespace: &str,
        access_token: &str,
        data: PartyDataUpdateRequest,
        party_id: &str,
        on_complete: C,
        on_conflict: Option<ConflictCallback>,
    ) -> CallHandle
    where
        C: FnOnce(ApiResult<PartyDataUpdateNotif>) + Send + 'static,
    {
        let api = self.clone();
        let (namespace, access_token, party_id) = owned3(namespace, access_token, party_id);
        spawn_with_conflict(
            async move {
                api.write_party_storage(&namespace, &access_token, &data, &party_id)
                    .await
            },
            on_complete,
            on_conflict,
        )
    }

    pub fn get_party_storage_with_callback<C>(
        &self,
        namespace: &str,
        access_token: &str,
        party_id: &str,
        on_complete: C,
    ) -> CallHandle
    where
        C: FnOnce(ApiResult<PartyDataUpdateNotif>) + Send + 'static,
    {
        let api = self.clone();
        let (namespace, access_token, party_id) = owned3(namespace, access_token, party_id);
        spawn_with_callback(
            async move { api.get_party_storage(&namespace, &access_token, &party_id).await },
            on_complete,
        )
    }

    pub fn get_party_data_by_user_id_with_callback<C>(
        &self,
        namespace: &str,
        access_token: &str,
        user_id: &str,
        on_complete: C,
    ) -> CallHandle
    where
        C: FnOnce(ApiResult<PartyDataUpdateNotif>) + Send + 'static,
    {
        let api = self.clone();
        let (namespace, access_token, user_id) = owned3(namespace, access_token, user_id);
        spawn_with_callback(
            async move {
                api.get_party_data_by_user_id(&namespace, &access_token, &user_id)
                    .await
            },
            on_complete,
        )
    }

    pub fn get_session_attribute_with_callback<C>(
        &self,
        namespace: &str,
        access_token: &str,
        user_id: &str,
        key: &str,
        on_complete: C,
    ) -> CallHandle
    where
        C: FnOnce(ApiResult<ServerGetSessionAttributeResponse>) + Send + 'static,
    {
        let api = self.clone();
        let (namespace, access_token, user_id) = owned3(namespace, access_token, user_id);
        let key = key.to_owned();
        spawn_with_callback(
            async move {
                api.get_session_attribute(&namespace, &access_token, &user_id, &key)
                    .await
            },
            on_complete,
        )
    }

    pub fn get_session_attribute_all_with_callback<C>(
        &self,
        namespace: &str,
        access_token: &str,
        user_id: &str,
        on_complete: C,
    ) -> CallHandle
    where
        C: FnOnce(ApiResult<GetSessionAttributeAllResponse>) + Send + 'static,
    {
        let api = self.clone();
        let (namespace, access_token, user_id) = owned3(namespace, access_token, user_id);
        spawn_with_callback(
            async move {
                api.get_session_attribute_all(&namespace, &access_token, &user_id)
                    .await
            },
            on_complete,
        )
    }

    pub fn set_session_attribute_with_callback<C>(
        &self,
        namespace: &str,
        access_token: &str,
        user_id: &str,
        attributes: HashMap<String, String>,
        on_complete: C,
    ) -> CallHandle
    where
        C: FnOnce(ApiResult) + Send + 'static,
    {
        let api = self.clone();
        let (namespace, access_token, user_id) = owned3(namespace, access_token, user_id);
        spawn_with_callback(
            async move {
                api.set_session_attribute(&namespace, &access_token, &user_id, &attributes)
                    .await
            },
            on_complete,
        )
    }
}

fn owned3(a: &str, b: &str, c: &str) -> (String, String, String) {
    (a.to_owned(), b.to_owned(), c.to_owned())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::transport::{RawResponse, Transport, TransportError};

    /// Records every request and answers with a fixed response.
    struct Recorder {
        seen: std::sync::Arc<Mutex<Vec<HttpRequest>>>,
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn send(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
            self.seen.lock().push(request);
            Ok(RawResponse::new(self.status, self.body))
        }
    }

    fn api(status: u16, body: &'static str) -> (ServerLobbyApi, std::sync::Arc<Mutex<Vec<HttpRequest>>>) {
        let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
        let client = ApiClient::new(Recorder {
            seen: seen.clone(),
            status,
            body,
        });
        (ServerLobbyApi::new("https://demo.example.com/lobby/", client), seen)
    }

    #[tokio::test]
    async fn write_party_storage_builds_put() {
        let (api, seen) = api(200, r#"{"partyId":"p1","updatedAt":2}"#);
        let data = PartyDataUpdateRequest {
            updated_at: 1,
            ..PartyDataUpdateRequest::default()
        };
        let notif = api
            .write_party_storage("game", "tok", &data, "p1")
            .await
            .into_result()
            .unwrap();
        assert_eq!(notif.updated_at, 2);

        let seen = seen.lock();
        let req = &seen[0];
        assert_eq!(*req.method(), reqwest::Method::PUT);
        assert_eq!(
            req.url().as_str(),
            "https://demo.example.com/lobby/v1/admin/party/namespaces/game/parties/p1/attributes"
        );
        assert_eq!(req.headers()["authorization"], "Bearer tok");
        let body: serde_json::Value = serde_json::from_slice(req.body().unwrap()).unwrap();
        assert_eq!(body["updatedAt"], 1);
    }

    #[tokio::test]
    async fn missing_arguments_fail_without_sending() {
        let (api, seen) = api(200, "{}");

        let err = api.get_party_storage("", "tok", "p1").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(err.message(), "namespace cannot be null or empty");

        let err = api
            .set_session_attribute("game", "tok", "u1", &HashMap::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);

        let routed = api
            .write_party_storage("game", "", &PartyDataUpdateRequest::default(), "p1")
            .await;
        assert!(!routed.is_conflict());
        assert_eq!(routed.into_result().unwrap_err().code(), ErrorCode::InvalidArgument);

        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn session_attribute_paths() {
        let (api, seen) = api(200, r#"{"key":"region","value":"eu"}"#);
        let attr = api
            .get_session_attribute("game", "tok", "u1", "region")
            .await
            .unwrap();
        assert_eq!(attr.value, "eu");
        assert_eq!(
            seen.lock()[0].url().path(),
            "/lobby/v1/admin/player/namespaces/game/users/u1/attributes/region"
        );
    }

    #[tokio::test]
    async fn set_session_attribute_is_value_less() {
        let (api, seen) = api(204, "");
        let attrs = HashMap::from([("region".to_owned(), "eu".to_owned())]);
        api.set_session_attribute("game", "tok", "u1", &attrs)
            .await
            .unwrap();
        let seen = seen.lock();
        let body: serde_json::Value = serde_json::from_slice(seen[0].body().unwrap()).unwrap();
        assert_eq!(body["attributes"]["region"], "eu");
    }
}
