//! Runs one lobby operation and reports its outcome.

use std::process::ExitCode;

use serde_json::{Value, json};

use lodestar_client::models::PartyDataUpdateRequest;
use lodestar_client::{ApiResult, Error, Routed, ServerLobbyApi};

use crate::config::{Command, attribute_map};

/// How a command ended.
#[derive(Debug)]
pub enum Outcome {
    Success(Value),
    Failure(Error),
    /// The write was based on stale state.
    Conflict(Error),
}

impl Outcome {
    fn from_result<T: serde::Serialize>(result: ApiResult<T>) -> Self {
        match result {
            Ok(value) => match serde_json::to_value(value) {
                Ok(value) => Self::Success(value),
                Err(e) => Self::Failure(Error::with_message(
                    lodestar_client::ErrorCode::InvalidResponse,
                    e.to_string(),
                )),
            },
            Err(err) => Self::Failure(err),
        }
    }

    /// JSON printed on stdout.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success(value) => json!({ "ok": true, "value": value }),
            Self::Failure(err) => json!({ "ok": false, "error": err }),
            Self::Conflict(err) => json!({ "ok": false, "conflict": true, "error": err }),
        }
    }

    /// 0 on success, 1 on failure, 2 on conflict.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Success(_) => ExitCode::SUCCESS,
            Self::Failure(_) => ExitCode::from(1),
            Self::Conflict(_) => ExitCode::from(2),
        }
    }
}

/// Executes `command` against `api`.
pub async fn run(command: &Command, api: &ServerLobbyApi, namespace: &str, token: &str) -> Outcome {
    match command {
        Command::GetPartyStorage { party_id } => {
            Outcome::from_result(api.get_party_storage(namespace, token, party_id).await)
        }
        Command::WritePartyStorage {
            party_id,
            data,
            updated_at,
        } => {
            let custom_attribute = match serde_json::from_str(data) {
                Ok(attrs) => attrs,
                Err(e) => {
                    return Outcome::Failure(Error::with_message(
                        lodestar_client::ErrorCode::InvalidArgument,
                        format!("--data must be a JSON object: {e}"),
                    ));
                }
            };
            let request = PartyDataUpdateRequest {
                custom_attribute,
                updated_at: *updated_at,
            };
            match api
                .write_party_storage(namespace, token, &request, party_id)
                .await
            {
                Routed::Completed(result) => Outcome::from_result(result),
                Routed::Conflict(err) => Outcome::Conflict(err),
            }
        }
        Command::GetUserParty { user_id } => {
            Outcome::from_result(api.get_party_data_by_user_id(namespace, token, user_id).await)
        }
        Command::GetSessionAttribute { user_id, key } => Outcome::from_result(
            api.get_session_attribute(namespace, token, user_id, key)
                .await,
        ),
        Command::GetSessionAttributes { user_id } => {
            Outcome::from_result(api.get_session_attribute_all(namespace, token, user_id).await)
        }
        Command::SetSessionAttributes {
            user_id,
            attributes,
        } => {
            let attributes = attribute_map(attributes);
            Outcome::from_result(
                api.set_session_attribute(namespace, token, user_id, &attributes)
                    .await,
            )
        }
    }
}
