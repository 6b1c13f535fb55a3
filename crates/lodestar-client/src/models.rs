//! Wire types for the server lobby endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Party state as returned by the lobby service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartyDataUpdateNotif {
    /// Storage version, in milliseconds since the epoch. Writes must echo it.
    pub updated_at: i64,
    pub party_id: String,
    pub leader: String,
    pub namespace: String,
    pub members: Vec<String>,
    pub invitees: Vec<String>,
    #[serde(rename = "custom_attribute")]
    pub custom_attribute: HashMap<String, Value>,
}

/// Body of a party storage write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyDataUpdateRequest {
    pub custom_attribute: HashMap<String, Value>,
    /// The `updated_at` of the state this write is based on.
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

impl PartyDataUpdateRequest {
    /// A write replacing the custom attributes of `based_on`.
    pub fn based_on(based_on: &PartyDataUpdateNotif, custom_attribute: HashMap<String, Value>) -> Self {
        Self {
            custom_attribute,
            updated_at: based_on.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerGetSessionAttributeResponse {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetSessionAttributeAllResponse {
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerSetSessionAttributeRequest {
    pub attributes: HashMap<String, String>,
}
