//! EVE SSO and CREST payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{domain::CharacterId, Result};

/// Token bundle returned by the SSO token endpoint.
///
/// Fields we do not use are kept verbatim in `extra` so the stored credential matches what
/// SSO handed out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OAuthCredential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OAuthCredential {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: None,
            expires_in: None,
            refresh_token: None,
            extra: Map::new(),
        }
    }
}

/// Response of the SSO `verify` endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterData {
    #[serde(rename = "CharacterID")]
    pub character_id: CharacterId,
    #[serde(rename = "CharacterName")]
    pub character_name: String,
    #[serde(rename = "ExpiresOn", default)]
    pub expires_on: Option<String>,
    #[serde(rename = "Scopes", default)]
    pub scopes: Option<String>,
    #[serde(rename = "TokenType", default)]
    pub token_type: Option<String>,
    #[serde(rename = "CharacterOwnerHash", default)]
    pub character_owner_hash: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TypeRef {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FittingItem {
    #[serde(rename = "type")]
    pub item_type: TypeRef,
    #[serde(default)]
    pub flag: i64,
    #[serde(default = "one")]
    pub quantity: i64,
}

/// One saved ship fitting.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Fitting {
    #[serde(rename = "fittingID")]
    pub fitting_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ship: TypeRef,
    #[serde(default)]
    pub items: Vec<FittingItem>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FittingList {
    Page { items: Vec<Fitting> },
    Bare(Vec<Fitting>),
}

fn one() -> i64 {
    1
}

/// Typed view over the fitting list JSON (a CREST page `{"items": [...]}` or a bare array).
pub fn parse_fittings(raw: &Value) -> Result<Vec<Fitting>> {
    let list = FittingList::deserialize(raw)?;
    Ok(match list {
        FittingList::Page { items } | FittingList::Bare(items) => items,
    })
}

/// Where a fitted item sits, in the order fits are usually read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    High,
    Mid,
    Low,
    Rig,
    Subsystem,
    DroneBay,
    Cargo,
    Other,
}

impl Slot {
    /// Map an inventory flag to its slot group.
    pub fn from_flag(flag: i64) -> Self {
        match flag {
            27..=34 => Self::High,
            19..=26 => Self::Mid,
            11..=18 => Self::Low,
            92..=99 => Self::Rig,
            125..=132 => Self::Subsystem,
            87 => Self::DroneBay,
            5 => Self::Cargo,
            _ => Self::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High slots",
            Self::Mid => "Mid slots",
            Self::Low => "Low slots",
            Self::Rig => "Rigs",
            Self::Subsystem => "Subsystems",
            Self::DroneBay => "Drone bay",
            Self::Cargo => "Cargo",
            Self::Other => "Other",
        }
    }
}
