//! On-chain leaderboard scaffolding: the contract ABI, parsed into typed
//! descriptors. Nothing in the game loop talks to a chain; this exists so
//! a wallet integration can be wired up without re-deriving the interface.

use once_cell::sync::Lazy;
use serde::Deserialize;

pub const LEADERBOARD_ABI_JSON: &str = include_str!("leaderboard_abi.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiParam {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub indexed: bool,
    #[serde(default)]
    pub internal_type: Option<String>,
    #[serde(default)]
    pub components: Vec<AbiParam>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(default)]
    pub state_mutability: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
}

static ABI: Lazy<Vec<AbiEntry>> = Lazy::new(|| {
    // the embedded JSON is a build-time constant; a parse failure is a
    // packaging bug caught by the tests below
    serde_json::from_str(LEADERBOARD_ABI_JSON).expect("embedded leaderboard ABI is valid")
});

pub fn leaderboard_abi() -> &'static [AbiEntry] {
    ABI.as_slice()
}

pub fn function(name: &str) -> Option<&'static AbiEntry> {
    ABI.iter()
        .find(|entry| entry.kind == "function" && entry.name.as_deref() == Some(name))
}

pub fn event(name: &str) -> Option<&'static AbiEntry> {
    ABI.iter()
        .find(|entry| entry.kind == "event" && entry.name.as_deref() == Some(name))
}
