// crates/rocket-ledger/src/snapshot.rs
//
// Serialisable image of a desk's ledger state.

use serde::{Deserialize, Serialize};

use rocket_core::RocketError;

use crate::allocation::Market;
use crate::events::LedgerEvent;
use crate::orders::Order;

/// Markets, pending orders, and the event journal of one desk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub markets: Vec<Market>,
    pub orders: Vec<Order>,
    #[serde(default)]
    pub events: Vec<LedgerEvent>,
}

impl LedgerSnapshot {
    pub fn to_json(&self) -> Result<String, RocketError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RocketError> {
        Ok(serde_json::from_str(json)?)
    }
}
