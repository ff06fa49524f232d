use serde::{Deserialize, Serialize};

/// Number of users in one country, keyed by ISO3 code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationCount {
    pub id: String,
    pub value: u64,
}
