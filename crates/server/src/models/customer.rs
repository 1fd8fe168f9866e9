//! Customer model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tangerine_core::{CustomerId, Email};

/// A stored customer.
///
/// The `password` field is an opaque string: it is stored and echoed back
/// verbatim, never interpreted. Hashing it belongs to an authentication
/// layer this service does not have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire input for creating or replacing a customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: String,
}

/// A validated customer value, ready to persist.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: String,
}
