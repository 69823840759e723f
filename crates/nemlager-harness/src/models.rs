// crates/nemlager-harness/src/models.rs
// ============================================================================
// Module: API Models
// Description: Decode targets for NemLager API payloads.
// Purpose: Give each endpoint version its own typed view of the response.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! These types are transient decode targets for state owned by the API. The
//! v1 and v2 settings endpoints disagree on the shape of `useReference`, so
//! each version has its own struct. Cron mail records round-trip: they are
//! read from the listing endpoint and replayed verbatim to trigger endpoints.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Paths
// ============================================================================

/// `GET` v1 customer settings.
pub const V1_SETTINGS_PATH: &str = "/api/v1/settings";
/// `GET` v2 customer settings.
pub const V2_SETTINGS_PATH: &str = "/api/v2/settings";
/// `GET` product list.
pub const V1_PRODUCTS_PATH: &str = "/api/v1/products";
/// `POST` sign-in, without the method query.
pub const V1_SIGN_IN_PATH: &str = "/api/v1/auth/sign-in";
/// `GET` cron mail listing.
pub const V1_CRON_MAILS_PATH: &str = "/api/v1/cron/mails";
/// `POST` stock movements mail trigger.
pub const V1_CRON_STOCK_MOVEMENTS_PATH: &str = "/api/v1/cron/mails/stock-movements";
/// `POST` stock value mail trigger.
pub const V1_CRON_STOCK_VALUE_PATH: &str = "/api/v1/cron/mails/stock-value";

// ============================================================================
// SECTION: Customer Settings
// ============================================================================

/// Customer settings as returned by the v1 endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V1CustomerSetting {
    /// Settings row id.
    pub id: i64,
    /// Owning customer id.
    #[serde(rename = "customerID")]
    pub customer_id: i64,
    /// Flat reference toggle.
    #[serde(rename = "useReference")]
    pub use_reference: bool,
    /// Placement toggle.
    #[serde(rename = "usePlacement")]
    pub use_placement: bool,
    /// Batch toggle.
    #[serde(rename = "useBatch")]
    pub use_batch: bool,
}

/// Per-movement reference toggles introduced in v2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseReference {
    /// Inbound stock.
    pub tilgang: bool,
    /// Outbound stock.
    pub afgang: bool,
    /// Stock regulation.
    pub regulering: bool,
    /// Stock moves.
    pub flyt: bool,
}

/// Customer settings as returned by the v2 endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V2CustomerSetting {
    /// Settings row id.
    pub id: i64,
    /// Owning customer id.
    #[serde(rename = "customerID")]
    pub customer_id: i64,
    /// Nested reference toggles.
    #[serde(rename = "useReference")]
    pub use_reference: UseReference,
    /// Placement toggle.
    #[serde(rename = "usePlacement")]
    pub use_placement: bool,
    /// Batch toggle (plan and data dependent).
    #[serde(rename = "useBatch")]
    pub use_batch: bool,
    /// App auth timeout in minutes.
    #[serde(rename = "authTimeoutMin", default, skip_serializing_if = "Option::is_none")]
    pub auth_timeout_min: Option<u32>,
}

// ============================================================================
// SECTION: Products
// ============================================================================

/// Product entry; only the id is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product id.
    pub id: i64,
}

// ============================================================================
// SECTION: Sign-in
// ============================================================================

/// User portion of the sign-in payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SignInUser {
    /// User id.
    pub id: i64,
}

/// Customer portion of the sign-in payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignInCustomer {
    /// Raw settings; shape depends on the customer's settings version.
    #[serde(default)]
    pub settings: Value,
}

/// Full sign-in payload.
#[derive(Clone, PartialEq, Deserialize)]
pub struct SignInData {
    /// Bearer token.
    pub jwt: String,
    /// Signed-in user.
    pub user: SignInUser,
    /// Customer of the user.
    pub customer: SignInCustomer,
}

impl std::fmt::Debug for SignInData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInData")
            .field("jwt", &"<redacted>")
            .field("user", &self.user)
            .field("customer", &self.customer)
            .finish()
    }
}

// ============================================================================
// SECTION: Cron Mails
// ============================================================================

/// Mail job descriptor from the cron listing.
///
/// Flags stay `Option<bool>` so a replayed mail carries `null` exactly as
/// listed; use [`CronMail::flag`] for the `null`-as-`false` reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronMail {
    /// Mail setting id.
    pub id: i64,
    /// Explicit recipient, when not tied to a user.
    pub email: Option<String>,
    /// Recipient user id.
    #[serde(rename = "userID")]
    pub user_id: Option<i64>,
    /// Recipient user email.
    #[serde(rename = "userEmail")]
    pub user_email: Option<String>,
    /// Customer id.
    #[serde(rename = "customerID")]
    pub customer_id: i64,
    /// Location id.
    #[serde(rename = "locationID")]
    pub location_id: String,
    /// Location display name.
    #[serde(rename = "locationName")]
    pub location_name: String,
    /// Creation timestamp as sent by the API.
    pub inserted: String,
    /// Update timestamp as sent by the API.
    pub updated: String,
    /// Monthly stock value mail flag.
    #[serde(rename = "sendStockMail", default)]
    pub send_stock_mail: Option<bool>,
    /// Reorder mail flag.
    #[serde(rename = "sendReorderMail", default)]
    pub send_reorder_mail: Option<bool>,
    /// Daily movements mail flag.
    #[serde(rename = "sendMovementsMail", default)]
    pub send_movements_mail: Option<bool>,
}

impl CronMail {
    /// Returns the flag for `mail_type`, with `null` read as `false`.
    #[must_use]
    pub const fn flag(&self, mail_type: MailType) -> bool {
        let flag = match mail_type {
            MailType::Stock => self.send_stock_mail,
            MailType::Movements => self.send_movements_mail,
        };
        matches!(flag, Some(true))
    }
}

/// Cron listing body (not wrapped in an envelope).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronMailList {
    /// Mail jobs.
    #[serde(default)]
    pub mails: Vec<CronMail>,
}

/// Mail-type filter accepted by the cron listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MailType {
    /// `sendStockMail`.
    Stock,
    /// `sendMovementsMail`.
    Movements,
}

impl MailType {
    /// Returns the query value for `mailtype`.
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Stock => "sendStockMail",
            Self::Movements => "sendMovementsMail",
        }
    }

    /// Returns whether `mail` carries this type's flag.
    #[must_use]
    pub const fn is_flagged(self, mail: &CronMail) -> bool {
        mail.flag(self)
    }

    /// Returns the cron listing path filtered by this type.
    #[must_use]
    pub fn listing_path(self) -> String {
        format!("{V1_CRON_MAILS_PATH}?mailtype={}", self.as_query())
    }
}
