//! Doctor profile snapshot as returned by the portal backend.
//!
//! The backend omits, nulls, or mistypes fields freely while a doctor is
//! part-way through registration. Every field here is optional and
//! deserialized leniently: a value of the wrong JSON type reads as absent
//! rather than failing the whole profile, so a bad field only ever makes a
//! step look incomplete.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Role claimed by the logged-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Doctor,
    Other(String),
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "doctor" => Self::Doctor,
            _ => Self::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Doctor => "doctor".to_string(),
            Role::Other(s) => s,
        }
    }
}

/// Account review status set by portal administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountStatus {
    Approved,
    Pending,
    Inactive,
    Other(String),
}

impl From<String> for AccountStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "approved" => Self::Approved,
            "pending" => Self::Pending,
            "inActive" => Self::Inactive,
            _ => Self::Other(s),
        }
    }
}

impl From<AccountStatus> for String {
    fn from(status: AccountStatus) -> Self {
        match status {
            AccountStatus::Approved => "approved".to_string(),
            AccountStatus::Pending => "pending".to_string(),
            AccountStatus::Inactive => "inActive".to_string(),
            AccountStatus::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specialization {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
}

/// Read-only view of a doctor's profile at decision time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    #[serde(default, deserialize_with = "lenient_role", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "lenient_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    /// Tri-state: the backend may omit it for accounts never reviewed.
    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub is_first_login: Option<bool>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub medical_registration_number: Option<String>,

    #[serde(default, deserialize_with = "lenient_object", skip_serializing_if = "Option::is_none")]
    pub specialization: Option<Specialization>,
    /// Clinic addresses. Only emptiness is significant.
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Value>>,
    /// Consultation mode fee entries. Only emptiness is significant.
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub consultation_mode_fee: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient_object", skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<BankDetails>,
    #[serde(default, deserialize_with = "lenient_present", skip_serializing_if = "Option::is_none")]
    pub kyc_details: Option<Value>,
}

impl ProfileSnapshot {
    /// Interpret a profile response body.
    ///
    /// Accepts a bare profile object or one wrapped in `{"data": {...}}`.
    /// Anything uninterpretable yields an empty snapshot.
    pub fn from_response(body: &Value) -> Self {
        let profile = match body.get("data") {
            Some(inner @ Value::Object(_)) => inner,
            _ => body,
        };

        if !profile.is_object() {
            warn!(kind = json_kind(profile), "Profile payload is not an object, treating as empty");
            return Self::default();
        }

        serde_json::from_value(profile.clone()).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to interpret profile payload, treating as empty");
            Self::default()
        })
    }

    pub fn is_doctor(&self) -> bool {
        matches!(self.role, Some(Role::Doctor))
    }

    pub fn has_status(&self, status: &AccountStatus) -> bool {
        self.status.as_ref() == Some(status)
    }

    /// Name, email, and registration number are all filled in.
    pub fn has_personal_info(&self) -> bool {
        [
            &self.firstname,
            &self.lastname,
            &self.email,
            &self.medical_registration_number,
        ]
        .into_iter()
        .all(|field| is_filled(field.as_deref()))
    }

    pub fn has_specialization(&self) -> bool {
        self.specialization
            .as_ref()
            .is_some_and(|s| is_filled(s.name.as_deref()))
    }

    pub fn has_practice(&self) -> bool {
        self.addresses.as_ref().is_some_and(|a| !a.is_empty())
    }

    pub fn has_consultation_fees(&self) -> bool {
        self.consultation_mode_fee
            .as_ref()
            .is_some_and(|f| !f.is_empty())
    }

    pub fn has_bank_details(&self) -> bool {
        self.bank_details
            .as_ref()
            .is_some_and(|b| is_filled(b.bank_name.as_deref()))
    }

    pub fn has_kyc_details(&self) -> bool {
        self.kyc_details.is_some()
    }
}

/// A text field counts as filled when present and non-empty.
pub(crate) fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Lenient field deserializers ─────────────────────────────────────

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.map(Role::from))
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<AccountStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.map(AccountStatus::from))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => Some(b),
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    })
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(obj @ Value::Object(_)) => serde_json::from_value(obj).ok(),
        _ => None,
    })
}

/// Presence check with JSON-ish falsiness: null, false, 0 and "" are absent.
fn lenient_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(other) => Some(other),
    })
}
