//! Zone and record model as returned by the provider API
//!
//! Zones are fetched fresh for every operation and never cached. Only the
//! fields the solver uses are decoded; anything else the provider sends is
//! ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// TTL (seconds) for challenge records
pub const CHALLENGE_RECORD_TTL: u32 = 10;

/// Provider-assigned zone identifier
pub type ZoneId = i64;

/// Provider-assigned record identifier
pub type RecordId = i64;

/// Decode an explicit `null` as the type's default
///
/// The provider emits `null` for fields that do not apply to a record kind
/// (e.g. `Value` on pull-zone records).
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// DNS record kind, integer-coded on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Txt,
    Mx,
    Srv,
    Caa,
    Ptr,
    Ns,
    /// Any code this crate does not name
    Other(u8),
}

impl From<u8> for RecordType {
    fn from(code: u8) -> Self {
        match code {
            0 => RecordType::A,
            1 => RecordType::Aaaa,
            2 => RecordType::Cname,
            3 => RecordType::Txt,
            4 => RecordType::Mx,
            8 => RecordType::Srv,
            9 => RecordType::Caa,
            10 => RecordType::Ptr,
            12 => RecordType::Ns,
            other => RecordType::Other(other),
        }
    }
}

impl From<RecordType> for u8 {
    fn from(kind: RecordType) -> Self {
        match kind {
            RecordType::A => 0,
            RecordType::Aaaa => 1,
            RecordType::Cname => 2,
            RecordType::Txt => 3,
            RecordType::Mx => 4,
            RecordType::Srv => 8,
            RecordType::Caa => 9,
            RecordType::Ptr => 10,
            RecordType::Ns => 12,
            RecordType::Other(code) => code,
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
            RecordType::Aaaa => write!(f, "AAAA"),
            RecordType::Cname => write!(f, "CNAME"),
            RecordType::Txt => write!(f, "TXT"),
            RecordType::Mx => write!(f, "MX"),
            RecordType::Srv => write!(f, "SRV"),
            RecordType::Caa => write!(f, "CAA"),
            RecordType::Ptr => write!(f, "PTR"),
            RecordType::Ns => write!(f, "NS"),
            RecordType::Other(code) => write!(f, "TYPE{}", code),
        }
    }
}

/// A record inside a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    pub id: RecordId,
    #[serde(rename = "Type")]
    pub record_type: RecordType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ttl: u32,
    /// Hostname relative to the zone
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disabled: bool,
}

impl Record {
    /// Whether this record is the TXT record for `name` carrying `value`
    ///
    /// Identity is the (type, name, value) tuple; the ID plays no part.
    pub fn matches_txt(&self, name: &str, value: &str) -> bool {
        self.record_type == RecordType::Txt && self.name == name && self.value == value
    }
}

/// A zone with its full record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Zone {
    pub id: ZoneId,
    #[serde(rename = "Domain", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub records: Vec<Record>,
}

impl Zone {
    /// First TXT record named `name` whose value is `value`, in provider order
    pub fn find_txt_record(&self, name: &str, value: &str) -> Option<&Record> {
        self.records.iter().find(|r| {
            tracing::trace!(
                "Scanning record {}: {} {} {}",
                r.id,
                r.record_type,
                r.name,
                r.value
            );
            r.matches_txt(name, value)
        })
    }
}

/// One page of a zone search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneSearchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Zone>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_items: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_more_items: bool,
}

/// Body of a record creation request
///
/// Carries exactly the fields the provider needs; the ID is server-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewRecord {
    #[serde(rename = "Type")]
    pub record_type: RecordType,
    pub ttl: u32,
    pub value: String,
    pub name: String,
    pub disabled: bool,
}

impl NewRecord {
    /// An enabled challenge TXT record
    pub fn txt(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            record_type: RecordType::Txt,
            ttl: CHALLENGE_RECORD_TTL,
            value: value.into(),
            name: name.into(),
            disabled: false,
        }
    }
}
