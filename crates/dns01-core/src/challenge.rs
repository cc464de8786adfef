//! Challenge requests handed to the solver by the webhook host

use serde::{Deserialize, Serialize};

/// A single DNS-01 validation attempt
///
/// Supplied by the host for every `present` / `clean_up` call; the solver
/// never keeps it beyond that call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Fully-qualified name to validate, e.g. `_acme-challenge.example.com.`
    #[serde(rename = "resolvedFQDN")]
    pub fqdn: String,

    /// The zone owning `fqdn`, including its trailing dot
    pub resolved_zone: String,

    /// Token the TXT record must carry
    pub key: String,
}

impl ChallengeRequest {
    /// Create a new challenge request
    pub fn new(
        fqdn: impl Into<String>,
        resolved_zone: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            fqdn: fqdn.into(),
            resolved_zone: resolved_zone.into(),
            key: key.into(),
        }
    }

    /// Reject requests with missing fields
    pub fn validate(&self) -> crate::Result<()> {
        if self.fqdn.trim().is_empty() {
            return Err(crate::Error::invalid_input("challenge FQDN is empty"));
        }
        if self.resolved_zone.trim().trim_end_matches('.').is_empty() {
            return Err(crate::Error::invalid_input("challenge resolved zone is empty"));
        }
        if self.key.is_empty() {
            return Err(crate::Error::invalid_input("challenge key is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_validate_accepts_complete_request() {
        let req = ChallengeRequest::new("_acme-challenge.example.com.", "example.com.", "tok1");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let cases = [
            ChallengeRequest::new("", "example.com.", "tok1"),
            ChallengeRequest::new("_acme-challenge.example.com.", "", "tok1"),
            ChallengeRequest::new("_acme-challenge.example.com.", ".", "tok1"),
            ChallengeRequest::new("_acme-challenge.example.com.", "example.com.", ""),
        ];

        for req in cases {
            let err = req.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "request: {:?}", req);
        }
    }

    #[test]
    fn test_deserializes_host_payload() {
        let req: ChallengeRequest = serde_json::from_value(serde_json::json!({
            "resolvedFQDN": "_acme-challenge.example.com.",
            "resolvedZone": "example.com.",
            "key": "tok1",
        }))
        .unwrap();

        assert_eq!(req.fqdn, "_acme-challenge.example.com.");
        assert_eq!(req.resolved_zone, "example.com.");
        assert_eq!(req.key, "tok1");
    }
}
