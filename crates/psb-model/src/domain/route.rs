use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Store operation exercised by a QPS run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteKind {
    Get,
    Set,
    Exists,
    Evict,
    Endpoint,
}

impl RouteKind {
    pub const ALL: [RouteKind; 5] = [
        RouteKind::Get,
        RouteKind::Set,
        RouteKind::Exists,
        RouteKind::Evict,
        RouteKind::Endpoint,
    ];

    /// Route name as used on the command line and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Get => "GET",
            RouteKind::Set => "SET",
            RouteKind::Exists => "EXISTS",
            RouteKind::Evict => "EVICT",
            RouteKind::Endpoint => "ENDPOINT",
        }
    }

    /// Whether the payload size applies to this route.
    pub fn uses_payload(&self) -> bool {
        matches!(self, RouteKind::Get | RouteKind::Set)
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_uppercase();
        RouteKind::ALL
            .into_iter()
            .find(|r| r.as_str() == norm)
            .ok_or_else(|| ModelError::InvalidRoute(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("get".parse::<RouteKind>().unwrap(), RouteKind::Get);
        assert_eq!(" Evict ".parse::<RouteKind>().unwrap(), RouteKind::Evict);
        assert!("DELETE".parse::<RouteKind>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        for r in RouteKind::ALL {
            assert_eq!(r.to_string().parse::<RouteKind>().unwrap(), r);
        }
    }

    #[test]
    fn payload_routes() {
        assert!(RouteKind::Get.uses_payload());
        assert!(RouteKind::Set.uses_payload());
        assert!(!RouteKind::Exists.uses_payload());
        assert!(!RouteKind::Endpoint.uses_payload());
    }

    #[test]
    fn serde_uppercase() {
        let json = serde_json::to_string(&RouteKind::Exists).unwrap();
        assert_eq!(json, r#""EXISTS""#);
    }
}
