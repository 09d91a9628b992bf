//! Presigned Jupyter access

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone, Utc};
use envreq_errors::NetworkError;
use serde::{Deserialize, Serialize};

use crate::api::JupyterUrlData;

/// A presigned, expiring link into a provisioned Jupyter session.
///
/// Expiry is advisory on the client: callers check [`JupyterAccess::is_expired_at`]
/// before handing the URL out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JupyterAccess {
    pub presigned_url: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_name: Option<String>,
}

impl JupyterAccess {
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Time left before expiry, `None` once expired
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        let left = self.expires_at - now;
        (left > TimeDelta::zero()).then_some(left)
    }

    /// Expiry rendered in the local time zone
    #[must_use]
    pub fn expiry_display(&self) -> String {
        self.expiry_display_in(&Local)
    }

    #[must_use]
    pub fn expiry_display_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.expires_at
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string()
    }
}

impl TryFrom<JupyterUrlData> for JupyterAccess {
    type Error = NetworkError;

    fn try_from(data: JupyterUrlData) -> Result<Self, Self::Error> {
        if data.presigned_url.trim().is_empty() {
            return Err(NetworkError::protocol("presigned_url is empty"));
        }
        let expires_at = parse_expiry(&data.expires_at).ok_or_else(|| {
            NetworkError::protocol(format!("unparseable expires_at: {}", data.expires_at))
        })?;
        Ok(Self {
            presigned_url: data.presigned_url,
            expires_at,
            request_id: data.request_id,
            env_name: data.env_name,
        })
    }
}

/// Parse an ISO-8601 timestamp; naive values are UTC, which is what the
/// service writes.
#[must_use]
pub fn parse_expiry(value: &str) -> Option<DateTime<Utc>> {
    parse_expiry_in(value, &Utc)
}

/// Parse an ISO-8601 timestamp, resolving naive values in `tz`.
///
/// An ambiguous wall time (DST fold) resolves to the earlier instant; one
/// that does not exist in `tz` yields `None`.
#[must_use]
pub fn parse_expiry_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}
