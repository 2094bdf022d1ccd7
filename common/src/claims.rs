//! Provisioner claims and their validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::AdminError;

/// Certificate lifetime policy attached to a provisioner. All members are
/// optional; absent members fall back to authority defaults at issuance time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x509: Option<X509Claims>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh: Option<SshClaims>,

    pub disable_renewal: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct X509Claims {
    pub enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub durations: Option<Durations>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SshClaims {
    pub enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub durations: Option<Durations>,
}

/// Duration window as duration strings, e.g. `"5m"` or `"24h"`. Empty
/// members are unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Durations {
    pub min: String,
    pub max: String,
    pub default: String,
}

impl Claims {
    /// Validates the claims without mutating them: every non-empty duration
    /// must parse, and within a window `min <= default <= max` must hold for
    /// the members that are present.
    pub fn validate(&self) -> Result<(), AdminError> {
        if let Some(x509) = &self.x509 {
            if let Some(durations) = &x509.durations {
                durations.validate("claims.x509.durations")?;
            }
        }
        if let Some(ssh) = &self.ssh {
            if let Some(durations) = &ssh.durations {
                durations.validate("claims.ssh.durations")?;
            }
        }
        Ok(())
    }
}

impl Durations {
    fn validate(&self, scope: &str) -> Result<(), AdminError> {
        let parse = |member: &str, value: &str| -> Result<Option<Duration>, AdminError> {
            if value.is_empty() {
                return Ok(None);
            }
            parse_duration(value)
                .map(Some)
                .map_err(|err| AdminError::bad_request(format!("{scope}.{member}: {err}")))
        };

        let min = parse("min", &self.min)?;
        let max = parse("max", &self.max)?;
        let default = parse("default", &self.default)?;

        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(AdminError::bad_request(format!(
                    "{scope}: min '{}' exceeds max '{}'",
                    self.min, self.max
                )));
            }
        }
        if let (Some(min), Some(default)) = (min, default) {
            if default < min {
                return Err(AdminError::bad_request(format!(
                    "{scope}: default '{}' is below min '{}'",
                    self.default, self.min
                )));
            }
        }
        if let (Some(max), Some(default)) = (max, default) {
            if default > max {
                return Err(AdminError::bad_request(format!(
                    "{scope}: default '{}' exceeds max '{}'",
                    self.default, self.max
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a valid duration")]
pub struct DurationError(String);

/// Parses a duration string: one or more `<integer><unit>` segments where
/// the unit is one of `ns`, `us`, `ms`, `s`, `m`, `h`, e.g. `"1h30m"`.
pub fn parse_duration(value: &str) -> Result<Duration, DurationError> {
    let err = || DurationError(value.to_string());

    if value.is_empty() {
        return Err(err());
    }

    let mut total = Duration::ZERO;
    let mut rest = value;
    while !rest.is_empty() {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return Err(err());
        }
        let amount: u64 = rest[..digits].parse().map_err(|_| err())?;
        rest = &rest[digits..];

        let (unit, len) = match rest.as_bytes() {
            [b'n', b's', ..] => (Duration::from_nanos(1), 2),
            [b'u', b's', ..] => (Duration::from_micros(1), 2),
            [b'm', b's', ..] => (Duration::from_millis(1), 2),
            [b'm', ..] => (Duration::from_secs(60), 1),
            [b'h', ..] => (Duration::from_secs(3600), 1),
            [b's', ..] => (Duration::from_secs(1), 1),
            _ => return Err(err()),
        };
        rest = &rest[len..];

        let amount = u32::try_from(amount).map_err(|_| err())?;
        total = total
            .checked_add(unit.checked_mul(amount).ok_or_else(err)?)
            .ok_or_else(err)?;
    }
    Ok(total)
}
