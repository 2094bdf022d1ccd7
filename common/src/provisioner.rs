//! The provisioner record and its cached view.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::claims::Claims;
use crate::codec;
use crate::error::AdminError;

/// The closed set of provisioner kinds the authority trusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProvisionerType {
    #[serde(rename = "JWK")]
    Jwk,
    #[serde(rename = "OIDC")]
    Oidc,
    #[serde(rename = "GCP")]
    Gcp,
    #[serde(rename = "AWS")]
    Aws,
    #[serde(rename = "AZURE")]
    Azure,
    #[serde(rename = "ACME")]
    Acme,
    #[serde(rename = "X5C")]
    X5c,
    #[serde(rename = "K8SSA")]
    K8sSa,
    #[serde(rename = "SSHPOP")]
    SshPop,
    #[serde(rename = "SCEP")]
    Scep,
    #[serde(rename = "NEBULA")]
    Nebula,
}

impl ProvisionerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvisionerType::Jwk => "JWK",
            ProvisionerType::Oidc => "OIDC",
            ProvisionerType::Gcp => "GCP",
            ProvisionerType::Aws => "AWS",
            ProvisionerType::Azure => "AZURE",
            ProvisionerType::Acme => "ACME",
            ProvisionerType::X5c => "X5C",
            ProvisionerType::K8sSa => "K8SSA",
            ProvisionerType::SshPop => "SSHPOP",
            ProvisionerType::Scep => "SCEP",
            ProvisionerType::Nebula => "NEBULA",
        }
    }
}

impl fmt::Display for ProvisionerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persistent provisioner record: the canonical stored form, and the
/// payload of the Create and Update operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Provisioner {
    /// Opaque stable identifier. Immutable after creation; assigned by the
    /// authority when the incoming record carries none.
    pub id: String,

    /// Identifier of the owning certificate authority. Immutable.
    pub authority_id: String,

    #[serde(rename = "type")]
    pub typ: ProvisionerType,

    /// Human label, unique within an authority at a given time.
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,

    /// Type-tagged variant payload; its tag must agree with `type`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ProvisionerDetails>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<Claims>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub x509_template: Option<Template>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_template: Option<Template>,
}

impl Default for Provisioner {
    fn default() -> Self {
        Self {
            id: String::new(),
            authority_id: String::new(),
            typ: ProvisionerType::Jwk,
            name: String::new(),
            created_at: None,
            deleted_at: None,
            details: None,
            claims: None,
            x509_template: None,
            ssh_template: None,
        }
    }
}

impl Provisioner {
    /// Checks the record's internal consistency: the details tag must agree
    /// with the record type, and claims must be well formed. Does not touch
    /// cross-record state (name uniqueness lives in the authority).
    pub fn validate(&self) -> Result<(), AdminError> {
        if let Some(details) = &self.details {
            if details.provisioner_type() != self.typ {
                return Err(AdminError::bad_request(format!(
                    "provisioner details {} do not match provisioner type {}",
                    details.provisioner_type(),
                    self.typ
                )));
            }
        }
        if let Some(claims) = &self.claims {
            claims.validate()?;
        }
        Ok(())
    }
}

/// The cached in-authority representation of a provisioner, used for routing
/// and issuance decisions and served by the List operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionerView {
    pub id: String,

    #[serde(rename = "type")]
    pub typ: ProvisionerType,

    pub name: String,
}

impl From<&Provisioner> for ProvisionerView {
    fn from(prov: &Provisioner) -> Self {
        Self {
            id: prov.id.clone(),
            typ: prov.typ,
            name: prov.name.clone(),
        }
    }
}

/// Compares record timestamps by instant. An absent timestamp and the zero
/// sentinel are the same thing on the wire, so both count as unset.
pub fn timestamps_match(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> bool {
    fn canonical(t: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        t.filter(|t| *t != DateTime::<Utc>::UNIX_EPOCH)
    }
    canonical(a) == canonical(b)
}

/// Certificate template attached to a provisioner; both members are raw
/// template bytes, base64 on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Template {
    #[serde(with = "codec::b64")]
    pub template: Vec<u8>,

    #[serde(with = "codec::b64")]
    pub data: Vec<u8>,
}

/// Per-kind configuration payload. Externally tagged: the JSON tag string
/// equals the wire name of the corresponding [`ProvisionerType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub enum ProvisionerDetails {
    #[serde(rename = "JWK")]
    Jwk(JwkDetails),
    #[serde(rename = "OIDC")]
    Oidc(OidcDetails),
    #[serde(rename = "GCP")]
    Gcp(GcpDetails),
    #[serde(rename = "AWS")]
    Aws(AwsDetails),
    #[serde(rename = "AZURE")]
    Azure(AzureDetails),
    #[serde(rename = "ACME")]
    Acme(AcmeDetails),
    #[serde(rename = "X5C")]
    X5c(X5cDetails),
    #[serde(rename = "K8SSA")]
    K8sSa(K8sSaDetails),
    #[serde(rename = "SSHPOP")]
    SshPop(SshPopDetails),
    #[serde(rename = "SCEP")]
    Scep(ScepDetails),
    #[serde(rename = "NEBULA")]
    Nebula(NebulaDetails),
}

impl ProvisionerDetails {
    /// The record type this payload belongs to.
    pub fn provisioner_type(&self) -> ProvisionerType {
        match self {
            ProvisionerDetails::Jwk(_) => ProvisionerType::Jwk,
            ProvisionerDetails::Oidc(_) => ProvisionerType::Oidc,
            ProvisionerDetails::Gcp(_) => ProvisionerType::Gcp,
            ProvisionerDetails::Aws(_) => ProvisionerType::Aws,
            ProvisionerDetails::Azure(_) => ProvisionerType::Azure,
            ProvisionerDetails::Acme(_) => ProvisionerType::Acme,
            ProvisionerDetails::X5c(_) => ProvisionerType::X5c,
            ProvisionerDetails::K8sSa(_) => ProvisionerType::K8sSa,
            ProvisionerDetails::SshPop(_) => ProvisionerType::SshPop,
            ProvisionerDetails::Scep(_) => ProvisionerType::Scep,
            ProvisionerDetails::Nebula(_) => ProvisionerType::Nebula,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct JwkDetails {
    #[serde(with = "codec::b64")]
    pub public_key: Vec<u8>,

    #[serde(with = "codec::b64")]
    pub encrypted_private_key: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OidcDetails {
    pub client_id: String,
    pub client_secret: String,
    pub configuration_endpoint: String,
    pub admins: Vec<String>,
    pub domains: Vec<String>,
    pub groups: Vec<String>,
    pub listen_address: String,
    pub tenant_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GcpDetails {
    pub service_accounts: Vec<String>,
    pub project_ids: Vec<String>,
    pub disable_custom_sans: bool,
    pub disable_trust_on_first_use: bool,
    pub instance_age: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsDetails {
    pub accounts: Vec<String>,
    pub disable_custom_sans: bool,
    pub disable_trust_on_first_use: bool,
    pub instance_age: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureDetails {
    pub tenant_id: String,
    pub resource_groups: Vec<String>,
    pub audience: String,
    pub disable_custom_sans: bool,
    pub disable_trust_on_first_use: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AcmeDetails {
    pub force_cn: bool,
    pub require_eab: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct X5cDetails {
    /// Trusted root certificates, DER bytes.
    #[serde(with = "codec::b64_list")]
    pub roots: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct K8sSaDetails {
    #[serde(with = "codec::b64_list")]
    pub public_keys: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SshPopDetails {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ScepDetails {
    pub force_cn: bool,
    pub challenge: String,
    pub capabilities: Vec<String>,
    pub minimum_public_key_length: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NebulaDetails {
    #[serde(with = "codec::b64_list")]
    pub roots: Vec<Vec<u8>>,
}
