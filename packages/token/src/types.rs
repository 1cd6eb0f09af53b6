//! Signed token type definitions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default header `typ` marker for tokens issued by this crate
pub const DEFAULT_TYP: &str = "ST";

/// Claims set: an open mapping from claim name to JSON value
pub type Payload = Map<String, Value>;

/// Token header
///
/// `alg` is kept as the raw header string so that tokens carrying an
/// unsupported or missing algorithm still decode; the verifier rejects them.
/// A `typ`, `kid` or `cty` that is not a string is kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Header {
    /// Signing algorithm name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Token type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Key ID hint for the verifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Content type, for nested tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cty: Option<String>,
    /// Any other header parameters
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Header {
    /// Header for `alg` with the default `typ`
    #[must_use]
    pub fn new(alg: crate::SignedAlgorithm) -> Self {
        Self {
            alg: Some(alg.as_str().to_string()),
            typ: Some(DEFAULT_TYP.to_string()),
            kid: None,
            cty: None,
            extra: Map::new(),
        }
    }

    /// Replace the token type
    #[must_use]
    pub fn with_typ(mut self, typ: impl Into<String>) -> Self {
        self.typ = Some(typ.into());
        self
    }

    /// Set the key ID
    #[must_use]
    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Set the content type
    #[must_use]
    pub fn with_content_type(mut self, cty: impl Into<String>) -> Self {
        self.cty = Some(cty.into());
        self
    }
}

impl TryFrom<Map<String, Value>> for Header {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let alg = match fields.remove("alg") {
            None | Some(Value::Null) => None,
            Some(Value::String(alg)) => Some(alg),
            Some(other) => return Err(format!("alg must be a string, got {other}")),
        };
        let mut string_field = |name: &str| match fields.remove(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(value)) => Some(value),
            Some(other) => {
                fields.insert(name.to_string(), other);
                None
            }
        };
        let typ = string_field("typ");
        let kid = string_field("kid");
        let cty = string_field("cty");

        Ok(Self {
            alg,
            typ,
            kid,
            cty,
            extra: fields,
        })
    }
}

/// Result of decoding a compact token without verifying it
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    /// Decoded header
    pub header: Header,
    /// Decoded claims
    pub payload: Payload,
    /// Signature segment, still base64url-encoded
    pub signature: String,
}

/// A single string or a list of strings
///
/// Models the `aud` claim and the issuer/audience expectations of the
/// verifier, which accept either form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// Single value
    One(String),
    /// List of values
    Many(Vec<String>),
}

impl OneOrMany {
    /// Iterate over the contained values
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        };
        values.iter().map(String::as_str)
    }

    /// True when `value` is one of the contained values
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.iter().any(|v| v == value)
    }

    /// True when the two sets share at least one value
    #[must_use]
    pub fn intersects(&self, other: &OneOrMany) -> bool {
        self.iter().any(|v| other.contains(v))
    }

    /// Number of contained values
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(values) => values.len(),
        }
    }

    /// True for an empty list
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for OneOrMany {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<&str> = self.iter().collect();
        write!(f, "[{}]", values.join(", "))
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(value: String) -> Self {
        OneOrMany::One(value)
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(values: Vec<String>) -> Self {
        OneOrMany::Many(values)
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl From<OneOrMany> for Value {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(v) => Value::String(v),
            OneOrMany::Many(vs) => Value::Array(vs.into_iter().map(Value::String).collect()),
        }
    }
}

/// Standard claims, for flattening into a caller's payload type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardClaims {
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<OneOrMany>,
    /// Expiration time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Not before
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Token ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}
