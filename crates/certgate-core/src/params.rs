//! Read-only view over request parameters
//!
//! Clients choose parameter names freely, so nothing here turns a key into
//! anything that outlives the request. Known fields are a closed enum with
//! static wire names; every other key is looked up by borrowed `&str`.

use std::collections::HashMap;
use std::fmt;

use crate::error::MissingParam;

/// Parameter fields the gateway and CA engines know by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Certificate subject, taken from the request path
    Cn,
    /// Caller's source address
    Ip,
    /// PEM-encoded certificate signing request
    Csr,
    /// Pre-shared secret
    Psk,
    /// Authorization token
    Token,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Cn, Field::Ip, Field::Csr, Field::Psk, Field::Token];

    /// Wire name of the field
    pub const fn key(&self) -> &'static str {
        match self {
            Field::Cn => "cn",
            Field::Ip => "ip",
            Field::Csr => "csr",
            Field::Psk => "psk",
            Field::Token => "token",
        }
    }

    /// Resolve a wire name to a known field. Unknown names stay unknown.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Anything that can name a parameter for the duration of one lookup
pub trait ParamKey {
    fn as_key(&self) -> &str;
}

impl ParamKey for Field {
    fn as_key(&self) -> &str {
        self.key()
    }
}

impl ParamKey for str {
    fn as_key(&self) -> &str {
        self
    }
}

impl ParamKey for String {
    fn as_key(&self) -> &str {
        self.as_str()
    }
}

/// Immutable, request-scoped parameter set handed to the CA
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    pub fn builder() -> ParamsBuilder {
        ParamsBuilder::default()
    }

    /// Presence check
    pub fn contains<K: ParamKey + ?Sized>(&self, key: &K) -> bool {
        self.values.contains_key(key.as_key())
    }

    /// Optional lookup
    pub fn get<K: ParamKey + ?Sized>(&self, key: &K) -> Option<&str> {
        self.values.get(key.as_key()).map(String::as_str)
    }

    /// Lookup falling back to `default` when the key is absent
    pub fn get_or<'a, K: ParamKey + ?Sized>(&'a self, key: &K, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Lookup that fails when the key is absent
    pub fn require<K: ParamKey + ?Sized>(&self, key: &K) -> Result<&str, MissingParam> {
        self.get(key).ok_or_else(|| MissingParam {
            key: key.as_key().to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all `(key, value)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Assembles a [`Params`] from several sources; later inserts win
#[derive(Debug, Default)]
pub struct ParamsBuilder {
    values: HashMap<String, String>,
}

impl ParamsBuilder {
    /// Merge caller-supplied pairs
    pub fn extend<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.values
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set a known field, overwriting any caller-supplied value
    pub fn insert(mut self, field: Field, value: impl Into<String>) -> Self {
        self.values.insert(field.key().to_string(), value.into());
        self
    }

    pub fn build(self) -> Params {
        Params {
            values: self.values,
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params::builder().extend(iter).build()
    }
}
