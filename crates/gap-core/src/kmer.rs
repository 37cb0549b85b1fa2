//! Kmer parameter resolution for the assembly engines.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::errors::{ErrorInfo, GapError};

/// Literal requesting the engine's own kmer selection.
pub const AUTO: &str = "auto";

/// Fixed kmer used by Velvet when the caller supplies none.
pub const VELVET_DEFAULT_KMER: &str = "91";

/// A kmer parameter: either `auto` or a positive integer kept verbatim as supplied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KmerValue(String);

impl KmerValue {
    /// Parses a caller supplied value, accepting `auto` or a positive integer.
    ///
    /// The value names an output directory, so anything besides the bare
    /// literal or plain digits (whitespace, signs) is rejected.
    pub fn parse(raw: &str) -> Result<Self, GapError> {
        if raw == AUTO {
            return Ok(Self(AUTO.to_string()));
        }
        let digits = !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit());
        match raw.parse::<u32>() {
            Ok(value) if digits && value > 0 => Ok(Self(raw.to_string())),
            _ => Err(GapError::Config(
                ErrorInfo::new("gap_core.kmer_value", "kmer must be `auto` or a positive integer")
                    .with_context("value", raw),
            )),
        }
    }

    /// The `auto` kmer.
    pub fn auto() -> Self {
        Self(AUTO.to_string())
    }

    /// Returns true when the engine should choose its own kmer.
    pub fn is_auto(&self) -> bool {
        self.0 == AUTO
    }

    /// Numeric kmer, `None` for `auto`.
    pub fn fixed(&self) -> Option<u32> {
        self.0.parse().ok()
    }

    /// Verbatim string form, also used as the output directory name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for KmerValue {
    type Error = GapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        KmerValue::parse(&value)
    }
}

impl From<KmerValue> for String {
    fn from(value: KmerValue) -> Self {
        value.0
    }
}

impl fmt::Display for KmerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved kmer value for every engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KmerConfig {
    values: BTreeMap<Engine, KmerValue>,
}

impl KmerConfig {
    /// Documented default kmer for an engine.
    pub fn default_for(engine: Engine) -> KmerValue {
        match engine {
            Engine::Velvet => KmerValue(VELVET_DEFAULT_KMER.to_string()),
            _ => KmerValue::auto(),
        }
    }

    /// Resolves caller supplied overrides keyed by engine name, filling in defaults.
    ///
    /// Unknown keys and malformed values are configuration errors.
    pub fn resolve(overrides: &BTreeMap<String, String>) -> Result<Self, GapError> {
        let mut values = BTreeMap::new();
        for (key, raw) in overrides {
            let engine: Engine = key.parse()?;
            let value = KmerValue::parse(raw).map_err(|err| match err {
                GapError::Config(info) => GapError::Config(info.with_context("engine", key.as_str())),
                other => other,
            })?;
            values.insert(engine, value);
        }
        for engine in Engine::ALL {
            values
                .entry(engine)
                .or_insert_with(|| Self::default_for(engine));
        }
        Ok(Self { values })
    }

    /// Kmer value assigned to an engine.
    pub fn get(&self, engine: Engine) -> &KmerValue {
        // resolve() populates every engine
        &self.values[&engine]
    }

    /// Iterates engine and kmer pairs in engine order.
    pub fn iter(&self) -> impl Iterator<Item = (Engine, &KmerValue)> {
        self.values.iter().map(|(engine, value)| (*engine, value))
    }
}

impl Default for KmerConfig {
    fn default() -> Self {
        let values = Engine::ALL
            .into_iter()
            .map(|engine| (engine, Self::default_for(engine)))
            .collect();
        Self { values }
    }
}
