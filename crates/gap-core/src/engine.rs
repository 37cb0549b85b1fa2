//! Assembly engine identifiers and per-run enable switches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, GapError};

/// External assembly engines known to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// ABySS paired de Bruijn graph assembler.
    Abyss,
    /// SPAdes.
    Spades,
    /// MaSuRCA super-read assembler.
    Masurca,
    /// Unicycler hybrid assembler.
    Unicycler,
    /// Velvet.
    Velvet,
}

impl Engine {
    /// Every engine, in dispatch order.
    pub const ALL: [Engine; 5] = [
        Engine::Spades,
        Engine::Masurca,
        Engine::Unicycler,
        Engine::Abyss,
        Engine::Velvet,
    ];

    /// Lowercase name used for configuration keys and output directories.
    pub fn name(self) -> &'static str {
        match self {
            Engine::Abyss => "abyss",
            Engine::Spades => "spades",
            Engine::Masurca => "masurca",
            Engine::Unicycler => "unicycler",
            Engine::Velvet => "velvet",
        }
    }

    /// Engines that cannot pick their own kmer and reject `auto`.
    pub fn needs_fixed_kmer(self) -> bool {
        matches!(self, Engine::Abyss | Engine::Velvet)
    }

    /// Human readable label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            Engine::Abyss => "ABySS",
            Engine::Spades => "SPAdes",
            Engine::Masurca => "MaSuRCA",
            Engine::Unicycler => "Unicycler",
            Engine::Velvet => "Velvet",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = GapError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Engine::ALL
            .into_iter()
            .find(|engine| engine.name() == value)
            .ok_or_else(|| {
                GapError::Config(
                    ErrorInfo::new("gap_core.unknown_engine", "unknown assembly engine")
                        .with_context("engine", value)
                        .with_hint("expected one of abyss, spades, masurca, unicycler, velvet"),
                )
            })
    }
}

/// Per-run switches controlling which engine adapters are invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineToggles {
    /// Run ABySS.
    #[serde(default)]
    pub abyss: bool,
    /// Run SPAdes.
    #[serde(default = "enabled")]
    pub spades: bool,
    /// Run MaSuRCA.
    #[serde(default = "enabled")]
    pub masurca: bool,
    /// Run Unicycler.
    #[serde(default)]
    pub unicycler: bool,
    /// Run Velvet.
    #[serde(default = "enabled")]
    pub velvet: bool,
}

fn enabled() -> bool {
    true
}

impl Default for EngineToggles {
    fn default() -> Self {
        Self {
            abyss: false,
            spades: true,
            masurca: true,
            unicycler: false,
            velvet: true,
        }
    }
}

impl EngineToggles {
    /// Toggles with every engine switched off.
    pub fn none() -> Self {
        Self {
            abyss: false,
            spades: false,
            masurca: false,
            unicycler: false,
            velvet: false,
        }
    }

    /// Returns whether the given engine is enabled.
    pub fn is_enabled(&self, engine: Engine) -> bool {
        match engine {
            Engine::Abyss => self.abyss,
            Engine::Spades => self.spades,
            Engine::Masurca => self.masurca,
            Engine::Unicycler => self.unicycler,
            Engine::Velvet => self.velvet,
        }
    }

    /// Switches a single engine on or off.
    pub fn set(&mut self, engine: Engine, on: bool) {
        match engine {
            Engine::Abyss => self.abyss = on,
            Engine::Spades => self.spades = on,
            Engine::Masurca => self.masurca = on,
            Engine::Unicycler => self.unicycler = on,
            Engine::Velvet => self.velvet = on,
        }
    }

    /// Builder style variant of [`EngineToggles::set`].
    pub fn with(mut self, engine: Engine, on: bool) -> Self {
        self.set(engine, on);
        self
    }

    /// Enabled engines in dispatch order.
    pub fn enabled(&self) -> Vec<Engine> {
        Engine::ALL
            .into_iter()
            .filter(|engine| self.is_enabled(*engine))
            .collect()
    }
}
