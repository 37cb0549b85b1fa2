#![doc = "Read-set discovery and read length manifests for the gap pipeline."]

/// Input directory scanning and pair classification.
pub mod discover;
/// Tab separated read length manifests.
pub mod manifest;
/// Sample naming helpers.
pub mod sample;

pub use discover::{
    classify, discover_read_sets, DiscoverOpts, NamingPolicy, ReadLayout, ReadSetDiscovery,
    ReadSetMap, READ_FILE_PATTERNS,
};
pub use manifest::{load_manifests, Manifest, Manifests, PRE_TRIM_MANIFEST_PATH};
pub use sample::{manifest_key, reverse_name_for, sample_prefix, Sample};
