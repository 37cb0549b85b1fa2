#![doc = "Engine adapters wrapping the external assembly and quality-check tools."]

mod abyss;
mod adapter;
mod masurca;
mod quality;
mod runner;
mod spades;
mod unicycler;
mod velvet;

pub use abyss::AbyssAdapter;
pub use adapter::{AdapterRegistry, AssemblyJob, EngineAdapter};
pub use masurca::{read_length_stats, MasurcaAdapter, ReadLengthStats, ASSEMBLE_SCRIPT, CONFIG_FILE};
pub use quality::{collect_contigs, QualityCheck, QuastCheck, QUAST_DIR};
pub use runner::{find_program, run_checked, SystemRunner, ToolInvocation, ToolOutput, ToolRunner};
pub use spades::SpadesAdapter;
pub use unicycler::UnicyclerAdapter;
pub use velvet::VelvetAdapter;
