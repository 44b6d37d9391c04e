//! Pipeline components: walk → job queue → hash workers → result queue → collector.

pub mod collector;
pub mod context;
pub mod orchestrator;
pub mod walk;
pub mod workers;

pub use collector::{Collected, collect_results};
pub use context::{PipelineChannels, PipelineHandles, PipelineTuning, create_pipeline_channels};
pub use orchestrator::{run_pipeline, shutdown_pipeline_handles};
pub use walk::{WalkOutcome, run_walk_loop, spawn_walk_thread, walk_files};
pub use workers::spawn_hash_workers;
