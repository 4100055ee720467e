pub mod stages;

pub use stages::{STAGES, Stage, StageInputs, active_stages, apply_pipeline, effective_progress};
