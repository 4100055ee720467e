pub mod exporter;

pub use exporter::{DEFAULT_STILL_PROGRESS, ExportStats, Exporter, VideoOpts, VideoPlan};
