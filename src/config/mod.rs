pub mod model;
pub mod params;
pub mod presets;
pub mod share;
