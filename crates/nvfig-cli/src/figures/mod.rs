//! Built-in figure configurations and their render entry points.

mod animation;
mod playback;
mod statics;

pub use animation::{sombrero_potential, sombrero_symmetry_breaking, SombreroAnimation};
pub use playback::{run_playback, PlaybackArgs};
pub use statics::{
    accessible_field, delta_function, filter_function, readout_levels, spatial_scales, t1_decay,
    total_averaging_time,
};
