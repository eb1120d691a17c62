// Placement module - turns a spec, a target canvas, and a measured content
// box into the final overlay rectangle, and holds the inverse math used
// after a drag.
mod anchor;
mod coords;
mod resolve;

pub use anchor::{derive_offsets_for_anchor, infer_dominant_anchor};
pub use coords::{pixel_offset, preview_scale, to_pixel_offsets, to_ratio_offsets};
pub use resolve::{ResolvedPlacement, offsets_in_mode, resolve};
