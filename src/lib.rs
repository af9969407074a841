//! Interactive front end for [`grid_slicer`]: asks for an image, a grid and an output directory,
//! then writes one PNG per tile.

pub mod prompt;
pub mod screen;
pub mod session;
pub mod style;

pub use session::{default_output_dir, Session, SliceRequest, DEFAULT_OUTPUT_DIR_NAME};
