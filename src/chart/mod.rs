//! Chart model: scales, palettes, layout and the declarative scene.
//!
//! Everything in here is pure. Drawing happens in the hosts (`tui`, and the
//! SVG writer in `svg`), which consume a `Scene`.

pub mod layout;
pub mod palette;
pub mod scale;
pub mod scene;
pub mod svg;
pub mod ticks;
pub mod tooltip;

pub use layout::canvas_dimensions;
pub use palette::{Palette, Rgb};
pub use scale::{LinearScale, TimeScale};
pub use scene::{BarMark, Scene, build_scene};
pub use svg::render_svg;
pub use tooltip::{Tooltip, TooltipContent, TooltipGeometry, group_thousands, place_tooltip};
