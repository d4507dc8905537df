//! Coordinate and zoom transforms.
//!
//! All stored geometry is in image space. Display space adds the axis
//! margins and is scaled by the zoom; these helpers convert between the two.

pub mod axis;
pub mod viewport;
pub mod zoom;

pub use axis::{AxisLabel, axis_step, system_height, system_width, x_axis_labels, y_axis_labels};
pub use viewport::{ContainerSize, ScrollTracker, ViewportRect};
pub use zoom::ZoomState;
