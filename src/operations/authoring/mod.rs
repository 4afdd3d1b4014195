//! Manual editing of surfaces and splines.

mod add_point;
mod add_spline;
mod apply_defaults;
mod destroy;
mod remove_point;
mod rename_points;

pub use add_point::AddPoint;
pub use add_spline::AddSpline;
pub use apply_defaults::ApplySurfaceDefaults;
pub use destroy::{DestroySpline, DestroySplines};
pub use remove_point::RemovePoint;
pub use rename_points::RenamePoints;
