//! Assembly of unordered boundary elements into connected paths.

pub use self::connector::{Connectable, ConnectedPath, PathConnector};
pub use self::polyline::{maximize_interior_angle, minimize_interior_angle};
pub use self::segments::connect_segments;

mod connector;
mod polyline;
mod segments;
