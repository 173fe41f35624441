//! Line-finding stages
//!
//! The analysis runs leaves first:
//!
//! - **reversal**: sliding-window detection of topping and bottoming points
//! - **cluster**: weighting of points (horizontal) and point pairs (diagonal)
//!   by how many reversal points agree with them
//! - **fit**: representative level of a cluster, log-space line through two points
//! - **select**: ranking, duplicate rejection and the final bounded line set

pub mod helpers;

pub mod cluster;
pub mod fit;
pub mod reversal;
pub mod select;

pub use cluster::*;
pub use fit::*;
pub use helpers::DayAxis;
pub use reversal::*;
pub use select::*;
