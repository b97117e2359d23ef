#![forbid(unsafe_code)]

mod anchors;
mod entries;
mod graph;
mod items;
mod notes;
mod peripheral;
mod readings;
mod tags;

pub use anchors::*;
pub use entries::*;
pub use graph::*;
pub use items::*;
pub use notes::*;
pub use peripheral::*;
pub use readings::*;
pub use tags::*;
