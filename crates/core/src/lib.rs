#![forbid(unsafe_code)]

pub mod anchors;
pub mod entries;
pub mod fields;
pub mod ids;
pub mod items;
pub mod tags;

pub use anchors::*;
pub use entries::*;
pub use fields::*;
pub use ids::*;
pub use items::*;
pub use tags::*;

#[cfg(test)]
mod tests;
