#![forbid(unsafe_code)]

mod anchors_tx;
mod entry_columns;
mod order;
mod rows;
mod schema;
mod tags_tx;

pub(super) use anchors_tx::*;
pub(super) use entry_columns::*;
pub(super) use order::*;
pub(super) use rows::*;
pub(super) use schema::install_schema;
pub(super) use tags_tx::*;
