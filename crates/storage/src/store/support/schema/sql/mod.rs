#![forbid(unsafe_code)]

mod core;
mod entries;
mod indexes;
mod notes;
mod readings;
mod synthesis;

pub(super) fn full_schema_sql() -> String {
    let mut sql = String::new();
    sql.push_str(core::SQL);
    sql.push_str(readings::SQL);
    sql.push_str(entries::SQL);
    sql.push_str(synthesis::SQL);
    sql.push_str(notes::SQL);
    sql.push_str(indexes::SQL);
    sql
}
