// crates/factory-client/src/components/mod.rs

pub mod unit_list;
pub mod unit_editor;
pub mod status_bar;
pub mod help;
