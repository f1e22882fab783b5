// src/sheets/mod.rs — Spreadsheet mirror of poker sessions

pub mod layout;
pub mod mirror;

pub use mirror::SheetMirror;
