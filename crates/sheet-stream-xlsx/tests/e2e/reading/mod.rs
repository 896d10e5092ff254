//! Reading tests - verify that rows decode the way a spreadsheet displays them.

mod data_types;
mod sheet_selection;
