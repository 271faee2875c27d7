//! In-memory dataset model.
//!
//! A [`Dataset`] is an ordered list of named [`Column`]s, each with a declared
//! [`ColumnKind`] and nullable [`Value`]s. [`Table`] is the lighter row-oriented
//! shape used for everything derived from a dataset.

pub mod io;
pub mod table;
pub mod temporal;
pub mod types;

pub use io::{dataset_from_df, load_dataset, table_to_df};
pub use table::Table;
pub use types::{Column, ColumnKind, Dataset, Value, infer_kind, parse_number};
