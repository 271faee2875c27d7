//! # datadeck - report assembly for tabular data
//!
//! datadeck takes a tabular dataset and turns it into a paginated report:
//! a set of named views (a derived table plus the chart drawn from it), each
//! laid out on a fixed-size page, concatenated into a document.
//!
//! ## Quick Start
//!
//! ```no_run
//! use datadeck::config::ReportSettings;
//! use datadeck::dataset::load_dataset;
//! use datadeck::document::write_document;
//! use datadeck::profiler::profile;
//! use datadeck::render::SvgChartBackend;
//! use datadeck::session::{ReportRequest, build_report};
//! use std::path::Path;
//!
//! # fn example() -> datadeck::error::Result<()> {
//! datadeck::logging::init()?;
//! let dataset = load_dataset(Path::new("sales.csv"))?;
//! let request = ReportRequest::suggested("Sales", &profile(&dataset));
//! let outcome = build_report(&dataset, &request, &ReportSettings::default(), &SvgChartBackend)?;
//!
//! for failure in &outcome.failures {
//!     tracing::warn!("{failure}");
//! }
//! write_document(&outcome.document, Path::new("sales-report"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`dataset`]: typed, nullable columns; CSV ingestion; kind inference
//! - [`profiler`]: per-column statistics and the summary table
//! - [`views`]: view specs and the derivation of each view kind
//! - [`render`]: chart backends and fixed-layout pages
//!   - [`render::page`]: column widths, row heights, truncation
//! - [`document`]: page assembly and the on-disk writer
//! - [`export`]: CSV, XLSX and SVG export of a single view
//! - [`session`]: named view collections and [`session::build_report`]
//! - [`config`], [`logging`], [`error`], [`utils`]
//!
//! ## Key Concepts
//!
//! ### One table per view
//!
//! A view's chart is always drawn from the view's own table. Exports write
//! that same table. What a reader sees in the chart, the table below it and
//! an exported spreadsheet cannot disagree.
//!
//! ### Failure isolation
//!
//! A view that cannot be derived ([`error::DerivationError`]) or a chart that
//! cannot be encoded ([`error::RenderError`]) is skipped and reported; the
//! rest of the report is still built. Only an empty or blank document fails
//! as a whole ([`error::AssemblyError`]).

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod dataset;
pub mod document;
pub mod error;
pub mod export;
pub mod logging;
pub mod profiler;
pub mod render;
pub mod session;
pub mod utils;
pub mod views;
