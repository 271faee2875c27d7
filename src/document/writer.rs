//! Serialises a [`Document`] to a directory.
//!
//! The output is `report.md` plus one image file per chart under `images/`.
//! Everything is written into a sibling staging directory first and renamed
//! into place at the end, so the target either appears complete or not at
//! all.

use super::Document;
use crate::error::{DeckError, Result};
use crate::render::{GridRow, Page, PageTable, RowKind};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const REPORT_FILE: &str = "report.md";
pub const IMAGE_DIR: &str = "images";
const PAGE_BREAK: &str = "<div style=\"page-break-after: always;\"></div>";

/// Relative path of the image on page `number`.
pub fn image_path(page: &Page, number: usize) -> Option<String> {
    let image = page.image.as_ref()?;
    Some(format!(
        "{IMAGE_DIR}/page-{number:03}.{}",
        image.image.format.extension()
    ))
}

pub fn render_markdown(doc: &Document) -> String {
    let total = doc.len();
    let mut out = String::new();

    for (i, page) in doc.pages().iter().enumerate() {
        let number = page.number.unwrap_or(i + 1);
        if i > 0 {
            out.push_str(PAGE_BREAK);
            out.push_str("\n\n");
        }
        out.push_str(&format!("# {}\n\n", page.title));

        if let Some(path) = image_path(page, number) {
            out.push_str(&format!("![{}]({path})\n\n", page.title));
        }
        if let Some(table) = &page.table {
            out.push_str("```text\n");
            out.push_str(&grid_text(table));
            out.push_str("```\n\n");
        }
        out.push_str(&format!("_Page {number} of {total}_\n\n"));
    }
    out
}

/// Monospace grid. Header and data cells are padded to the same per-column
/// width; the truncation marker is printed on its own line below.
fn grid_text(table: &PageTable) -> String {
    let cells: Vec<&GridRow> = table
        .rows
        .iter()
        .filter(|r| r.kind != RowKind::TruncationMarker)
        .collect();

    let columns = cells.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            cells
                .iter()
                .filter_map(|r| r.cells.get(c))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in &cells {
        let line: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(c, w)| {
                let text = row.cells.get(c).map_or("", String::as_str);
                pad(text, *w)
            })
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');

        if row.kind == RowKind::Header {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }
    }

    for marker in table.rows.iter().filter(|r| r.kind == RowKind::TruncationMarker) {
        if let Some(text) = marker.cells.first() {
            out.push_str(text);
            out.push('\n');
        }
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut s = text.to_owned();
    s.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    s
}

/// Writes `doc` into `out_dir`, which must not exist yet.
///
/// Returns the path of the written `report.md`.
///
/// # Errors
///
/// Fails if `out_dir` already exists or any file cannot be written. On
/// failure nothing is left behind at `out_dir` or in the staging directory.
pub fn write_document(doc: &Document, out_dir: &Path) -> Result<PathBuf> {
    if out_dir.exists() {
        return Err(DeckError::Export(format!(
            "output directory {} already exists",
            out_dir.display()
        )));
    }
    let name = out_dir
        .file_name()
        .ok_or_else(|| DeckError::Export(format!("invalid output path {}", out_dir.display())))?;
    let parent = out_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let staging = parent.join(format!(
        ".{}.{}.tmp",
        name.to_string_lossy(),
        Uuid::new_v4()
    ));

    let result = write_files(doc, &staging).and_then(|()| {
        fs::rename(&staging, out_dir)?;
        Ok(())
    });

    match result {
        Ok(()) => {
            tracing::info!(
                "Wrote report with {} pages to {}",
                doc.len(),
                out_dir.display()
            );
            Ok(out_dir.join(REPORT_FILE))
        }
        Err(e) => {
            if let Err(cleanup) = fs::remove_dir_all(&staging)
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!(
                    "Failed to remove staging directory {}: {cleanup}",
                    staging.display()
                );
            }
            tracing::error!("Failed to write report to {}: {e}", out_dir.display());
            Err(e)
        }
    }
}

fn write_files(doc: &Document, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir.join(IMAGE_DIR))?;

    for (i, page) in doc.pages().iter().enumerate() {
        let number = page.number.unwrap_or(i + 1);
        if let (Some(image), Some(rel)) = (&page.image, image_path(page, number)) {
            fs::write(dir.join(rel), &image.image.bytes)?;
        }
    }

    fs::write(dir.join(REPORT_FILE), render_markdown(doc))?;
    Ok(())
}
