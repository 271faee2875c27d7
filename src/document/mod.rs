//! Document assembly and serialisation.

pub mod assembler;
pub mod writer;

pub use assembler::{Document, DocumentBuilder, assemble};
pub use writer::{render_markdown, write_document};
