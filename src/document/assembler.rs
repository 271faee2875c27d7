use crate::error::AssemblyError;
use crate::render::Page;
use serde::{Deserialize, Serialize};

/// An ordered, numbered sequence of pages. Immutable once built.
#[derive(Clone, Deserialize, Serialize, PartialEq, Debug)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether there are no pages. False for any document `finish` returned.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page by its 1-based number.
    pub fn page(&self, number: usize) -> Option<&Page> {
        number.checked_sub(1).and_then(|i| self.pages.get(i))
    }
}

/// Append-only page accumulator.
///
/// Pages keep the order they were pushed in. Nothing is validated until
/// [`finish`](Self::finish), which checks every page in a single pass.
#[derive(Default, Debug)]
pub struct DocumentBuilder {
    pages: Vec<Page>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, page: Page) -> &mut Self {
        self.pages.push(page);
        self
    }

    pub fn extend(&mut self, pages: impl IntoIterator<Item = Page>) -> &mut Self {
        self.pages.extend(pages);
        self
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Validates and numbers the pages.
    ///
    /// # Errors
    ///
    /// [`AssemblyError::Empty`] when no page was pushed,
    /// [`AssemblyError::BlankPage`] for the first page with no title, image
    /// or table. No document is produced in either case.
    pub fn finish(self) -> Result<Document, AssemblyError> {
        if self.pages.is_empty() {
            return Err(AssemblyError::Empty);
        }
        if let Some(index) = self.pages.iter().position(Page::is_blank) {
            return Err(AssemblyError::BlankPage { index });
        }

        let mut pages = self.pages;
        for (i, page) in pages.iter_mut().enumerate() {
            page.number = Some(i + 1);
        }
        tracing::debug!("Assembled document with {} pages", pages.len());
        Ok(Document { pages })
    }
}

/// Concatenates `pages` in the given order into a document.
pub fn assemble(pages: impl IntoIterator<Item = Page>) -> Result<Document, AssemblyError> {
    let mut builder = DocumentBuilder::new();
    builder.extend(pages);
    builder.finish()
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]
    use super::*;
    use crate::dataset::{Table, Value};
    use crate::render::{PageRenderer, PageSource, SvgChartBackend};

    fn table_page(title: &str) -> Page {
        let mut table = Table::new(vec!["a".to_owned()]);
        table.push_row(vec![Some(Value::Number(1.0))]);
        PageRenderer::new(&SvgChartBackend)
            .render(PageSource::Table(&table), title, 10)
            .unwrap()
    }

    #[test]
    fn test_assemble_keeps_order_and_numbers() {
        let doc = assemble(["Preview", "Summary", "View"].map(table_page)).unwrap();
        let titles: Vec<&str> = doc.pages().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Preview", "Summary", "View"]);
        let numbers: Vec<Option<usize>> = doc.pages().iter().map(|p| p.number).collect();
        assert_eq!(numbers, [Some(1), Some(2), Some(3)]);
        assert_eq!(doc.page(2).unwrap().title, "Summary");
        assert!(doc.page(0).is_none());
    }

    #[test]
    fn test_assemble_empty_fails() {
        assert_eq!(assemble(Vec::new()).unwrap_err(), AssemblyError::Empty);
    }

    #[test]
    fn test_blank_page_fails_whole_document() {
        let mut blank = table_page("");
        blank.table = None;
        let err = assemble([table_page("ok"), blank]).unwrap_err();
        assert_eq!(err, AssemblyError::BlankPage { index: 1 });
    }

    #[test]
    fn test_builder_is_append_only() {
        let mut builder = DocumentBuilder::new();
        builder.push(table_page("one")).extend([table_page("two")]);
        assert_eq!(builder.len(), 2);
        let doc = builder.finish().unwrap();
        assert_eq!(doc.len(), 2);
        assert!(!doc.is_empty());
    }
}
