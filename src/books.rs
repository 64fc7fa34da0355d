//! The fixed set of books whose covers are generated.
//!
//! [`BookCatalog::builtin`] is constructed once by the caller and passed into
//! the orchestrator explicitly; nothing in the library reads it as ambient
//! state.

use crate::error::CoverError;
use std::path::{Path, PathBuf};

/// One book: where its PDF lives and what its cover file is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSpec {
    /// Stable identifier, also the cache file stem.
    pub slug: String,
    /// Display title used in log and error lines.
    pub title: String,
    /// HTTP(S) URL of the source PDF.
    pub source_url: String,
    /// File name of the final PNG inside the output directory.
    pub output_filename: String,
}

impl BookSpec {
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        source_url: impl Into<String>,
        output_filename: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            source_url: source_url.into(),
            output_filename: output_filename.into(),
        }
    }

    /// `{cache_dir}/{slug}.pdf`
    pub fn pdf_cache_path(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(format!("{}.pdf", self.slug))
    }

    /// `{cache_dir}/{slug}.page1.png`
    pub fn render_cache_path(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(format!("{}.page1.png", self.slug))
    }

    /// `{out_dir}/{output_filename}`
    pub fn output_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(&self.output_filename)
    }
}

/// Ordered, immutable collection of [`BookSpec`]s.
#[derive(Debug, Clone)]
pub struct BookCatalog {
    books: Vec<BookSpec>,
}

impl BookCatalog {
    /// The three Tactus books.
    pub fn builtin() -> Self {
        Self::new(vec![
            BookSpec::new(
                "learning-tactus",
                "Learning Tactus",
                "https://anthusai.github.io/Learning-Tactus/pdf/Learning-Tactus.pdf",
                "learning-tactus.png",
            ),
            BookSpec::new(
                "programming-tactus",
                "Programming Tactus",
                "https://anthusai.github.io/Programming-Tactus/pdf/Programming-Tactus.pdf",
                "programming-tactus.png",
            ),
            BookSpec::new(
                "tactus-in-a-nutshell",
                "Tactus in a Nutshell",
                "https://anthusai.github.io/Tactus-in-a-Nutshell/pdf/Tactus-in-a-Nutshell.pdf",
                "tactus-in-a-nutshell.png",
            ),
        ])
    }

    pub fn new(books: Vec<BookSpec>) -> Self {
        Self { books }
    }

    pub fn books(&self) -> &[BookSpec] {
        &self.books
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.books.iter().map(|b| b.slug.as_str())
    }

    pub fn get(&self, slug: &str) -> Option<&BookSpec> {
        self.books.iter().find(|b| b.slug == slug)
    }

    /// Resolve a list of slugs into books.
    ///
    /// An empty selection means every book, in catalog order. Repeated slugs
    /// collapse to their first occurrence.
    pub fn select<S: AsRef<str>>(&self, slugs: &[S]) -> Result<Vec<&BookSpec>, CoverError> {
        if slugs.is_empty() {
            return Ok(self.books.iter().collect());
        }

        let mut selected: Vec<&BookSpec> = Vec::with_capacity(slugs.len());
        for slug in slugs {
            let slug = slug.as_ref();
            let book = self.get(slug).ok_or_else(|| CoverError::UnknownBook {
                slug: slug.to_string(),
                known: self.slugs().map(String::from).collect(),
            })?;
            if !selected.iter().any(|b| b.slug == book.slug) {
                selected.push(book);
            }
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_three_books() {
        let catalog = BookCatalog::builtin();
        let slugs: Vec<&str> = catalog.slugs().collect();
        assert_eq!(
            slugs,
            vec!["learning-tactus", "programming-tactus", "tactus-in-a-nutshell"]
        );
        for book in catalog.books() {
            assert!(book.source_url.starts_with("https://"));
            assert_eq!(book.output_filename, format!("{}.png", book.slug));
        }
    }

    #[test]
    fn empty_selection_is_everything() {
        let catalog = BookCatalog::builtin();
        let none: [&str; 0] = [];
        assert_eq!(catalog.select(&none).unwrap().len(), 3);
    }

    #[test]
    fn selection_keeps_order_and_dedups() {
        let catalog = BookCatalog::builtin();
        let picked = catalog
            .select(&["tactus-in-a-nutshell", "learning-tactus", "tactus-in-a-nutshell"])
            .unwrap();
        let slugs: Vec<&str> = picked.iter().map(|b| b.slug.as_str()).collect();
        assert_eq!(slugs, vec!["tactus-in-a-nutshell", "learning-tactus"]);
    }

    #[test]
    fn unknown_slug_is_rejected() {
        let catalog = BookCatalog::builtin();
        let err = catalog.select(&["missing-book"]).unwrap_err();
        assert!(matches!(err, CoverError::UnknownBook { ref slug, .. } if slug == "missing-book"));
    }

    #[test]
    fn cache_and_output_paths_follow_the_slug() {
        let book = BookCatalog::builtin().get("learning-tactus").unwrap().clone();
        let cache = Path::new(".cache/book-covers");
        assert_eq!(
            book.pdf_cache_path(cache),
            Path::new(".cache/book-covers/learning-tactus.pdf")
        );
        assert_eq!(
            book.render_cache_path(cache),
            Path::new(".cache/book-covers/learning-tactus.page1.png")
        );
        assert_eq!(
            book.output_path(Path::new("out")),
            Path::new("out/learning-tactus.png")
        );
    }
}
