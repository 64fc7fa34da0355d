//! End-to-end tests for book-covers.
//!
//! These download the real book PDFs and run the real Ghostscript binary.
//! They are gated behind the `E2E_ENABLED` environment variable so they do
//! not run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use book_covers::{extract_covers, BookCatalog, CoverStatus, ExtractionConfig};
use image::GenericImageView;
use std::path::PathBuf;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless E2E_ENABLED is set and Ghostscript can be found.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        match gs_render::locate_ghostscript() {
            Ok(p) => p,
            Err(e) => {
                println!("SKIP — {e}");
                return;
            }
        }
    }};
}

/// Persistent PDF cache so repeated e2e runs don't re-download.
fn shared_cache_dir() -> PathBuf {
    let d = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("book-covers-cache");
    std::fs::create_dir_all(&d).ok();
    d
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn test_generate_single_cover() {
    let gs = e2e_skip_unless_ready!();
    println!("Using Ghostscript at {}", gs.display());

    let out = TempDir::new().unwrap();
    let catalog = BookCatalog::builtin();
    let books = catalog.select(&["learning-tactus"]).unwrap();
    let config = ExtractionConfig::builder()
        .out_dir(out.path())
        .cache_dir(shared_cache_dir())
        .dpi(150)
        .max_width(600)
        .build()
        .unwrap();

    let report = extract_covers(&books, &config).expect("Ghostscript is available");
    for line in report.failures() {
        println!("[error] {line}");
    }
    assert!(report.is_success());

    let cover = report.outputs().next().unwrap();
    assert_eq!(cover.status, CoverStatus::Generated);
    let img = image::open(&cover.path).unwrap();
    let (w, h) = img.dimensions();
    println!("{} → {}x{}", cover.path.display(), w, h);
    assert!(w <= 600);
    assert!(h > w, "a book cover is portrait, got {w}x{h}");
}

#[test]
fn test_generate_all_covers_twice() {
    e2e_skip_unless_ready!();

    let out = TempDir::new().unwrap();
    let catalog = BookCatalog::builtin();
    let books = catalog.select::<&str>(&[]).unwrap();
    let config = ExtractionConfig::builder()
        .out_dir(out.path())
        .cache_dir(shared_cache_dir())
        .build()
        .unwrap();

    let first = extract_covers(&books, &config).unwrap();
    assert_eq!(first.exit_code(), 0, "failures: {:?}", first.failures());
    assert_eq!(first.stats.generated, 3);
    for cover in first.outputs() {
        assert!(cover.width.unwrap() <= 900);
    }

    let second = extract_covers(&books, &config).unwrap();
    assert_eq!(second.stats.already_present, 3);
}
