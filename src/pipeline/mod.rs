//! Pipeline stages for cover extraction.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and the two external collaborators (network, Ghostscript)
//! sit behind traits the orchestrator can swap out.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ rasterize ──▶ encode::load ──▶ autocrop ──▶ resize ──▶ encode::save
//! (URL→PDF)  (PDF→PNG)     (PNG→image)      (trim)       (≤ width)  (PNG)
//! ```
//!
//! 1. [`fetch`]     — download the source PDF into the cache (blocking HTTP)
//! 2. [`rasterize`] — render page 1 through Ghostscript's `pngalpha` device
//! 3. [`encode`]    — decode the intermediate render
//! 4. [`autocrop`]  — background-subtraction trim with padding
//! 5. [`resize`]    — Lanczos3 downscale to the maximum width
//! 6. [`encode`]    — write the optimised PNG atomically

pub mod autocrop;
pub mod encode;
pub mod fetch;
pub mod rasterize;
pub mod resize;
