//! Capture extraction module
//!
//! Pulls JSON messages out of noisy capture logs.
//!
//! # Overview
//!
//! Captures are browser console dumps or saved websocket frames. Messages are
//! interleaved with unrelated log output (`[loader] load success`,
//! `D_0e_jtX.js:12:238`), so extraction scans for balanced `{ ... }`
//! fragments and parses each one independently.

mod files;
mod scanner;
mod types;

pub use files::{capture_files, load_capture_dir, CAPTURE_EXTENSIONS};
pub use scanner::CaptureExtractor;
pub use types::Extraction;
