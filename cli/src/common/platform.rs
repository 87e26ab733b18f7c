//! # shvar Platform Detection (`common::platform`)
//!
//! File: cli/src/common/platform.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Reports which family of host shvar runs on. The answer picks the default
//! reference syntax (`%VAR%` is recognised on Windows) and the rules used by
//! the path-list helpers (separator and case sensitivity).
//!
//! `Platform` also derives `clap::ValueEnum`, so commands can accept
//! `--platform windows|unix` to override the detected value.
//!
use clap::ValueEnum;

/// Host platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }
}
