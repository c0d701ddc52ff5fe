//! Interpreter table and language detection
//!
//! Each supported language is a plain [`LanguageDescriptor`] record. The
//! [`LanguageRegistry`] scans them in declared order, so earlier entries win
//! ties. Detection is structural only:
//!
//! 1. If the first line (trimmed) starts with `#!`, the first descriptor
//!    owning a matching shebang prefix is chosen.
//! 2. Otherwise the file extension is compared case-insensitively.
//!
//! There is no content sniffing beyond the shebang line.

use crate::error::{display_name, Error, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

const SHEBANG: &str = "#!";

/// How to recognize and run one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDescriptor {
    /// Display name (e.g. "Python")
    pub name: String,
    /// Extensions without the leading dot, lowercase
    pub extensions: Vec<String>,
    /// Shebang prefixes, checked in order
    pub shebangs: Vec<String>,
    /// Interpreter executable
    pub command: String,
    /// Arguments placed before the script path
    pub args: Vec<String>,
}

impl LanguageDescriptor {
    /// Create a descriptor with no default arguments
    pub fn new(
        name: impl Into<String>,
        extensions: &[&str],
        shebangs: &[&str],
        command: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| e.to_ascii_lowercase()).collect(),
            shebangs: shebangs.iter().map(|s| s.to_string()).collect(),
            command: command.into(),
            args: Vec::new(),
        }
    }

    /// Set the arguments passed before the script path
    pub fn with_args(mut self, args: &[&str]) -> Self {
        self.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    /// First matching shebang prefix, if any
    pub fn matches_shebang(&self, line: &str) -> Option<&str> {
        self.shebangs
            .iter()
            .map(String::as_str)
            .find(|prefix| line.starts_with(prefix))
    }

    /// Whether `ext` (no dot) is one of ours, ignoring ASCII case
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|known| known.eq_ignore_ascii_case(ext))
    }
}

/// Ordered, read-only set of descriptors
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<LanguageDescriptor>,
}

impl LanguageRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            languages: Vec::new(),
        }
    }

    /// The built-in interpreter table
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(LanguageDescriptor::new(
            "Python",
            &["py", "pyw"],
            &[
                "#!/usr/bin/env python3",
                "#!/usr/bin/python3",
                "#!/usr/bin/env python",
                "#!/usr/bin/python",
            ],
            "python3",
        ));
        registry.register(LanguageDescriptor::new(
            "JavaScript",
            &["js", "mjs", "cjs"],
            &["#!/usr/bin/env node", "#!/usr/bin/node"],
            "node",
        ));
        registry.register(LanguageDescriptor::new(
            "Ruby",
            &["rb"],
            &["#!/usr/bin/env ruby", "#!/usr/bin/ruby"],
            "ruby",
        ));
        registry.register(LanguageDescriptor::new(
            "Perl",
            &["pl"],
            &["#!/usr/bin/env perl", "#!/usr/bin/perl"],
            "perl",
        ));
        registry.register(LanguageDescriptor::new(
            "Bash",
            &["bash"],
            &["#!/usr/bin/env bash", "#!/bin/bash", "#!/usr/bin/bash"],
            "bash",
        ));
        registry.register(LanguageDescriptor::new(
            "Shell",
            &["sh"],
            &["#!/usr/bin/env sh", "#!/bin/sh"],
            "sh",
        ));
        registry
    }

    /// Append a descriptor at the lowest priority
    pub fn register(&mut self, language: LanguageDescriptor) {
        self.languages.push(language);
    }

    pub fn languages(&self) -> &[LanguageDescriptor] {
        &self.languages
    }

    /// Detect from a path and its first line.
    ///
    /// A shebang match beats an extension match.
    pub fn detect(&self, path: &Path, first_line: &str) -> Result<&LanguageDescriptor> {
        let line = first_line.trim();

        if line.starts_with(SHEBANG) {
            for language in &self.languages {
                if let Some(prefix) = language.matches_shebang(line) {
                    debug!(language = %language.name, prefix, "matched shebang");
                    return Ok(language);
                }
            }
            debug!(shebang = line, "no descriptor claims this shebang");
        }

        if let Some(ext) = extension_of(path) {
            if let Some(language) = self.languages.iter().find(|l| l.matches_extension(&ext)) {
                debug!(language = %language.name, extension = %ext, "matched extension");
                return Ok(language);
            }
        }

        Err(Error::NoInterpreterFound(display_name(path)))
    }

    /// Read the first line of `path` and detect its language
    pub fn detect_file(&self, path: &Path) -> Result<&LanguageDescriptor> {
        let first_line = read_first_line(path)?;
        self.detect(path, &first_line)
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Text after the last dot of the file name. A dotfile such as `.py` counts
/// as having extension `py`, unlike [`Path::extension`].
fn extension_of(path: &Path) -> Option<Cow<'_, str>> {
    if let Some(ext) = path.extension() {
        return Some(ext.to_string_lossy());
    }
    let name = path.file_name()?.to_str()?;
    name.strip_prefix('.')
        .filter(|rest| !rest.is_empty())
        .map(Cow::Borrowed)
}

/// First line of a file without its terminator; lossy for non-UTF-8 bytes
fn read_first_line(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| Error::from_io(e, path))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    reader
        .read_until(b'\n', &mut buf)
        .map_err(|e| Error::from_io(e, path))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
