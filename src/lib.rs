//! # backlang
//!
//! A reversible line-order file format, plus a runner that decodes a file and
//! hands it to the right interpreter in one step.
//!
//! ## Format
//!
//! Encoding splits a file into lines, keeps every line's own terminator
//! (`\n` or `\r\n`), and writes the lines in reverse order:
//!
//! ```text
//! 1            3
//! 2     =>     2
//! 3            1
//! ```
//!
//! A file whose last line has no newline gets one synthetic `\n` on that
//! line, and the encoded file starts with a marker record saying so:
//!
//! ```text
//! ##BCKL.NNL##
//! ```
//!
//! Decoding removes the marker, reverses again and drops the synthetic
//! newline, so `decode(encode(x)) == x` byte for byte. Encoded files use the
//! `.bck` suffix; encoding an encoded file is allowed and stacks suffixes.
//!
//! In the rare case where the original's last line is itself a sentinel
//! line, a `##BCKL.LIT##` guard record is written first so the decoder
//! treats it as content.
//!
//! ## Running
//!
//! [`LanguageRegistry`] holds one [`LanguageDescriptor`] per interpreter.
//! Detection checks the shebang first, then the extension, in registry
//! order. [`Dispatcher`] runs the interpreter with inherited stdio.
//!
//! ```no_run
//! use backlang::{naming, Decoder, Dispatcher, LanguageRegistry};
//! use std::path::Path;
//!
//! # fn main() -> backlang::Result<()> {
//! let source = Path::new("hello.py.bck");
//! let target = naming::resolve_output(&naming::decoded_path(source), naming::CollisionPolicy::Rename);
//! Decoder::new().decode_file(source, &target)?;
//!
//! let registry = LanguageRegistry::default();
//! let language = registry.detect_file(&target)?;
//! Dispatcher::new().run(language, &target)?;
//! # Ok(())
//! # }
//! ```

pub mod decoder;
pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod language;
pub mod lines;
pub mod naming;

pub use decoder::Decoder;
pub use dispatch::Dispatcher;
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use language::{LanguageDescriptor, LanguageRegistry};
pub use lines::{LineRecord, LineSequence};
pub use naming::CollisionPolicy;
