//! Artifact naming and collision handling

use crate::lines::ENCODED_SUFFIX;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::debug;

/// What to do when the output path already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Replace the existing file
    Overwrite,
    /// Pick the next free `base_N.ext` name
    Rename,
}

/// `<source>.bck`; encoding an artifact again stacks the suffix
pub fn encoded_path(source: &Path) -> PathBuf {
    let mut name = OsString::from(source.as_os_str());
    name.push(ENCODED_SUFFIX);
    PathBuf::from(name)
}

/// Whether the final path component ends in `.bck`, ignoring case
pub fn has_encoded_suffix(path: &Path) -> bool {
    path.file_name().and_then(strip_suffix).is_some()
}

/// `name` without its trailing `.bck`, compared on raw bytes so non-UTF-8
/// names survive untouched
fn strip_suffix(name: &OsStr) -> Option<&OsStr> {
    let bytes = name.as_encoded_bytes();
    let cut = bytes.len().checked_sub(ENCODED_SUFFIX.len())?;
    if !bytes[cut..].eq_ignore_ascii_case(ENCODED_SUFFIX.as_bytes()) {
        return None;
    }
    // SAFETY: the removed tail is ASCII, so `cut` is a valid boundary
    Some(unsafe { OsStr::from_encoded_bytes_unchecked(&bytes[..cut]) })
}

/// Strip exactly one trailing `.bck` (any case) from the final component.
///
/// Paths without the suffix come back unchanged.
pub fn decoded_path(path: &Path) -> PathBuf {
    match path.file_name().and_then(strip_suffix) {
        Some(stem) => path.with_file_name(stem),
        None => path.to_path_buf(),
    }
}

/// Smallest `base_N.ext` with `N >= 1` that does not exist yet.
///
/// The check and the later write are not atomic; two processes racing for
/// the same name can collide.
pub fn next_available_name(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    let ext = path.extension();

    let mut n: u64 = 1;
    loop {
        let mut name = OsString::from(stem);
        name.push(format!("_{}", n));
        if let Some(ext) = ext {
            name.push(".");
            name.push(ext);
        }
        let candidate = path.with_file_name(name);
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Final output path for `target` under `policy`
pub fn resolve_output(target: &Path, policy: CollisionPolicy) -> PathBuf {
    if !target.exists() {
        return target.to_path_buf();
    }
    match policy {
        CollisionPolicy::Overwrite => {
            debug!(target = %target.display(), "overwriting existing file");
            target.to_path_buf()
        }
        CollisionPolicy::Rename => {
            let renamed = next_available_name(target);
            debug!(
                target = %target.display(),
                renamed = %renamed.display(),
                "target exists, picked numbered name"
            );
            renamed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_path() {
        assert_eq!(encoded_path(Path::new("a/file.txt")), PathBuf::from("a/file.txt.bck"));
        assert_eq!(encoded_path(Path::new("x.bck")), PathBuf::from("x.bck.bck"));
    }

    #[test]
    fn test_decoded_path() {
        let cases = [
            ("file.txt.bck", "file.txt"),
            ("file.txt", "file.txt"),
            ("file.bck.bck", "file.bck"),
            ("/path/to/file.txt.BCK", "/path/to/file.txt"),
            ("just.bck", "just"),
            ("dir.bck/file.txt", "dir.bck/file.txt"),
        ];
        for (input, expected) in cases {
            assert_eq!(decoded_path(Path::new(input)), PathBuf::from(expected), "{}", input);
        }
    }

    #[test]
    fn test_has_encoded_suffix() {
        assert!(has_encoded_suffix(Path::new("a.py.bck")));
        assert!(has_encoded_suffix(Path::new("A.PY.Bck")));
        assert!(!has_encoded_suffix(Path::new("a.py")));
        assert!(!has_encoded_suffix(Path::new("a.bck/inner")));
        assert!(!has_encoded_suffix(Path::new("bck")));
    }

    #[test]
    fn test_next_available_name_skips_taken() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("out.txt"), "").unwrap();
        std::fs::write(dir.path().join("out_1.txt"), "").unwrap();

        let next = next_available_name(&dir.path().join("out.txt"));
        assert_eq!(next, dir.path().join("out_2.txt"));
    }

    #[test]
    fn test_next_available_name_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("script"), "").unwrap();

        let next = next_available_name(&dir.path().join("script"));
        assert_eq!(next, dir.path().join("script_1"));
    }

    #[test]
    #[cfg(unix)]
    fn test_non_utf8_names_kept_verbatim() {
        use std::os::unix::ffi::OsStrExt;

        let encoded = Path::new(OsStr::from_bytes(b"/tmp/\xffdata.txt.bck"));
        assert!(has_encoded_suffix(encoded));
        assert_eq!(
            decoded_path(encoded).as_os_str().as_bytes(),
            b"/tmp/\xffdata.txt"
        );

        let dir = tempfile::tempdir().unwrap();
        let taken = dir.path().join(OsStr::from_bytes(b"\xfeout.t\xfdt"));
        std::fs::write(&taken, "").unwrap();
        assert_eq!(
            next_available_name(&taken).file_name().unwrap().as_bytes(),
            b"\xfeout_1.t\xfdt"
        );
    }

    #[test]
    fn test_resolve_output() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("run.py");

        assert_eq!(resolve_output(&target, CollisionPolicy::Rename), target);

        std::fs::write(&target, "").unwrap();
        assert_eq!(resolve_output(&target, CollisionPolicy::Overwrite), target);
        assert_eq!(
            resolve_output(&target, CollisionPolicy::Rename),
            dir.path().join("run_1.py")
        );
    }
}
