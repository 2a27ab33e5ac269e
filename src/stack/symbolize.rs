use alloc::{
    borrow::ToOwned,
    string::{String, ToString},
};
use core::{ffi::c_void, fmt};
use std::sync::OnceLock;

use backtrace::BytesOrWideString;

use super::Frame;

/// Symbol information for a [`Frame`].
#[derive(Debug, Clone)]
pub struct ResolvedFrame {
    /// The demangled function name.
    pub function: String,
    /// File path information, if debug info is available.
    pub path: Option<FramePath>,
    /// Line number in the source file, if available.
    pub lineno: Option<u32>,
}

/// File path information for a resolved frame.
#[derive(Debug, Clone)]
pub struct FramePath {
    /// The raw file path from the debug information.
    pub raw_path: String,
    /// The crate name if detected from the path.
    pub crate_name: Option<String>,
    /// Common path prefix information for shortening display.
    pub split_path: Option<FramePrefix>,
}

/// A well-known prefix split off a frame path.
#[derive(Debug, Clone)]
pub struct FramePrefix {
    /// The kind of prefix: `"RUST_SRC"` for standard library paths, `"CARGO"`
    /// for Cargo registry crate paths.
    pub prefix_kind: &'static str,
    /// The prefix that was removed from the original path.
    pub prefix: String,
    /// The remaining path after the prefix, starting with the crate directory.
    pub suffix: String,
}

impl Frame {
    /// Looks up the symbol for this frame.
    ///
    /// Returns `None` if no symbol name is known for the program counter.
    /// When several functions were inlined into the frame, the innermost one
    /// is reported.
    pub fn resolve(&self) -> Option<ResolvedFrame> {
        let mut resolved = None;
        backtrace::resolve(self.0 as *mut c_void, |symbol| {
            if resolved.is_some() {
                return;
            }
            let Some(name) = symbol.name() else {
                return;
            };
            resolved = Some(ResolvedFrame {
                function: name.to_string(),
                path: symbol.filename_raw().map(FramePath::new),
                lineno: symbol.lineno(),
            });
        });
        resolved
    }
}

impl ResolvedFrame {
    /// Writes the frame as `function` followed by an indented `path:line`.
    pub(super) fn fmt_with(&self, f: &mut fmt::Formatter<'_>, show_full_path: bool) -> fmt::Result {
        f.write_str(&self.function)?;
        let Some(path) = &self.path else {
            return Ok(());
        };

        match &path.split_path {
            Some(split_path) if !show_full_path => {
                write!(f, "\n\t[{}]/{}", split_path.prefix_kind, split_path.suffix)?;
            }
            _ => write!(f, "\n\t{}", path.raw_path)?,
        }
        if let Some(lineno) = self.lineno {
            write!(f, ":{lineno}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ResolvedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, f.alternate())
    }
}

impl FramePath {
    fn new(path: BytesOrWideString<'_>) -> Self {
        static REGEXES: OnceLock<[regex::Regex; 2]> = OnceLock::new();
        let [std_regex, registry_regex] = REGEXES.get_or_init(|| {
            [
                // /lib/rustlib/src/rust/library/{std|core|alloc}/src/...
                // /rustc/{40-char-hash}/library/{std|core|alloc}/src/...
                regex::Regex::new(
                    r"(?:/lib/rustlib/src/rust|^/rustc/[0-9a-f]{40})/library/(std|core|alloc)/src/.*$",
                )
                .expect("built-in regex pattern for std library paths should be valid"),
                // /.cargo/registry/src/{index}-{16-char-hash}/{crate}-{version}/src/...
                regex::Regex::new(
                    r"/\.cargo/registry/src/[^/]+-[0-9a-f]{16}/([^./]+)-[0-9]+\.[^/]*/src/.*$",
                )
                .expect("built-in regex pattern for cargo registry paths should be valid"),
            ]
        });

        let raw_path = path.to_str_lossy().into_owned();

        for (regex, prefix_kind) in [(std_regex, "RUST_SRC"), (registry_regex, "CARGO")] {
            let Some(crate_capture) = regex.captures(&raw_path).and_then(|c| c.get(1)) else {
                continue;
            };
            let split = crate_capture.start();
            let crate_name = crate_capture.as_str().to_owned();
            let split_path = FramePrefix {
                prefix_kind,
                prefix: raw_path[..split - 1].to_owned(),
                suffix: raw_path[split..].to_owned(),
            };
            return Self {
                raw_path,
                crate_name: Some(crate_name),
                split_path: Some(split_path),
            };
        }

        Self {
            raw_path,
            crate_name: None,
            split_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    fn frame_path(path: &str) -> FramePath {
        FramePath::new(BytesOrWideString::Bytes(path.as_bytes()))
    }

    #[test]
    fn test_std_path_is_split() {
        let path = frame_path(
            "/rustc/0123456789abcdef0123456789abcdef01234567/library/core/src/result.rs",
        );
        let split = path.split_path.expect("std paths should be split");
        assert_eq!(split.prefix_kind, "RUST_SRC");
        assert_eq!(split.suffix, "core/src/result.rs");
        assert_eq!(path.crate_name.as_deref(), Some("core"));
    }

    #[test]
    fn test_registry_path_is_split() {
        let path = frame_path(
            "/home/user/.cargo/registry/src/index.crates.io-1949cf8c6b5b557f/indexmap-2.12.1/src/map.rs",
        );
        let split = path.split_path.expect("registry paths should be split");
        assert_eq!(split.prefix_kind, "CARGO");
        assert_eq!(split.suffix, "indexmap-2.12.1/src/map.rs");
        assert_eq!(path.crate_name.as_deref(), Some("indexmap"));
    }

    #[test]
    fn test_local_path_is_kept() {
        let path = frame_path("/build/src/main.rs");
        assert!(path.split_path.is_none());
        assert!(path.crate_name.is_none());
        assert_eq!(path.raw_path, "/build/src/main.rs");
    }

    #[test]
    fn test_resolved_frame_display() {
        let frame = ResolvedFrame {
            function: "app::load".to_owned(),
            path: Some(frame_path(
                "/home/user/.cargo/registry/src/index.crates.io-1949cf8c6b5b557f/serde-1.0.0/src/de.rs",
            )),
            lineno: Some(12),
        };
        assert_eq!(format!("{frame}"), "app::load\n\t[CARGO]/serde-1.0.0/src/de.rs:12");
        assert!(format!("{frame:#}").ends_with("/.cargo/registry/src/index.crates.io-1949cf8c6b5b557f/serde-1.0.0/src/de.rs:12"));
    }

    #[test]
    fn test_resolve_own_function() {
        #[inline(never)]
        fn probe() -> usize {
            probe as fn() -> usize as usize
        }
        let resolved = Frame::from_ip(probe()).resolve();
        if let Some(resolved) = resolved {
            assert!(resolved.function.contains("probe"));
        }
    }
}
