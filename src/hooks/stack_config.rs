/// Controls stack capture and stack display.
///
/// The configuration in effect is the one installed through
/// [`Hooks::stack_config`](super::Hooks::stack_config), or
/// [`StackConfig::from_env`] when no hooks were installed. Without the `std`
/// feature the fallback is [`StackConfig::DEFAULT`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StackConfig {
    /// Whether stack-capturing constructors record a stack at all.
    pub capture: bool,
    /// The maximum number of frames kept per capture.
    pub max_depth: usize,
    /// Whether stacks that wrap an error with a stack are abbreviated.
    pub abbreviate: bool,
    /// Whether frames are displayed with their full file path instead of a
    /// shortened one for standard library and registry paths.
    pub show_full_path: bool,
}

impl StackConfig {
    /// Capture up to 64 frames, abbreviate, and shorten known paths.
    pub const DEFAULT: Self = Self {
        capture: true,
        max_depth: 64,
        abbreviate: true,
        show_full_path: false,
    };

    /// A configuration that never captures stacks.
    pub const DISABLED: Self = Self {
        capture: false,
        ..Self::DEFAULT
    };

    /// Reads the configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `RUST_BACKTRACE=full` - Shows full file paths
    /// - `ERRNOTE_STACK` - Comma-separated options:
    ///   - `off` - Do not capture stacks
    ///   - `full` - Never abbreviate stacks
    ///   - `full_paths` - Show full file paths instead of shortened paths
    ///   - `depth=N` - Keep at most `N` frames per capture
    ///
    /// Unknown options are ignored. The result is computed once and cached.
    #[cfg(feature = "std")]
    pub fn from_env() -> Self {
        static FROM_ENV: std::sync::OnceLock<StackConfig> = std::sync::OnceLock::new();

        *FROM_ENV.get_or_init(|| {
            let rust_backtrace_full =
                std::env::var_os("RUST_BACKTRACE").is_some_and(|var| var == "full");
            let options = std::env::var_os("ERRNOTE_STACK");
            Self::parse_options(
                Self {
                    show_full_path: rust_backtrace_full,
                    ..Self::DEFAULT
                },
                options.as_deref().map(|var| var.to_string_lossy()).as_deref(),
            )
        })
    }

    #[cfg_attr(not(feature = "std"), allow(dead_code))]
    fn parse_options(mut self, options: Option<&str>) -> Self {
        for option in options.into_iter().flat_map(|s| s.split(',')).map(str::trim) {
            if option.eq_ignore_ascii_case("off") {
                self.capture = false;
            } else if option.eq_ignore_ascii_case("full") {
                self.abbreviate = false;
            } else if option.eq_ignore_ascii_case("full_paths") {
                self.show_full_path = true;
            } else if let Some(depth) = option.strip_prefix("depth=")
                && let Ok(depth) = depth.parse()
            {
                self.max_depth = depth;
            }
        }
        self
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let config = StackConfig::DEFAULT.parse_options(Some("full, depth=8,Full_Paths,bogus"));
        assert_eq!(
            config,
            StackConfig {
                capture: true,
                max_depth: 8,
                abbreviate: false,
                show_full_path: true,
            }
        );
    }

    #[test]
    fn test_parse_off_and_bad_depth() {
        let config = StackConfig::DEFAULT.parse_options(Some("off,depth=lots"));
        assert!(!config.capture);
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn test_parse_nothing() {
        assert_eq!(StackConfig::DEFAULT.parse_options(None), StackConfig::DEFAULT);
        assert_eq!(StackConfig::DEFAULT.parse_options(Some("")), StackConfig::DEFAULT);
    }
}
