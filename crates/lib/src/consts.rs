/// Suffix identifying module files during a scan.
pub const MANIFEST_SUFFIX: &str = ".mod";

/// Directories skipped directly below the library root (build artifacts).
pub const LIBRARY_SKIP_DIRS: &[&str] = &["pkg", "bin"];

/// Default work root when none is configured.
pub const DEFAULT_WORK_PATH: &str = ".";

// Environment variables read by `Config::load_from_env`.
pub const ENV_LIBRARY_PATH: &str = "GOPATH";
pub const ENV_WORK_PATH: &str = "WORKPATH";
pub const ENV_RECURSIVE: &str = "MODFIX_RECURSIVE";
pub const ENV_HIDDEN: &str = "MODFIX_HIDDEN";
pub const ENV_DEBUG: &str = "MODFIX_DEBUG";
pub const ENV_VERBOSE: &str = "MODFIX_VERBOSE";
pub const ENV_DRY_RUN: &str = "MODFIX_DRYRUN";
pub const ENV_ADD_ALL: &str = "MODFIX_ADD_ALL";
