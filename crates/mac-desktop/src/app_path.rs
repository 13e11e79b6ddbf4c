//! Normalized application bundle paths.

use std::{
    env,
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
};

/// Directory used for bare application names such as `Safari.app`.
pub const APPLICATIONS_DIR: &str = "/Applications";

/// Absolute, space-escaped path to a launchable application bundle.
///
/// Every `AppPath` is produced by [`AppPath::resolve`], so the escaped form is
/// the identity used for equality: a configured `"Brave Browser.app"` and the
/// queried frontmost `/Applications/Brave Browser.app` compare equal.
///
/// e.g. `/Applications/Visual Studio Code.app` is stored as
/// `/Applications/Visual\ Studio\ Code.app`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppPath(String);

impl AppPath {
    /// Resolve an application name, `~` path or absolute path.
    ///
    /// - `/abs/Foo.app` is used as is
    /// - `~` and `~/...` expand against `$HOME`
    /// - anything else is taken relative to [`APPLICATIONS_DIR`]
    ///
    /// Existing backslashes are dropped before spaces are escaped, so already
    /// escaped input resolves to the same value.
    pub fn resolve(name: &str) -> Self {
        let home = env::var_os("HOME");
        Self::resolve_with_home(name, home.as_deref())
    }

    /// Same as [`AppPath::resolve`] with an explicit home directory.
    pub fn resolve_with_home(name: &str, home: Option<&OsStr>) -> Self {
        Self(escape(&expand(name, home)))
    }

    /// The escaped path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unescaped filesystem path, suitable for passing as a process argument.
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(self.0.replace("\\ ", " "))
    }

    /// Bundle file name without escaping, e.g. `Brave Browser.app`.
    pub fn bundle_name(&self) -> String {
        self.to_path_buf()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl fmt::Display for AppPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Expand `name` into an absolute path string.
fn expand(name: &str, home: Option<&OsStr>) -> String {
    if name.starts_with('/') {
        return name.to_string();
    }
    if name == "~" || name.starts_with("~/") {
        return match home {
            Some(home) => {
                let rest = name.trim_start_matches('~').trim_start_matches('/');
                let path = if rest.is_empty() {
                    PathBuf::from(home)
                } else {
                    Path::new(home).join(rest)
                };
                path.to_string_lossy().into_owned()
            }
            None => name.to_string(),
        };
    }
    format!("{APPLICATIONS_DIR}/{name}")
}

/// Drop stray backslashes and escape spaces.
fn escape(path: &str) -> String {
    path.replace('\\', "").replace(' ', "\\ ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(name: &str) -> String {
        AppPath::resolve_with_home(name, Some(OsStr::new("/Users/me")))
            .as_str()
            .to_string()
    }

    #[test]
    fn bare_names_live_in_applications() {
        assert_eq!(resolve("Safari.app"), "/Applications/Safari.app");
        assert_eq!(
            resolve("Visual Studio Code.app"),
            "/Applications/Visual\\ Studio\\ Code.app"
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        assert_eq!(
            resolve("/System/Applications/Notes.app"),
            "/System/Applications/Notes.app"
        );
    }

    #[test]
    fn tilde_expands_against_home() {
        assert_eq!(
            resolve("~/Applications/Brave Browser Apps.localized/Messages.app"),
            "/Users/me/Applications/Brave\\ Browser\\ Apps.localized/Messages.app"
        );
        assert_eq!(resolve("~"), "/Users/me");
    }

    #[test]
    fn tilde_without_home_is_left_alone() {
        let p = AppPath::resolve_with_home("~/Foo.app", None);
        assert_eq!(p.as_str(), "~/Foo.app");
    }

    #[test]
    fn escaping_is_idempotent() {
        let once = resolve("Brave Browser.app");
        let twice = resolve(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn queried_and_configured_paths_compare_equal() {
        let configured = AppPath::resolve_with_home("Brave Browser.app", None);
        let queried = AppPath::resolve_with_home("/Applications/Brave Browser.app", None);
        assert_eq!(configured, queried);
    }

    #[test]
    fn unescaped_path_and_bundle_name() {
        let p = AppPath::resolve_with_home("Brave Browser.app", None);
        assert_eq!(
            p.to_path_buf(),
            PathBuf::from("/Applications/Brave Browser.app")
        );
        assert_eq!(p.bundle_name(), "Brave Browser.app");
        assert_eq!(p.to_string(), "/Applications/Brave\\ Browser.app");
    }
}
