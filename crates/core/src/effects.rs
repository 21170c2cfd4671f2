//! Side-effect boundaries driven by the shell.

use std::{
    process::{Command, Stdio},
    thread,
};

use thiserror::Error;
use tracing::debug;

/// Requests a route change. Fire-and-forget; the new path comes back to the
/// shell as a route-change notification.
pub trait Navigator: Send {
    /// Ask for `path` to become the active route.
    fn navigate(&self, path: &str);
}

/// Supplies the policy the "view policy" action lands on.
pub trait PolicyResolver: Send {
    /// Identifier of the signed-in user's primary policy.
    fn resolve_primary_policy_id(&self) -> String;
}

/// Opens content in an independent browsing context.
pub trait ExternalOpener: Send {
    /// Open `url` without touching the current route.
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Reasons an external open did not happen.
#[derive(Debug, Error)]
pub enum OpenError {
    /// Only `http` and `https` URLs are handed to the platform.
    #[error("refusing to open non-web url {0:?}")]
    UnsupportedScheme(String),
    /// The platform opener could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch {
        /// Program that was spawned.
        program: &'static str,
        /// Spawn failure.
        #[source]
        source: std::io::Error,
    },
}

/// Resolver returning a fixed, configured policy id.
#[derive(Debug, Clone)]
pub struct ConfiguredPolicy {
    id: String,
}

impl ConfiguredPolicy {
    /// Always resolve to `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl PolicyResolver for ConfiguredPolicy {
    fn resolve_primary_policy_id(&self) -> String {
        self.id.clone()
    }
}

/// Opens URLs with the desktop's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl SystemOpener {
    fn command(url: &str) -> (&'static str, Command) {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            ("open", cmd)
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(escape_for_cmd(url));
            ("cmd", cmd)
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            ("xdg-open", cmd)
        }
    }
}

impl ExternalOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        if !is_web_url(url) {
            return Err(OpenError::UnsupportedScheme(url.to_string()));
        }
        let (program, mut cmd) = Self::command(url);
        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| OpenError::Launch { program, source })?;
        debug!(program, url, "external opener launched");
        // Reap the child off-thread.
        thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

/// Caret-escape `cmd.exe` metacharacters so `&` and friends stay in the URL.
/// Whitespace is percent-encoded so the argument is never re-quoted.
fn escape_for_cmd(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    for ch in url.chars() {
        match ch {
            '&' | '|' | '<' | '>' | '^' | '(' | ')' | '%' | '!' | '"' => {
                escaped.push('^');
                escaped.push(ch);
            }
            ' ' => escaped.push_str("^%20"),
            '\t' => escaped.push_str("^%09"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// True for absolute `http://` or `https://` URLs.
pub fn is_web_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.len() > scheme.len() && lower.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_web_urls_are_accepted() {
        assert!(is_web_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_web_url("HTTP://example.com"));
        assert!(!is_web_url("https://"));
        assert!(!is_web_url("file:///etc/passwd"));
        assert!(!is_web_url("javascript:alert(1)"));
    }

    #[test]
    fn system_opener_rejects_other_schemes_without_spawning() {
        let err = SystemOpener.open("file:///tmp/x").expect_err("scheme rejected");
        assert!(matches!(err, OpenError::UnsupportedScheme(_)));
    }

    #[test]
    fn cmd_escaping_keeps_query_separators() {
        assert_eq!(
            escape_for_cmd("https://example.com/watch?v=1&t=30"),
            "https://example.com/watch?v=1^&t=30"
        );
        assert_eq!(escape_for_cmd("https://example.com/a%20b"), "https://example.com/a^%20b");
        assert_eq!(escape_for_cmd("https://example.com/a b"), "https://example.com/a^%20b");
    }

    #[test]
    fn configured_policy_is_constant() {
        let resolver = ConfiguredPolicy::new("life-001");
        assert_eq!(resolver.resolve_primary_policy_id(), "life-001");
    }
}
