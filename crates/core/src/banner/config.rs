use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::IconRef;

/// Visual weight of a call-to-action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaStyle {
    /// Borderless text button.
    Text,
    /// Bordered button; the default.
    #[default]
    Outlined,
    /// Solid button.
    Filled,
}

/// Opaque side-effecting callback bound to a CTA.
#[derive(Clone)]
pub struct CtaCallback(Arc<dyn Fn() + Send + Sync>);

impl CtaCallback {
    /// Wrap a closure.
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    /// Run the callback.
    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for CtaCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CtaCallback(..)")
    }
}

/// What selecting a CTA does. The shell interprets these against its
/// navigation and external-open boundaries.
#[derive(Debug, Clone)]
pub enum CtaAction {
    /// Request a route change to the given path.
    Navigate(String),
    /// Navigate to the signed-in user's primary policy.
    ViewPrimaryPolicy,
    /// Open a URL in an independent browsing context.
    OpenExternal(String),
    /// Run an arbitrary callback.
    Callback(CtaCallback),
}

/// One call-to-action rendered inside a banner.
#[derive(Debug, Clone)]
pub struct CtaButton {
    /// Button text.
    pub label: String,
    /// Optional leading icon.
    pub icon: Option<IconRef>,
    /// Visual style.
    pub style: CtaStyle,
    /// Bound action.
    pub action: CtaAction,
}

impl CtaButton {
    /// Outlined button without an icon.
    pub fn new(label: impl Into<String>, action: CtaAction) -> Self {
        Self {
            label: label.into(),
            icon: None,
            style: CtaStyle::default(),
            action,
        }
    }

    /// Attach a leading icon.
    pub fn with_icon(mut self, icon: IconRef) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Override the style.
    pub fn with_style(mut self, style: CtaStyle) -> Self {
        self.style = style;
        self
    }
}

/// Content and behaviour of a banner. Immutable once built.
#[derive(Debug, Clone)]
pub struct BannerConfig {
    message: String,
    cta_buttons: Vec<CtaButton>,
    dismissible: bool,
    version: String,
    legacy_keys: Vec<String>,
}

impl BannerConfig {
    /// A dismissible banner with no CTAs.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cta_buttons: Vec::new(),
            dismissible: true,
            version: String::new(),
            legacy_keys: Vec::new(),
        }
    }

    /// Append a CTA; buttons render in insertion order.
    pub fn with_cta(mut self, button: CtaButton) -> Self {
        self.cta_buttons.push(button);
        self
    }

    /// Set whether the banner offers a dismiss control.
    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    /// Tag the announcement revision; part of the banner identity.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Older persistence keys that also count as a prior dismissal.
    pub fn with_legacy_key(mut self, key: impl Into<String>) -> Self {
        self.legacy_keys.push(key.into());
        self
    }

    /// Banner text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// CTAs in display order.
    pub fn cta_buttons(&self) -> &[CtaButton] {
        &self.cta_buttons
    }

    /// Whether a dismiss control is offered.
    pub fn is_dismissible(&self) -> bool {
        self.dismissible
    }

    /// Announcement revision.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Legacy persistence keys honoured on read.
    pub fn legacy_keys(&self) -> &[String] {
        &self.legacy_keys
    }

    /// Stable persistence key derived from the version and message.
    ///
    /// A new announcement (different text or version) gets a new key, so an
    /// old dismissal never suppresses it.
    pub fn identity(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.version.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.message.as_bytes());
        format!("banner:{}", hex::encode(hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_stable_and_content_derived() {
        let a = BannerConfig::new("Open enrollment").with_version("2026");
        let b = BannerConfig::new("Open enrollment").with_version("2026");
        assert_eq!(a.identity(), b.identity());
        assert!(a.identity().starts_with("banner:"));
        assert_eq!(a.identity().len(), "banner:".len() + 64);

        let next_year = BannerConfig::new("Open enrollment").with_version("2027");
        let reworded = BannerConfig::new("Enrollment closes soon").with_version("2026");
        assert_ne!(a.identity(), next_year.identity());
        assert_ne!(a.identity(), reworded.identity());
    }

    #[test]
    fn ctas_keep_order_and_default_to_outlined() {
        let config = BannerConfig::new("Hello")
            .with_cta(CtaButton::new("First", CtaAction::Navigate("/".into())))
            .with_cta(
                CtaButton::new("Second", CtaAction::ViewPrimaryPolicy)
                    .with_style(CtaStyle::Filled)
                    .with_icon(IconRef::Description),
            );
        let labels: Vec<_> = config.cta_buttons().iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["First", "Second"]);
        assert_eq!(config.cta_buttons()[0].style, CtaStyle::Outlined);
        assert_eq!(config.cta_buttons()[0].icon, None);
        assert_eq!(config.cta_buttons()[1].style, CtaStyle::Filled);
    }

    #[test]
    fn callback_runs_on_call() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let callback = CtaCallback::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        callback.clone().call();
        callback.call();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
