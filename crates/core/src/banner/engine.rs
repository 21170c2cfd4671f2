use std::fmt;

use tracing::debug;

use super::config::{BannerConfig, CtaButton};

/// Lifecycle of a banner within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    /// Message and CTAs are rendered.
    Visible,
    /// Nothing is rendered. Terminal for the session.
    Dismissed,
}

/// What the renderer should draw while the banner is visible.
#[derive(Debug, Clone, Copy)]
pub struct BannerView<'a> {
    /// Banner text.
    pub message: &'a str,
    /// CTAs in display order.
    pub cta_buttons: &'a [CtaButton],
    /// Whether to draw a dismiss control.
    pub dismissible: bool,
}

type DismissHook = Box<dyn FnMut() + Send>;

/// Owns the show/dismiss state machine for one banner instance.
pub struct BannerEngine {
    config: BannerConfig,
    state: BannerState,
    on_dismiss: Option<DismissHook>,
}

impl fmt::Debug for BannerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BannerEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("on_dismiss", &self.on_dismiss.is_some())
            .finish()
    }
}

impl BannerEngine {
    /// Start `Visible`, or `Dismissed` when a prior dismissal was recorded.
    pub fn new(config: BannerConfig, previously_dismissed: bool) -> Self {
        let state = if previously_dismissed {
            BannerState::Dismissed
        } else {
            BannerState::Visible
        };
        Self {
            config,
            state,
            on_dismiss: None,
        }
    }

    /// Register a hook fired once when the banner is dismissed.
    pub fn with_on_dismiss(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.on_dismiss = Some(Box::new(hook));
        self
    }

    /// Configuration this engine renders.
    pub fn config(&self) -> &BannerConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> BannerState {
        self.state
    }

    /// Shorthand for `state() == Visible`.
    pub fn is_visible(&self) -> bool {
        self.state == BannerState::Visible
    }

    /// Move `Visible -> Dismissed`. Returns whether a transition happened.
    ///
    /// No-op when already dismissed or when the banner is not dismissible.
    /// A non-dismissible banner offers no dismiss control, so the transition
    /// itself is refused rather than only the hook being skipped.
    pub fn dismiss(&mut self) -> bool {
        if self.state == BannerState::Dismissed || !self.config.is_dismissible() {
            return false;
        }
        self.state = BannerState::Dismissed;
        debug!(banner = %self.config.identity(), "banner dismissed");
        if let Some(hook) = self.on_dismiss.as_mut() {
            hook();
        }
        true
    }

    /// Rendering contract: `None` while dismissed.
    pub fn view(&self) -> Option<BannerView<'_>> {
        match self.state {
            BannerState::Dismissed => None,
            BannerState::Visible => Some(BannerView {
                message: self.config.message(),
                cta_buttons: self.config.cta_buttons(),
                dismissible: self.config.is_dismissible(),
            }),
        }
    }

    /// Look up the CTA at `index` for activation. Never changes state.
    ///
    /// Returns `None` when dismissed or out of range.
    pub fn cta(&self, index: usize) -> Option<&CtaButton> {
        self.view()
            .and_then(|view| view.cta_buttons.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::config::CtaAction;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn sample_config() -> BannerConfig {
        BannerConfig::new("Notice")
            .with_cta(CtaButton::new("Go", CtaAction::Navigate("/actions".into())))
            .with_cta(CtaButton::new("Read", CtaAction::OpenExternal("https://example.com".into())))
    }

    fn counting_engine(config: BannerConfig, dismissed: bool) -> (BannerEngine, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let engine = BannerEngine::new(config, dismissed).with_on_dismiss(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (engine, hits)
    }

    #[test]
    fn visible_banner_reports_message_and_ctas() {
        let engine = BannerEngine::new(sample_config(), false);
        let view = engine.view().expect("visible banner renders");
        assert_eq!(view.message, "Notice");
        assert_eq!(view.cta_buttons.len(), 2);
        assert!(view.dismissible);
    }

    #[test]
    fn dismiss_is_idempotent_and_fires_hook_once() {
        let (mut engine, hits) = counting_engine(sample_config(), false);
        assert!(engine.dismiss());
        assert!(!engine.dismiss());
        assert_eq!(engine.state(), BannerState::Dismissed);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(engine.view().is_none());
        assert!(engine.cta(0).is_none());
    }

    #[test]
    fn prior_dismissal_starts_dismissed_without_firing_hook() {
        let (mut engine, hits) = counting_engine(sample_config(), true);
        assert_eq!(engine.state(), BannerState::Dismissed);
        assert!(!engine.dismiss());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn non_dismissible_banner_ignores_dismiss() {
        let (mut engine, hits) = counting_engine(sample_config().dismissible(false), false);
        assert!(!engine.dismiss());
        assert!(engine.is_visible());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(!engine.view().map(|view| view.dismissible).unwrap_or(true));
    }

    #[test]
    fn cta_lookup_leaves_state_untouched() {
        let engine = BannerEngine::new(sample_config(), false);
        assert_eq!(engine.cta(1).map(|cta| cta.label.as_str()), Some("Read"));
        assert!(engine.cta(2).is_none());
        assert!(engine.is_visible());
    }
}
