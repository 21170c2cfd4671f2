//! Dismissible announcement banners.

/// Immutable banner configuration and call-to-action buttons.
pub mod config;
/// Visible/dismissed state machine for one banner instance.
pub mod engine;
/// Ready-made banner configurations.
pub mod presets;

pub use config::{BannerConfig, CtaAction, CtaButton, CtaCallback, CtaStyle};
pub use engine::{BannerEngine, BannerState, BannerView};
