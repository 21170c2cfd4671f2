use crate::models::IconRef;

use super::config::{BannerConfig, CtaAction, CtaButton, CtaStyle};

/// Message shown while annual enrollment is open.
pub const ANNUAL_ENROLLMENT_MESSAGE: &str = "🎉 Annual Enrollment is now open!";
/// Key under which earlier portal builds recorded the enrollment dismissal.
pub const LEGACY_ENROLLMENT_KEY: &str = "annualEnrollmentBannerDismissed";
/// Announcement revision the legacy key was recorded against.
pub const LEGACY_ENROLLMENT_VERSION: &str = "2026";

/// The annual-enrollment announcement: view the primary policy or watch the
/// explainer video.
///
/// Only the revision the legacy key belonged to honours it; later revisions
/// are shown again regardless.
pub fn annual_enrollment(version: impl Into<String>, video_url: impl Into<String>) -> BannerConfig {
    let version = version.into();
    let mut config = BannerConfig::new(ANNUAL_ENROLLMENT_MESSAGE);
    if version == LEGACY_ENROLLMENT_VERSION {
        config = config.with_legacy_key(LEGACY_ENROLLMENT_KEY);
    }
    config
        .with_version(version)
        .with_cta(
            CtaButton::new("View Your Policy", CtaAction::ViewPrimaryPolicy)
                .with_icon(IconRef::Description)
                .with_style(CtaStyle::Outlined),
        )
        .with_cta(
            CtaButton::new("Watch Video", CtaAction::OpenExternal(video_url.into()))
                .with_icon(IconRef::PlayCircle)
                .with_style(CtaStyle::Outlined),
        )
        .dismissible(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrollment_banner_has_two_outlined_ctas() {
        let config = annual_enrollment("2026", "https://video.example/enroll");
        assert_eq!(config.message(), ANNUAL_ENROLLMENT_MESSAGE);
        assert!(config.is_dismissible());
        let labels: Vec<_> = config.cta_buttons().iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["View Your Policy", "Watch Video"]);
        assert!(config
            .cta_buttons()
            .iter()
            .all(|button| button.style == CtaStyle::Outlined));
        match &config.cta_buttons()[1].action {
            CtaAction::OpenExternal(url) => assert_eq!(url, "https://video.example/enroll"),
            other => panic!("unexpected action {other:?}"),
        }
        assert_eq!(config.legacy_keys(), [LEGACY_ENROLLMENT_KEY.to_string()]);
    }

    #[test]
    fn later_revisions_drop_the_legacy_key() {
        let config = annual_enrollment("2027", "https://video.example/enroll");
        assert!(config.legacy_keys().is_empty());
    }
}
