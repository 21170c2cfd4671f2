//! Application shell: transient UI state and user-intent dispatch.
//!
//! The controller composes the banner engine, navigation model and routed
//! page boundary. All operations are synchronous and total; failures in the
//! persistence or external-open boundaries are logged and swallowed so the
//! shell stays interactive.

use std::{collections::VecDeque, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    banner::{BannerConfig, BannerEngine, BannerState, BannerView, CtaAction},
    dismissal::DismissalStore,
    effects::{ExternalOpener, Navigator, PolicyResolver},
    models::{ContactPreferencesProps, IconRef},
    navigation::{NavItem, NavigationModel},
    routes::Route,
};

/// Opaque position token for the profile menu. The shell never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuAnchor(String);

impl MenuAnchor {
    /// Wrap a surface-specific anchor identifier.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Underlying token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Entries of the profile menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMenuItem {
    /// Opens the contact-preferences dialog.
    ContactPreferences,
}

impl ProfileMenuItem {
    /// Menu entries in display order.
    pub const ALL: [ProfileMenuItem; 1] = [ProfileMenuItem::ContactPreferences];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            ProfileMenuItem::ContactPreferences => "Contact Preferences",
        }
    }

    /// Leading icon.
    pub fn icon(self) -> IconRef {
        match self {
            ProfileMenuItem::ContactPreferences => IconRef::ContactPhone,
        }
    }
}

/// Events retained between drains; older entries are dropped past this.
pub const EVENT_JOURNAL_CAPACITY: usize = 256;

/// Discrete state changes, recorded in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Profile menu opened or re-anchored.
    MenuOpened(MenuAnchor),
    /// Profile menu closed.
    MenuClosed,
    /// Contact-preferences dialog opened.
    DialogOpened,
    /// Contact-preferences dialog closed.
    DialogClosed,
    /// Banner moved to `Dismissed`.
    BannerDismissed {
        /// Persistence key of the banner.
        key: String,
    },
    /// A route change was requested.
    NavigationRequested(String),
    /// The active route changed.
    RouteChanged(String),
    /// External content was handed to the opener.
    ExternalOpened {
        /// URL requested.
        url: String,
        /// Whether the opener accepted it.
        launched: bool,
    },
}

/// Static inputs for a shell instance.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Banner shown above the page area.
    pub banner: BannerConfig,
    /// Address passed to the contact-preferences dialog.
    pub user_email: String,
    /// Route active at startup.
    pub start_path: String,
}

/// Boundaries the shell drives.
pub struct ShellDeps {
    /// Durable dismissal medium.
    pub store: Arc<dyn DismissalStore>,
    /// Route-change trigger.
    pub navigator: Box<dyn Navigator>,
    /// Independent browsing context.
    pub opener: Box<dyn ExternalOpener>,
    /// Primary policy lookup.
    pub policies: Box<dyn PolicyResolver>,
}

/// Owns transient UI state and translates user intent into effects.
pub struct ShellController {
    navigation: NavigationModel,
    current_path: String,
    banner: BannerEngine,
    banner_key: String,
    store: Arc<dyn DismissalStore>,
    navigator: Box<dyn Navigator>,
    opener: Box<dyn ExternalOpener>,
    policies: Box<dyn PolicyResolver>,
    menu_anchor: Option<MenuAnchor>,
    contact_dialog_open: bool,
    user_email: String,
    events: VecDeque<ShellEvent>,
}

impl ShellController {
    /// Build the shell, reading the dismissal store once for the banner.
    pub fn new(config: ShellConfig, deps: ShellDeps) -> Self {
        let ShellConfig {
            banner,
            user_email,
            start_path,
        } = config;
        let banner_key = banner.identity();
        let previously_dismissed = deps.store.read(&banner_key)
            || banner.legacy_keys().iter().any(|key| deps.store.read(key));
        if previously_dismissed {
            info!(banner = %banner_key, "banner previously dismissed; starting hidden");
        }
        let engine = BannerEngine::new(banner, previously_dismissed);

        Self {
            navigation: NavigationModel::default(),
            current_path: start_path,
            banner: engine,
            banner_key,
            store: deps.store,
            navigator: deps.navigator,
            opener: deps.opener,
            policies: deps.policies,
            menu_anchor: None,
            contact_dialog_open: false,
            user_email,
            events: VecDeque::with_capacity(EVENT_JOURNAL_CAPACITY),
        }
    }

    /// Current route path.
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Page selected by the current path; `None` renders an empty page area.
    pub fn current_route(&self) -> Option<Route> {
        Route::resolve(&self.current_path)
    }

    /// Navigation bar entries with active flags for the current path.
    pub fn nav_items(&self) -> Vec<NavItem> {
        self.navigation.items(&self.current_path)
    }

    /// The navigation model backing the bar.
    pub fn navigation(&self) -> &NavigationModel {
        &self.navigation
    }

    /// Route-change notification from the router.
    pub fn route_changed(&mut self, path: impl Into<String>) {
        let path = path.into();
        if path == self.current_path {
            return;
        }
        debug!(from = %self.current_path, to = %path, "route changed");
        self.current_path = path.clone();
        self.record(ShellEvent::RouteChanged(path));
    }

    /// Request a route change.
    pub fn navigate(&mut self, path: &str) {
        info!(path, "navigation requested");
        self.navigator.navigate(path);
        self.record(ShellEvent::NavigationRequested(path.to_string()));
    }

    /// Navigate to the destination at `index` in the navigation bar.
    pub fn navigate_to_destination(&mut self, index: usize) -> bool {
        match self.navigation.get(index) {
            Some(destination) => {
                self.navigate(destination.path);
                true
            }
            None => false,
        }
    }

    /// Brand link: go to the dashboard.
    pub fn navigate_home(&mut self) {
        self.navigate(&Route::Dashboard.path());
    }

    /// Open the user's primary policy. Leaves the banner as it is.
    pub fn navigate_to_policy(&mut self) {
        let id = self.policies.resolve_primary_policy_id();
        self.navigate(&Route::policy(id).path());
    }

    /// Open `url` in an independent context. Never changes the route.
    pub fn open_external_content(&mut self, url: &str) {
        let launched = match self.opener.open(url) {
            Ok(()) => {
                info!(url, "opened external content");
                true
            }
            Err(err) => {
                warn!(%err, url, "external open failed");
                false
            }
        };
        self.record(ShellEvent::ExternalOpened {
            url: url.to_string(),
            launched,
        });
    }

    /// Whether the profile menu is open.
    pub fn is_profile_menu_open(&self) -> bool {
        self.menu_anchor.is_some()
    }

    /// Anchor of the open menu.
    pub fn menu_anchor(&self) -> Option<&MenuAnchor> {
        self.menu_anchor.as_ref()
    }

    /// Open the menu at `anchor`; a later call re-anchors it.
    ///
    /// Ignored while the contact-preferences dialog is open.
    pub fn open_profile_menu(&mut self, anchor: MenuAnchor) {
        if self.contact_dialog_open {
            debug!("profile menu suppressed while dialog is open");
            return;
        }
        if self.menu_anchor.as_ref() == Some(&anchor) {
            return;
        }
        self.menu_anchor = Some(anchor.clone());
        self.record(ShellEvent::MenuOpened(anchor));
    }

    /// Close the menu. Idempotent.
    pub fn close_profile_menu(&mut self) {
        if self.menu_anchor.take().is_some() {
            self.record(ShellEvent::MenuClosed);
        }
    }

    /// Select a menu entry; the menu closes before the entry's effect runs.
    pub fn select_menu_item(&mut self, item: ProfileMenuItem) {
        match item {
            ProfileMenuItem::ContactPreferences => self.open_contact_preferences(),
        }
    }

    /// Whether the dialog is open.
    pub fn is_contact_preferences_open(&self) -> bool {
        self.contact_dialog_open
    }

    /// Close the profile menu, then open the dialog, as two separate changes.
    pub fn open_contact_preferences(&mut self) {
        self.close_profile_menu();
        if !self.contact_dialog_open {
            self.contact_dialog_open = true;
            self.record(ShellEvent::DialogOpened);
        }
    }

    /// Close the dialog. Idempotent.
    pub fn close_contact_preferences(&mut self) {
        if self.contact_dialog_open {
            self.contact_dialog_open = false;
            self.record(ShellEvent::DialogClosed);
        }
    }

    /// Props for the dialog component.
    pub fn contact_preferences_props(&self) -> ContactPreferencesProps {
        ContactPreferencesProps {
            open: self.contact_dialog_open,
            user_email: self.user_email.clone(),
        }
    }

    /// Banner content to render, or `None` once dismissed.
    pub fn banner_view(&self) -> Option<BannerView<'_>> {
        self.banner.view()
    }

    /// Banner lifecycle state.
    pub fn banner_state(&self) -> BannerState {
        self.banner.state()
    }

    /// Persistence key of the banner.
    pub fn banner_key(&self) -> &str {
        &self.banner_key
    }

    /// Dismiss the banner and persist the dismissal.
    pub fn dismiss_banner(&mut self) {
        if !self.banner.dismiss() {
            return;
        }
        self.store.write_dismissed(&self.banner_key);
        self.record(ShellEvent::BannerDismissed {
            key: self.banner_key.clone(),
        });
    }

    /// Run the bound action of the banner CTA at `index`.
    ///
    /// Activation is independent of dismissal: the banner stays as it was.
    pub fn activate_cta(&mut self, index: usize) -> bool {
        let Some(button) = self.banner.cta(index) else {
            return false;
        };
        let action = button.action.clone();
        debug!(label = %button.label, "banner CTA activated");
        match action {
            CtaAction::Navigate(path) => self.navigate(&path),
            CtaAction::ViewPrimaryPolicy => self.navigate_to_policy(),
            CtaAction::OpenExternal(url) => self.open_external_content(&url),
            CtaAction::Callback(callback) => callback.call(),
        }
        true
    }

    /// Take every event recorded since the last drain.
    ///
    /// Only the latest [`EVENT_JOURNAL_CAPACITY`] events are kept, so callers
    /// that never drain hold a bounded journal.
    pub fn drain_events(&mut self) -> Vec<ShellEvent> {
        self.events.drain(..).collect()
    }

    fn record(&mut self, event: ShellEvent) {
        if self.events.len() >= EVENT_JOURNAL_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}
