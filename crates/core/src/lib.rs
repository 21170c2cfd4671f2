#![warn(clippy::all, missing_docs)]

//! Core state and interaction model for the Bloom Insurance portal shell.
//!
//! This crate hosts the navigation model, the routed-page boundary, the
//! dismissible announcement banner with its persisted dismissal store, and
//! the shell controller that coordinates them. Rendering surfaces (the
//! terminal UI today) drive the controller and draw what it reports.

pub mod banner;
pub mod config;
pub mod dismissal;
pub mod effects;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod shell;

pub use banner::{BannerConfig, BannerEngine, BannerState, CtaAction, CtaButton, CtaStyle};
pub use self::config::AppConfig;
pub use dismissal::{DismissalStore, FileDismissalStore, MemoryDismissalStore};
pub use effects::{ConfiguredPolicy, ExternalOpener, Navigator, PolicyResolver, SystemOpener};
pub use models::IconRef;
pub use navigation::{Destination, NavigationModel, DESTINATIONS};
pub use routes::Route;
pub use shell::{MenuAnchor, ProfileMenuItem, ShellConfig, ShellController, ShellDeps, ShellEvent};
