//! Route-aware navigation destinations.

use crate::models::IconRef;

/// One entry in the shell's fixed navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    /// Route path; identity of the destination.
    pub path: &'static str,
    /// Label shown in the navigation bar.
    pub label: &'static str,
    /// Leading icon.
    pub icon: IconRef,
}

/// Destinations offered by the portal navigation bar, in display order.
pub const DESTINATIONS: [Destination; 3] = [
    Destination {
        path: "/",
        label: "Dashboard",
        icon: IconRef::Dashboard,
    },
    Destination {
        path: "/actions",
        label: "Actions",
        icon: IconRef::Assignment,
    },
    Destination {
        path: "/coverage-calculator",
        label: "Coverage Calculator",
        icon: IconRef::Calculate,
    },
];

/// A destination paired with its derived active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    /// The destination being rendered.
    pub destination: Destination,
    /// True when the current route equals the destination path exactly.
    pub active: bool,
}

/// Derives active state for a static destination set from the current path.
#[derive(Debug, Clone)]
pub struct NavigationModel {
    destinations: &'static [Destination],
}

impl Default for NavigationModel {
    fn default() -> Self {
        Self::new(&DESTINATIONS)
    }
}

impl NavigationModel {
    /// Build a model over the given destinations.
    pub fn new(destinations: &'static [Destination]) -> Self {
        Self { destinations }
    }

    /// Destinations in display order.
    pub fn destinations(&self) -> &'static [Destination] {
        self.destinations
    }

    /// Whether `path` activates the destination at `dest_path`.
    ///
    /// Matching is exact: no prefix matching and no trailing-slash folding.
    pub fn is_active(current_path: &str, dest_path: &str) -> bool {
        current_path == dest_path
    }

    /// Every destination with its active flag for `current_path`.
    pub fn items(&self, current_path: &str) -> Vec<NavItem> {
        self.destinations
            .iter()
            .map(|destination| NavItem {
                destination: *destination,
                active: Self::is_active(current_path, destination.path),
            })
            .collect()
    }

    /// The active destination, if the path matches one.
    pub fn active(&self, current_path: &str) -> Option<&'static Destination> {
        self.destinations
            .iter()
            .find(|destination| Self::is_active(current_path, destination.path))
    }

    /// Destination at a zero-based position in the bar.
    pub fn get(&self, index: usize) -> Option<&'static Destination> {
        self.destinations.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(model: &NavigationModel, path: &str) -> Vec<(&'static str, bool)> {
        model
            .items(path)
            .into_iter()
            .map(|item| (item.destination.label, item.active))
            .collect()
    }

    #[test]
    fn actions_path_activates_only_actions() {
        let model = NavigationModel::default();
        assert_eq!(
            flags(&model, "/actions"),
            vec![
                ("Dashboard", false),
                ("Actions", true),
                ("Coverage Calculator", false),
            ]
        );
    }

    #[test]
    fn each_destination_path_activates_exactly_one() {
        let model = NavigationModel::default();
        for destination in model.destinations() {
            let items = model.items(destination.path);
            let active: Vec<_> = items.iter().filter(|item| item.active).collect();
            assert_eq!(active.len(), 1, "path {}", destination.path);
            assert_eq!(active[0].destination.path, destination.path);
        }
    }

    #[test]
    fn no_prefix_or_trailing_slash_matching() {
        let model = NavigationModel::default();
        for path in ["/actions/", "/actions/42", "/policy/life-001", "", "/Actions"] {
            assert!(model.items(path).iter().all(|item| !item.active), "{path}");
            assert!(model.active(path).is_none());
        }
    }

    #[test]
    fn root_is_not_a_prefix_of_everything() {
        let model = NavigationModel::default();
        let active = model.active("/coverage-calculator").map(|d| d.label);
        assert_eq!(active, Some("Coverage Calculator"));
    }
}
