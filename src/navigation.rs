//! Static navigation tree, role filtering and breadcrumbs.

use serde::Serialize;

use crate::auth::{satisfies, Role};
use crate::i18n::{Locale, Translator};

/// A route in the sidebar. Titles are resolved through the `navigation`
/// dictionary section at render time; `literal` is the last-resort label.
#[derive(Debug)]
pub struct NavItem {
    pub key: &'static str,
    pub literal: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
    pub required: Option<Role>,
    pub children: &'static [NavItem],
}

const fn leaf(key: &'static str, literal: &'static str, path: &'static str) -> NavItem {
    NavItem {
        key,
        literal,
        path,
        icon: "",
        required: None,
        children: &[],
    }
}

pub static MAIN_NAV: &[NavItem] = &[
    NavItem {
        key: "dashboard",
        literal: "Dashboard",
        path: "/dashboard",
        icon: "dashboard",
        required: None,
        children: &[],
    },
    NavItem {
        key: "events",
        literal: "Events",
        path: "/events",
        icon: "calendar-event",
        required: None,
        children: &[
            leaf("currentEvents", "Current Events", "/events/current-events"),
            leaf("pastEvents", "Past Events", "/events/past-events"),
            leaf("upcoming", "Upcoming", "/events/upcoming"),
        ],
    },
    NavItem {
        key: "applications",
        literal: "Applications",
        path: "/applications",
        icon: "folder",
        required: None,
        children: &[
            leaf("currentApplications", "Current Applications", "/applications/current-applications"),
            leaf("pastApplications", "Past Applications", "/applications/past-applications"),
        ],
    },
    NavItem {
        key: "profile",
        literal: "Profile",
        path: "/profile",
        icon: "user",
        required: None,
        children: &[
            leaf("personalInfo", "Personal Information", "/profile/personal"),
            leaf("contactDetails", "Contact Details", "/profile/contact"),
            leaf("address", "Address", "/profile/address"),
            leaf("education", "Education", "/profile/education"),
            leaf("preferences", "Preferences", "/profile/preferences"),
            NavItem {
                key: "teamerInfo",
                literal: "Teamer Information",
                path: "/profile/teamer",
                icon: "",
                required: Some(Role::Teamer),
                children: &[],
            },
        ],
    },
];

pub static ADMIN_NAV: &[NavItem] = &[
    NavItem {
        key: "adminEvents",
        literal: "Event Administration",
        path: "/admin/events",
        icon: "calendar-cog",
        required: Some(Role::Admin),
        children: &[
            leaf("manageEvents", "Manage Events", "/admin/events/manage-events"),
            leaf("createEvent", "Create Event", "/admin/events/create-event"),
            leaf("eventAnalytics", "Event Analytics", "/admin/events/analytics"),
        ],
    },
    NavItem {
        key: "adminApplications",
        literal: "Application Administration",
        path: "/admin/applications",
        icon: "users",
        required: Some(Role::Admin),
        children: &[
            leaf("manageApplications", "Manage Applications", "/admin/applications/manage-applications"),
            leaf("compareApplications", "Compare Applications", "/admin/applications/compare"),
        ],
    },
    NavItem {
        key: "adminSchools",
        literal: "School Administration",
        path: "/admin/schools",
        icon: "school",
        required: Some(Role::Admin),
        children: &[leaf("manageSchools", "Manage Schools", "/admin/schools/manage")],
    },
];

pub static SECONDARY_NAV: &[NavItem] = &[NavItem {
    key: "settings",
    literal: "Settings",
    path: "/settings",
    icon: "settings",
    required: None,
    children: &[
        leaf("appearance", "Appearance", "/settings/appearance"),
        leaf("language", "Language", "/settings/language"),
    ],
}];

/// Whether `role` may see `item` itself. Ancestors are checked by the caller.
pub fn is_visible(item: &NavItem, role: Role) -> bool {
    item.required.map_or(true, |required| satisfies(role, required))
}

/// Which navigation the dashboard layout shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    User,
    Admin,
}

impl ViewMode {
    /// Admins start in the admin view and may opt out with `?view=user`;
    /// everybody else is always in the user view.
    pub fn resolve(requested: Option<&str>, role: Role) -> Self {
        if role != Role::Admin {
            return ViewMode::User;
        }
        match requested {
            Some("user") => ViewMode::User,
            _ => ViewMode::Admin,
        }
    }
}

/// A navigation entry after filtering and localization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub key: &'static str,
    pub title: &'static str,
    pub href: String,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavGroup {
    pub label: &'static str,
    pub items: Vec<NavLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sidebar {
    pub view: ViewMode,
    pub main: NavGroup,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<NavGroup>,
    pub secondary: Vec<NavLink>,
}

/// Filters `items` for `role`, recursing into children. A hidden item hides
/// its whole subtree; a visible parent stays even if every child is hidden.
pub fn render_items(items: &'static [NavItem], role: Role, tr: &Translator) -> Vec<NavLink> {
    items
        .iter()
        .filter(|item| is_visible(item, role))
        .map(|item| NavLink {
            key: item.key,
            title: tr.nav(item.key, item.literal),
            href: tr.locale.localize(item.path),
            icon: item.icon,
            children: render_items(item.children, role, tr),
        })
        .collect()
}

/// Tabs of the profile section: the profile entry's children for `role`.
pub fn profile_tabs(role: Role, tr: &Translator) -> Vec<NavLink> {
    MAIN_NAV
        .iter()
        .find(|item| item.key == "profile")
        .map(|item| render_items(item.children, role, tr))
        .unwrap_or_default()
}

pub fn sidebar(role: Role, view: ViewMode, tr: &Translator) -> Sidebar {
    let admin = match view {
        ViewMode::Admin => {
            let items = render_items(ADMIN_NAV, role, tr);
            (!items.is_empty()).then(|| NavGroup {
                label: tr.nav("adminNavigation", "Administration"),
                items,
            })
        }
        ViewMode::User => None,
    };

    Sidebar {
        view,
        main: NavGroup {
            label: tr.nav("mainNavigation", "Main Navigation"),
            items: render_items(MAIN_NAV, role, tr),
        },
        admin,
        secondary: render_items(SECONDARY_NAV, role, tr),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
    pub is_current: bool,
}

/// Dictionary key of a path segment. Short segments are resolved against
/// their parent (`/admin/schools/manage` vs `/admin/events/manage`).
fn segment_key(parent: Option<&str>, segment: &str) -> Option<&'static str> {
    let key = match (parent, segment) {
        (Some("events"), "manage") => "manageEvents",
        (Some("schools"), "manage") => "manageSchools",
        (Some("applications"), "manage") => "manageApplications",
        (Some("applications"), "current") => "currentApplications",
        (Some("applications"), "past") => "pastApplications",
        (Some("events"), "current") => "currentEvents",
        (Some("events"), "past") => "pastEvents",
        (_, "dashboard") => "dashboard",
        (_, "events") => "events",
        (_, "current-events") => "currentEvents",
        (_, "past-events") => "pastEvents",
        (_, "upcoming") => "upcoming",
        (_, "applications") => "applications",
        (_, "current-applications") => "currentApplications",
        (_, "past-applications") => "pastApplications",
        (_, "profile") => "profile",
        (_, "personal") => "personalInfo",
        (_, "contact") => "contactDetails",
        (_, "address") => "address",
        (_, "education") => "education",
        (_, "preferences") => "preferences",
        (_, "teamer") => "teamerInfo",
        (_, "settings") => "settings",
        (_, "appearance") => "appearance",
        (_, "language") => "language",
        (_, "admin") => "admin",
        (_, "schools") => "adminSchools",
        (_, "manage-events") => "manageEvents",
        (_, "create-event") => "createEvent",
        (_, "analytics") => "eventAnalytics",
        (_, "manage-applications") => "manageApplications",
        (_, "compare") => "compareApplications",
        _ => return None,
    };
    Some(key)
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Breadcrumb trail for a path with the locale prefix already removed.
pub fn breadcrumbs(stripped_path: &str, locale: Locale, tr: &Translator) -> Vec<Breadcrumb> {
    let segments: Vec<&str> = stripped_path.split('/').filter(|s| !s.is_empty()).collect();
    let mut current = format!("/{}", locale.as_str());

    segments
        .iter()
        .enumerate()
        .map(|(idx, segment)| {
            current.push('/');
            current.push_str(segment);
            let parent = idx.checked_sub(1).map(|prev| segments[prev]);
            let label = segment_key(parent, segment)
                .and_then(|key| tr.lookup("navigation", key))
                .map(String::from)
                .unwrap_or_else(|| capitalize(segment));
            Breadcrumb {
                label,
                path: current.clone(),
                is_current: idx + 1 == segments.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(links: &[NavLink]) -> Vec<&'static str> {
        links.iter().map(|link| link.key).collect()
    }

    fn profile_children(links: &[NavLink]) -> Vec<&'static str> {
        links
            .iter()
            .find(|link| link.key == "profile")
            .map(|link| keys(&link.children))
            .unwrap_or_default()
    }

    #[test]
    fn teamer_items_hidden_from_users() {
        let tr = Translator::new(Locale::En);
        let links = render_items(MAIN_NAV, Role::User, &tr);
        assert!(!profile_children(&links).contains(&"teamerInfo"));
        assert!(profile_children(&links).contains(&"personalInfo"));

        let links = render_items(MAIN_NAV, Role::Teamer, &tr);
        assert!(profile_children(&links).contains(&"teamerInfo"));
    }

    #[test]
    fn admin_section_hidden_from_teamers() {
        let tr = Translator::new(Locale::En);
        assert!(render_items(ADMIN_NAV, Role::Teamer, &tr).is_empty());
        assert_eq!(
            keys(&render_items(ADMIN_NAV, Role::Admin, &tr)),
            vec!["adminEvents", "adminApplications", "adminSchools"]
        );
    }

    #[test]
    fn hidden_parent_hides_subtree() {
        static TREE: &[NavItem] = &[NavItem {
            key: "admin",
            literal: "Admin",
            path: "/admin",
            icon: "",
            required: Some(Role::Admin),
            children: &[leaf("events", "Events", "/admin/events")],
        }];
        let tr = Translator::new(Locale::En);
        assert!(render_items(TREE, Role::Teamer, &tr).is_empty());
    }

    #[test]
    fn view_mode_only_for_admins() {
        assert_eq!(ViewMode::resolve(Some("admin"), Role::Teamer), ViewMode::User);
        assert_eq!(ViewMode::resolve(None, Role::Admin), ViewMode::Admin);
        assert_eq!(ViewMode::resolve(Some("user"), Role::Admin), ViewMode::User);
    }

    #[test]
    fn sidebar_is_localized() {
        let tr = Translator::new(Locale::De);
        let bar = sidebar(Role::Admin, ViewMode::Admin, &tr);
        let events = bar.main.items.iter().find(|l| l.key == "events").unwrap();
        assert_eq!(events.title, "Veranstaltungen");
        assert_eq!(events.href, "/de/events");
        assert!(bar.admin.is_some());

        let bar = sidebar(Role::Admin, ViewMode::User, &tr);
        assert!(bar.admin.is_none());
    }

    #[test]
    fn breadcrumbs_map_segments() {
        let tr = Translator::new(Locale::En);
        let crumbs = breadcrumbs("/events/current-events", Locale::En, &tr);
        assert_eq!(
            crumbs,
            vec![
                Breadcrumb {
                    label: "Events".into(),
                    path: "/en/events".into(),
                    is_current: false
                },
                Breadcrumb {
                    label: "Current Events".into(),
                    path: "/en/events/current-events".into(),
                    is_current: true
                },
            ]
        );
    }

    #[test]
    fn unknown_segment_is_capitalized() {
        let tr = Translator::new(Locale::De);
        let crumbs = breadcrumbs("/settings/notifications", Locale::De, &tr);
        assert_eq!(crumbs[0].label, "Einstellungen");
        assert_eq!(crumbs[1].label, "Notifications");
        assert!(breadcrumbs("/", Locale::En, &tr).is_empty());
    }

    #[test]
    fn every_dashboard_crumb_is_translated() {
        let tr = Translator::new(Locale::De);
        for page in crate::pages::DASHBOARD_PAGES {
            let segments: Vec<&str> = page.path.split('/').filter(|s| !s.is_empty()).collect();
            for (idx, segment) in segments.iter().enumerate() {
                let parent = idx.checked_sub(1).map(|prev| segments[prev]);
                let key = segment_key(parent, segment)
                    .unwrap_or_else(|| panic!("{}: no key for `{segment}`", page.path));
                assert!(tr.lookup("navigation", key).is_some(), "{}: {key}", page.path);
            }
        }

        let crumbs = breadcrumbs("/admin/schools/manage", Locale::De, &tr);
        let labels: Vec<&str> = crumbs.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Verwaltung", "Schulverwaltung", "Schulen verwalten"]);
    }
}
