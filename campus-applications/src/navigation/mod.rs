//! Navigation shell and the preferences it owns

pub mod links;
pub mod shell;
pub mod theme;

pub use links::{auth_actions, links_for, visible_links, AuthAction, NavLink};
pub use shell::{NavigationShell, SignupForm};
pub use theme::ThemePreference;
