//! Permission matching and navigation-tree filtering.
//!
//! Permission strings are dot-delimited capability paths such as
//! `admin.user.user.update`. A granted permission satisfies a required one
//! when the two are equal or when one is a dot-bounded ancestor of the
//! other, so `admin.user` satisfies `admin.user.update` but `admin.use`
//! does not.
//!
//! Every permission check in the crate (side navigation, search palette and
//! route guard) goes through [`has_permission`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A top-level navigation group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    /// Stable identifier
    pub id: String,

    /// Localized display title
    pub title: String,

    /// Icon name, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Whether the group is expanded
    #[serde(default)]
    pub is_open: bool,

    /// Permissions of which at least one must be granted; empty means unrestricted
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Child entries. `None` and `Some(vec![])` are different: a group that
    /// declares children but ends up with none visible is hidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NavigationChild>>,
}

/// A leaf entry that navigates somewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationChild {
    pub id: String,
    pub title: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

/// Check whether two permission strings match.
///
/// # Arguments
/// * `granted` - A permission issued to the session
/// * `required` - A permission demanded by a screen or menu entry
///
/// # Returns
/// * `bool` - True when equal or when one is a dot-bounded prefix of the other
///
/// # Examples
/// ```
/// use admin_console::permission::permission_matches;
///
/// assert!(permission_matches("admin.user", "admin.user.update"));
/// assert!(permission_matches("admin.user.update", "admin.user"));
/// assert!(!permission_matches("admin.use", "admin.user.update"));
/// ```
pub fn permission_matches(granted: &str, required: &str) -> bool {
    granted == required || is_ancestor(granted, required) || is_ancestor(required, granted)
}

fn is_ancestor(ancestor: &str, descendant: &str) -> bool {
    !ancestor.is_empty()
        && descendant
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// Check a requirement list against the granted permissions.
///
/// An empty requirement is always satisfied. Otherwise at least one required
/// permission has to match at least one granted permission.
///
/// # Arguments
/// * `granted` - Permissions of the current session
/// * `required` - Permissions demanded by the entry
///
/// # Returns
/// * `bool` - True if the entry may be shown
pub fn has_permission<G, R>(granted: &[G], required: &[R]) -> bool
where
    G: AsRef<str>,
    R: AsRef<str>,
{
    if required.is_empty() {
        return true;
    }

    required.iter().any(|req| {
        granted
            .iter()
            .any(|perm| permission_matches(perm.as_ref(), req.as_ref()))
    })
}

fn child_visible<G: AsRef<str>>(granted: &[G], child: &NavigationChild) -> bool {
    match &child.permissions {
        Some(required) => has_permission(granted, required),
        None => true,
    }
}

/// Compute the part of a navigation tree that the session may see.
///
/// Items whose own requirement fails are dropped. Children of kept items are
/// filtered independently, and an item that declared children but has none
/// left is dropped as well. Order is preserved.
///
/// # Arguments
/// * `items` - The full navigation tree
/// * `granted` - Permissions of the current session
///
/// # Returns
/// * `Vec<NavigationItem>` - The visible subset
pub fn filter_tree<G: AsRef<str>>(items: &[NavigationItem], granted: &[G]) -> Vec<NavigationItem> {
    items
        .iter()
        .filter(|item| has_permission(granted, &item.permissions))
        .filter_map(|item| {
            let children = item.children.as_ref().map(|children| {
                children
                    .iter()
                    .filter(|child| child_visible(granted, child))
                    .cloned()
                    .collect::<Vec<_>>()
            });

            if matches!(&children, Some(kept) if kept.is_empty()) {
                return None;
            }

            Some(NavigationItem {
                children,
                ..item.clone()
            })
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    id: String,
    title: String,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    is_open: bool,
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    children: Option<Vec<Value>>,
}

/// Filter a navigation tree that arrives as untyped JSON.
///
/// Fails closed: if either argument is not an array the result is empty.
/// Non-string entries in `granted` are ignored. An item or child that does
/// not decode is denied on its own without affecting its siblings.
///
/// # Arguments
/// * `items` - JSON array of navigation items
/// * `granted` - JSON array of granted permission strings
///
/// # Returns
/// * `Vec<NavigationItem>` - The visible subset, in input order
pub fn filter_tree_json(items: &Value, granted: &Value) -> Vec<NavigationItem> {
    let (Some(items), Some(granted)) = (items.as_array(), granted.as_array()) else {
        log::warn!("navigation filter received non-list input; showing nothing");
        return Vec::new();
    };

    let granted: Vec<&str> = granted.iter().filter_map(Value::as_str).collect();

    let decoded: Vec<NavigationItem> = items
        .iter()
        .filter_map(|raw| match serde_json::from_value::<RawItem>(raw.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                log::debug!("denying malformed navigation item: {}", e);
                None
            }
        })
        .map(|raw| NavigationItem {
            id: raw.id,
            title: raw.title,
            icon: raw.icon,
            is_open: raw.is_open,
            permissions: raw.permissions,
            children: raw.children.map(|children| {
                children
                    .into_iter()
                    .filter_map(|child| match serde_json::from_value::<NavigationChild>(child) {
                        Ok(child) => Some(child),
                        Err(e) => {
                            log::debug!("denying malformed navigation child: {}", e);
                            None
                        }
                    })
                    .collect()
            }),
        })
        .collect();

    filter_tree(&decoded, &granted)
}
