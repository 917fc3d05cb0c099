//! Side navigation: the menu tree, its open/active state, and the sidebar flags.

use crate::i18n::Catalog;
use crate::permission::{NavigationChild, NavigationItem, filter_tree};

pub const SUPER_ADMIN_USERS: &[&str] = &[
    "admin.user.user.index",
    "admin.user.user.store",
    "admin.user.user.show",
    "admin.user.user.update",
    "admin.user.user.delete",
    "admin.user.user.restore",
];

pub const SUPER_ADMIN_ROLES: &[&str] = &[
    "admin.user.role.index",
    "admin.user.role.store",
    "admin.user.role.show",
    "admin.user.role.update",
    "admin.user.role.delete",
    "admin.user.role.restore",
];

pub const SUPER_ADMIN_COMPANIES: &[&str] = &[
    "admin.company.company.index",
    "admin.company.company.store",
    "admin.company.company.show",
    "admin.company.company.update",
    "admin.company.company.delete",
];

pub const SUPER_ADMIN_CURRENCIES: &[&str] = &[
    "admin.system.currency.index",
    "admin.system.currency.store",
    "admin.system.currency.show",
    "admin.system.currency.update",
    "admin.system.currency.delete",
    "admin.system.currency.restore",
];

pub const ADMIN_COMPANY: &[&str] = &[
    "company.company.company.index",
    "company.company.company.store",
    "company.company.company.show",
    "company.company.company.update",
    "company.company.company.delete",
    "company.company.company.restore",
];

const LEAF_ICON: &str = "ri-checkbox-blank-circle-fill";

fn owned(perms: &[&str]) -> Vec<String> {
    perms.iter().map(|p| p.to_string()).collect()
}

fn group(id: &str, title_key: &str, icon: &str, perms: &[&str], catalog: &Catalog) -> NavigationItem {
    NavigationItem {
        id: id.to_string(),
        title: catalog.lookup(title_key).into_owned(),
        icon: Some(icon.to_string()),
        is_open: false,
        permissions: owned(perms),
        children: Some(Vec::new()),
    }
}

fn leaf(id: &str, title_key: &str, path: &str, perms: &[&str], catalog: &Catalog) -> NavigationChild {
    NavigationChild {
        id: id.to_string(),
        title: catalog.lookup(title_key).into_owned(),
        path: path.to_string(),
        icon: Some(LEAF_ICON.to_string()),
        permissions: Some(owned(perms)),
    }
}

fn with_children(mut item: NavigationItem, children: Vec<NavigationChild>) -> NavigationItem {
    item.children = Some(children);
    item
}

/// The dashboard menu with titles in the catalog's language.
pub fn default_navigation(catalog: &Catalog) -> Vec<NavigationItem> {
    vec![
        with_children(
            group("dashboard-1", "navBar.dashboard", "hugeicons:dashboard-browsing", SUPER_ADMIN_USERS, catalog),
            vec![leaf("analytics-1", "navBar.dashboard", "/app/", SUPER_ADMIN_USERS, catalog)],
        ),
        with_children(
            group("company-1", "navBar.company", "hugeicons:building-06", SUPER_ADMIN_COMPANIES, catalog),
            vec![leaf(
                "all-company-1",
                "navBar.company",
                "/app/super/admin/company",
                SUPER_ADMIN_COMPANIES,
                catalog,
            )],
        ),
        with_children(
            group("users-1", "navBar.users", "hugeicons:user-group-03", SUPER_ADMIN_USERS, catalog),
            vec![
                leaf("all-users-1", "navBar.users", "/app/super/admin/users", SUPER_ADMIN_USERS, catalog),
                leaf("user-roles-2", "navBar.roles", "/app/super/admin/roles", SUPER_ADMIN_ROLES, catalog),
            ],
        ),
        with_children(
            group("currency-1", "navBar.currency", "hugeicons:bitcoin-money-01", &[], catalog),
            vec![leaf(
                "all-currency-1",
                "navBar.currency",
                "/app/super/admin/currency",
                SUPER_ADMIN_CURRENCIES,
                catalog,
            )],
        ),
        with_children(
            group("admin-users-1", "navBar.users", "hugeicons:user-group-03", &[], catalog),
            vec![leaf("admin-all-users-1", "navBar.users", "/app/admin/users", ADMIN_COMPANY, catalog)],
        ),
        with_children(
            group("admin-company-1", "navBar.company", "hugeicons:building-06", &[], catalog),
            vec![leaf(
                "admin-all-company-1",
                "navBar.company",
                "/app/admin/company",
                ADMIN_COMPANY,
                catalog,
            )],
        ),
    ]
}

/// Layout flags of the sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidebarState {
    pub is_mini: bool,
    pub is_mobile_open: bool,
    pub active_id: String,
    pub is_mobile: bool,
}

impl SidebarState {
    pub fn set_mini(&mut self, mini: bool) {
        self.is_mini = mini;
    }

    pub fn set_mobile_open(&mut self, open: bool) {
        self.is_mobile_open = open;
    }

    pub fn set_active_id(&mut self, id: &str) {
        self.active_id = id.to_string();
    }

    /// Switching to a mobile layout also closes the drawer.
    pub fn set_is_mobile(&mut self, mobile: bool) {
        self.is_mobile = mobile;
        if mobile {
            self.is_mobile_open = false;
        }
    }

    pub fn toggle_mini(&mut self) {
        self.is_mini = !self.is_mini;
    }

    pub fn toggle_mobile_open(&mut self) {
        self.is_mobile_open = !self.is_mobile_open;
    }
}

/// Menu tree plus sidebar state.
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    items: Vec<NavigationItem>,
    pub sidebar: SidebarState,
    previous_active: String,
}

impl Navigation {
    pub fn new(items: Vec<NavigationItem>) -> Self {
        Navigation {
            items,
            ..Self::default()
        }
    }

    /// The full, unfiltered tree.
    pub fn items(&self) -> &[NavigationItem] {
        &self.items
    }

    /// What the session may see.
    pub fn visible<G: AsRef<str>>(&self, granted: &[G]) -> Vec<NavigationItem> {
        filter_tree(&self.items, granted)
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id && item.is_open)
    }

    fn open_only(&mut self, id: &str) {
        for item in &mut self.items {
            item.is_open = item.id == id;
        }
    }

    /// Follow the current location.
    ///
    /// If a visible child points at `path`, it becomes active and its parent
    /// becomes the only open group. Re-syncing to the same child is a no-op.
    ///
    /// # Returns
    /// * `Option<String>` - The newly activated child id
    pub fn sync_with_path<G: AsRef<str>>(&mut self, path: &str, granted: &[G]) -> Option<String> {
        let visible = self.visible(granted);
        let (child_id, parent_id) = visible.iter().rev().find_map(|item| {
            item.children
                .as_deref()?
                .iter()
                .rev()
                .find(|child| child.path == path)
                .map(|child| (child.id.clone(), item.id.clone()))
        })?;

        if child_id == self.previous_active {
            return None;
        }

        self.previous_active = child_id.clone();
        self.sidebar.set_active_id(&child_id);
        self.open_only(&parent_id);
        Some(child_id)
    }

    /// Expand or collapse a group; other groups close.
    ///
    /// In mini mode the sidebar expands instead and no group changes.
    pub fn toggle_item(&mut self, id: &str) {
        if self.sidebar.is_mini {
            self.sidebar.toggle_mini();
            return;
        }

        for item in &mut self.items {
            item.is_open = if item.id == id { !item.is_open } else { false };
        }
    }

    /// Open a group without touching the others.
    pub fn open(&mut self, id: &str) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.is_open = true;
        }
    }

    /// Activate a child; on mobile the drawer closes.
    ///
    /// # Returns
    /// * `String` - The path to navigate to
    pub fn select_child(&mut self, child_id: &str, path: &str) -> String {
        self.sidebar.set_active_id(child_id);
        if self.sidebar.is_mobile {
            self.sidebar.set_mobile_open(false);
        }
        path.to_string()
    }

    /// Whether the active child lives under `item`.
    pub fn has_active_child(&self, item: &NavigationItem) -> bool {
        item.children
            .as_deref()
            .is_some_and(|children| children.iter().any(|c| c.id == self.sidebar.active_id))
    }

    /// Replace the tree after a locale change, keeping which groups were open.
    pub fn rebuild(&mut self, items: Vec<NavigationItem>) {
        let open: Vec<String> = self
            .items
            .iter()
            .filter(|item| item.is_open)
            .map(|item| item.id.clone())
            .collect();

        self.items = items;
        for item in &mut self.items {
            item.is_open = open.contains(&item.id);
        }
    }

    /// Forget open groups and the active entry, as after logout.
    pub fn reset(&mut self) {
        for item in &mut self.items {
            item.is_open = false;
        }
        self.sidebar = SidebarState {
            is_mobile: self.sidebar.is_mobile,
            ..SidebarState::default()
        };
        self.previous_active.clear();
    }
}
