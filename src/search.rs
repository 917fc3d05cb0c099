//! Quick-jump palette over the visible navigation entries.

use crate::navigation::Navigation;
use crate::permission::NavigationItem;

/// A navigable child together with the title of its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    pub id: String,
    pub title: String,
    pub path: String,
    pub parent_id: String,
    pub parent_title: String,
}

#[derive(Debug, Clone, Default)]
pub struct SearchPalette {
    entries: Vec<SearchEntry>,
    pub open: bool,
    pub query: String,
}

impl SearchPalette {
    /// Index the children of an already filtered tree.
    pub fn new(visible: &[NavigationItem]) -> Self {
        let entries = visible
            .iter()
            .flat_map(|parent| {
                parent.children.iter().flatten().map(move |child| SearchEntry {
                    id: child.id.clone(),
                    title: child.title.clone(),
                    path: child.path.clone(),
                    parent_id: parent.id.clone(),
                    parent_title: parent.title.clone(),
                })
            })
            .collect();

        SearchPalette {
            entries,
            open: false,
            query: String::new(),
        }
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Opening always starts from an empty query.
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
        if open {
            self.query.clear();
        }
    }

    /// Entries whose own title or group title contains `query`, ignoring case.
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&SearchEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|entry| {
                entry.title.to_lowercase().contains(&needle)
                    || entry.parent_title.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Results for the palette's current query.
    pub fn results(&self) -> Vec<&SearchEntry> {
        self.search(&self.query)
    }

    /// Jump to an entry: its group opens, it becomes active, and the palette
    /// and mobile drawer close.
    ///
    /// # Returns
    /// * `String` - The path to navigate to
    pub fn select(&mut self, entry: &SearchEntry, navigation: &mut Navigation) -> String {
        navigation.open(&entry.parent_id);
        let path = navigation.select_child(&entry.id, &entry.path);
        self.open = false;
        path
    }
}
