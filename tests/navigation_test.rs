mod common;

use admin_console::i18n::{Catalog, Locale};
use admin_console::navigation::{Navigation, default_navigation};
use admin_console::search::SearchPalette;
use admin_console::session::LOCALE_KEY;
use admin_console::{AdminShell, Config, MemoryStore, TokenStore};
use common::ScriptedTransport;
use std::sync::Arc;

const SUPER_ADMIN: &[&str] = &["admin"];

fn english_menu() -> Navigation {
    Navigation::new(default_navigation(&Catalog::new(Locale::En)))
}

fn open_ids(navigation: &Navigation) -> Vec<&str> {
    navigation
        .items()
        .iter()
        .filter(|item| item.is_open)
        .map(|item| item.id.as_str())
        .collect()
}

#[test]
fn path_sync_opens_only_the_parent() {
    let mut nav = english_menu();
    nav.toggle_item("company-1");

    let active = nav.sync_with_path("/app/super/admin/roles", SUPER_ADMIN);
    assert_eq!(active.as_deref(), Some("user-roles-2"));
    assert_eq!(nav.sidebar.active_id, "user-roles-2");
    assert_eq!(open_ids(&nav), vec!["users-1"]);
    println!("✓ roles route activates its child and opens Users only");

    nav.toggle_item("currency-1");
    assert_eq!(nav.sync_with_path("/app/super/admin/roles", SUPER_ADMIN), None);
    assert_eq!(open_ids(&nav), vec!["currency-1"]);
    println!("✓ re-sync to the same child changes nothing");

    assert!(nav.sync_with_path("/app/super/admin/users", SUPER_ADMIN).is_some());
    assert_eq!(nav.sidebar.active_id, "all-users-1");
    println!("✓ moving to a sibling re-activates");
}

#[test]
fn hidden_children_are_never_activated() {
    let mut nav = english_menu();

    assert_eq!(nav.sync_with_path("/app/admin/users", SUPER_ADMIN), None);
    assert!(nav.sidebar.active_id.is_empty());
    assert!(open_ids(&nav).is_empty());
    println!("✓ company-admin route ignored for a super-admin");

    assert_eq!(nav.sync_with_path("/app/unknown", SUPER_ADMIN), None);
    println!("✓ unknown path ignored");
}

#[test]
fn accordion_toggle() {
    let mut nav = english_menu();

    nav.toggle_item("users-1");
    assert_eq!(open_ids(&nav), vec!["users-1"]);

    nav.toggle_item("company-1");
    assert_eq!(open_ids(&nav), vec!["company-1"]);

    nav.toggle_item("company-1");
    assert!(open_ids(&nav).is_empty());
    println!("✓ at most one group open at a time");
}

#[test]
fn mini_sidebar_expands_instead_of_toggling() {
    let mut nav = english_menu();
    nav.open("users-1");
    nav.sidebar.set_mini(true);

    nav.toggle_item("company-1");
    assert!(!nav.sidebar.is_mini);
    assert_eq!(open_ids(&nav), vec!["users-1"]);
    println!("✓ click in mini mode only leaves mini mode");

    nav.sidebar.toggle_mini();
    assert!(nav.sidebar.is_mini);
}

#[test]
fn mobile_drawer_closes_on_selection() {
    let mut nav = english_menu();
    nav.sidebar.set_mobile_open(true);
    nav.sidebar.set_is_mobile(true);
    assert!(!nav.sidebar.is_mobile_open);
    println!("✓ switching to mobile closes the drawer");

    nav.sidebar.toggle_mobile_open();
    let path = nav.select_child("all-currency-1", "/app/super/admin/currency");
    assert_eq!(path, "/app/super/admin/currency");
    assert!(!nav.sidebar.is_mobile_open);

    let currency = nav.items().iter().find(|i| i.id == "currency-1").unwrap().clone();
    let users = nav.items().iter().find(|i| i.id == "users-1").unwrap().clone();
    assert!(nav.has_active_child(&currency));
    assert!(!nav.has_active_child(&users));
    println!("✓ selecting a child on mobile closes the drawer and marks its group");
}

#[test]
fn reset_forgets_state_but_keeps_layout() {
    let mut nav = english_menu();
    nav.sidebar.set_is_mobile(true);
    nav.sync_with_path("/app/super/admin/company", SUPER_ADMIN);

    nav.reset();
    assert!(open_ids(&nav).is_empty());
    assert!(nav.sidebar.active_id.is_empty());
    assert!(nav.sidebar.is_mobile);

    assert_eq!(
        nav.sync_with_path("/app/super/admin/company", SUPER_ADMIN).as_deref(),
        Some("all-company-1")
    );
    println!("✓ after reset the same path syncs again");
}

#[test]
fn search_over_visible_entries() {
    let nav = english_menu();
    let mut palette = SearchPalette::new(&nav.visible(SUPER_ADMIN));

    let hits: Vec<&str> = palette.search("ROLES").into_iter().map(|e| e.id.as_str()).collect();
    assert_eq!(hits, vec!["user-roles-2"]);

    let hits: Vec<&str> = palette.search("users").into_iter().map(|e| e.id.as_str()).collect();
    assert_eq!(hits, vec!["all-users-1", "user-roles-2"]);
    println!("✓ matches child titles and group titles, case-insensitively");

    assert!(palette.search("   ").is_empty());
    assert!(palette.search("nothing like this").is_empty());
    println!("✓ blank and unmatched queries return nothing");

    assert!(palette.entries().iter().all(|e| !e.path.starts_with("/app/admin/")));
    println!("✓ hidden company-admin entries are not indexed");

    palette.query = "curr".to_string();
    assert_eq!(palette.results().len(), 1);
    palette.set_open(true);
    assert!(palette.query.is_empty());
    println!("✓ opening the palette clears the query");
}

#[test]
fn search_selection_opens_parent_and_closes_overlays() {
    let mut nav = english_menu();
    nav.sidebar.set_is_mobile(true);
    nav.sidebar.set_mobile_open(true);

    let mut palette = SearchPalette::new(&nav.visible(SUPER_ADMIN));
    palette.set_open(true);

    let entry = palette.search("roles")[0].clone();
    let path = palette.select(&entry, &mut nav);

    assert_eq!(path, "/app/super/admin/roles");
    assert!(nav.is_open("users-1"));
    assert_eq!(nav.sidebar.active_id, "user-roles-2");
    assert!(!palette.open);
    assert!(!nav.sidebar.is_mobile_open);
    println!("✓ jump opens the group, activates the entry, closes palette and drawer");
}

#[test]
fn locale_change_rebuilds_titles() {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(ScriptedTransport::default());
    let mut shell = AdminShell::new(Config::default(), store.clone(), transport).unwrap();

    assert_eq!(shell.locale(), Locale::Uz);
    assert_eq!(store.get(LOCALE_KEY).as_deref(), Some("uz"));
    assert_eq!(shell.navigation().items()[2].title, "Foydalanuvchilar");
    println!("✓ first start defaults to Uzbek and persists it");

    shell.navigation_mut().toggle_item("users-1");
    let locale = shell.change_locale("ru-RU").unwrap();

    assert_eq!(locale, Locale::Ru);
    assert_eq!(store.get(LOCALE_KEY).as_deref(), Some("ru"));
    assert_eq!(shell.navigation().items()[2].title, "Пользователи");
    assert!(shell.navigation().is_open("users-1"));
    println!("✓ switch to Russian relabels the menu and keeps open groups");

    shell.change_locale("de").unwrap();
    assert_eq!(shell.locale(), Locale::Uz);
    println!("✓ unsupported tag falls back to Uzbek");
}

#[test]
fn configured_locale_overrides_stored_one() {
    let store = Arc::new(MemoryStore::new());
    store.set(LOCALE_KEY, "ru").unwrap();

    let config = Config {
        locale: Some("en".to_string()),
        ..Config::default()
    };
    let shell = AdminShell::new(config, store.clone(), Arc::new(ScriptedTransport::default())).unwrap();

    assert_eq!(shell.locale(), Locale::En);
    assert_eq!(store.get(LOCALE_KEY).as_deref(), Some("en"));
    assert_eq!(shell.catalog().lookup("navBar.logout"), "Log out");
    println!("✓ configured locale wins and is persisted");
}
