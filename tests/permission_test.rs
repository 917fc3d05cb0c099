use admin_console::guard::{RouteDecision, RouteTable};
use admin_console::i18n::{Catalog, Locale};
use admin_console::models::User;
use admin_console::navigation::default_navigation;
use admin_console::permission::{filter_tree_json, has_permission};
use admin_console::{NavigationChild, NavigationItem, filter_tree};
use serde_json::json;

// Helper to build a child entry
fn child(id: &str, perms: Option<&[&str]>) -> NavigationChild {
    NavigationChild {
        id: id.to_string(),
        title: id.to_uppercase(),
        path: format!("/app/{}", id),
        icon: None,
        permissions: perms.map(|p| p.iter().map(|s| s.to_string()).collect()),
    }
}

// Helper to build a group
fn item(id: &str, perms: &[&str], children: Option<Vec<NavigationChild>>) -> NavigationItem {
    NavigationItem {
        id: id.to_string(),
        title: id.to_uppercase(),
        icon: None,
        is_open: false,
        permissions: perms.iter().map(|s| s.to_string()).collect(),
        children,
    }
}

fn sample_tree() -> Vec<NavigationItem> {
    vec![
        item(
            "users",
            &["admin.user"],
            Some(vec![
                child("list", Some(&["admin.user.user.index"])),
                child("roles", Some(&["admin.user.role.index"])),
            ]),
        ),
        item("open", &[], Some(vec![child("public", None)])),
        item("reports", &["admin.report"], None),
        item(
            "currency",
            &[],
            Some(vec![child("rates", Some(&["admin.system.currency.index"]))]),
        ),
        item("empty", &[], Some(Vec::new())),
    ]
}

fn ids(items: &[NavigationItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

fn user(kind: &str) -> User {
    serde_json::from_value(json!({ "id": 1, "email": "a@b.c", "type": kind })).unwrap()
}

#[test]
fn delimiter_bounded_matching() {
    assert!(has_permission(&["admin.user"], &["admin.user.update"]));
    println!("✓ admin.user grants admin.user.update");

    assert!(!has_permission(&["admin.use"], &["admin.user.update"]));
    println!("✓ admin.use does not grant admin.user.update");

    assert!(has_permission(&["admin.user.user.index"], &["admin.user"]));
    println!("✓ a descendant grant satisfies an ancestor requirement");

    assert!(has_permission(&["x", "admin.system"], &["nope", "admin.system.currency.index"]));
    println!("✓ any required vs any granted");
}

#[test]
fn empty_inputs() {
    let none: Vec<String> = Vec::new();
    assert!(filter_tree(&[], &["admin"]).is_empty());
    println!("✓ empty tree stays empty");

    let visible = filter_tree(&sample_tree(), &none);
    assert_eq!(ids(&visible), vec!["open"]);
    for item in &visible {
        assert!(item.permissions.is_empty());
    }
    println!("✓ no grants keeps only unrestricted items with visible children");
}

#[test]
fn children_filtered_independently() {
    let visible = filter_tree(&sample_tree(), &["admin.user.user"]);
    assert_eq!(ids(&visible), vec!["users", "open"]);

    let users = &visible[0];
    let children: Vec<&str> = users
        .children
        .as_ref()
        .unwrap()
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(children, vec!["list"]);
    println!("✓ roles child dropped, list child kept");
}

#[test]
fn group_without_children_field_is_kept() {
    let visible = filter_tree(&sample_tree(), &["admin.report"]);
    assert!(ids(&visible).contains(&"reports"));
    assert!(visible.iter().find(|i| i.id == "reports").unwrap().children.is_none());
    println!("✓ childless group survives on its own permission");
}

#[test]
fn never_returns_emptied_groups() {
    let grants: [&[&str]; 4] = [
        &[],
        &["admin"],
        &["admin.system.currency"],
        &["admin.user.role.index", "admin.report"],
    ];

    for granted in grants {
        let visible = filter_tree(&sample_tree(), granted);
        for item in &visible {
            if let Some(children) = &item.children {
                assert!(!children.is_empty(), "{} kept with no children for {:?}", item.id, granted);
            }
        }
        assert_eq!(filter_tree(&visible, granted), visible, "not idempotent for {:?}", granted);
    }
    println!("✓ no emptied groups, idempotent");
}

#[test]
fn order_is_preserved() {
    let visible = filter_tree(&sample_tree(), &["admin"]);
    assert_eq!(ids(&visible), vec!["users", "open", "reports", "currency"]);
    println!("✓ output order follows input order");
}

#[test]
fn json_inputs_fail_closed() {
    let tree = serde_json::to_value(sample_tree()).unwrap();

    assert!(filter_tree_json(&json!({"not": "a list"}), &json!(["admin"])).is_empty());
    assert!(filter_tree_json(&tree, &json!("admin")).is_empty());
    assert!(filter_tree_json(&tree, &json!(null)).is_empty());
    println!("✓ non-list input yields nothing");

    let typed = filter_tree(&sample_tree(), &["admin"]);
    assert_eq!(filter_tree_json(&tree, &json!(["admin", 42, null])), typed);
    println!("✓ JSON path agrees with typed path; junk grants ignored");
}

#[test]
fn malformed_entries_are_denied_individually() {
    let tree = json!([
        { "id": "broken", "title": 7, "permissions": [] },
        { "id": "mixed", "title": "Mixed", "permissions": [], "children": [
            { "id": "bad", "title": "Bad" },
            { "id": "good", "title": "Good", "path": "/app/good" }
        ]},
        { "id": "fine", "title": "Fine", "permissions": ["admin"] }
    ]);

    let visible = filter_tree_json(&tree, &json!(["admin.user"]));
    assert_eq!(ids(&visible), vec!["mixed", "fine"]);
    let children = visible[0].children.as_ref().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, "good");
    println!("✓ bad item and bad child denied, siblings unaffected");
}

#[test]
fn default_menu_per_role() {
    let menu = default_navigation(&Catalog::new(Locale::En));

    let super_admin = filter_tree(&menu, &["admin"]);
    assert_eq!(
        ids(&super_admin),
        vec!["dashboard-1", "company-1", "users-1", "currency-1"]
    );
    println!("✓ super-admin sees the /admin tree");

    let company_admin = filter_tree(&menu, &["company.company.company.index"]);
    assert_eq!(ids(&company_admin), vec!["admin-users-1", "admin-company-1"]);
    println!("✓ company admin sees the company tree");

    assert_eq!(super_admin[2].title, "Users");
    println!("✓ titles are localized");
}

#[test]
fn route_guard_decisions() {
    let routes = RouteTable::default();
    let admin = user("admin");
    let granted = ["admin.user.user.index"];

    assert_eq!(
        routes.check("/app/super/admin/users", true, None, &granted),
        Some(RouteDecision::Pending)
    );
    assert_eq!(
        routes.check("/app/super/admin/users", false, None, &granted),
        Some(RouteDecision::RedirectToLogin)
    );
    assert_eq!(
        routes.check("/app/super/admin/users", false, Some(&admin), &granted),
        Some(RouteDecision::Allowed)
    );
    assert_eq!(
        routes.check("/app/super/admin/currency", false, Some(&admin), &granted),
        Some(RouteDecision::Forbidden)
    );
    assert_eq!(
        routes.check("/app/admin/public", false, Some(&admin), &granted),
        Some(RouteDecision::Allowed)
    );
    assert_eq!(routes.check("/app", false, Some(&admin), &granted), Some(RouteDecision::Allowed));
    assert_eq!(routes.check("/nowhere", false, Some(&admin), &granted), None);
    println!("✓ pending, login, forbidden, allowed, unknown");

    // The guard uses the same hierarchical rule as the menu
    assert_eq!(
        routes.check("/app/super/admin/roles", false, Some(&admin), &["admin.user"]),
        Some(RouteDecision::Allowed)
    );
    assert_eq!(
        routes.check("/app/super/admin/roles", false, Some(&admin), &["admin.use"]),
        Some(RouteDecision::Forbidden)
    );
    println!("✓ guard and menu agree on matching");
}

#[test]
fn route_roles() {
    use admin_console::guard::Route;
    use admin_console::models::UserType;

    let route = Route {
        path: "/app/directors",
        roles: Some(vec![UserType::Director]),
        permissions: &[],
    };
    let none: [&str; 0] = [];
    assert_eq!(route.check(false, Some(&user("admin")), &none), RouteDecision::Forbidden);
    assert_eq!(route.check(false, Some(&user("director")), &none), RouteDecision::Allowed);
    println!("✓ role list restricts user types");
}
