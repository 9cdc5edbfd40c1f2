//! Navigation menu assembly.

use folio_config::MenuItem;

use crate::File;

/// Add a leaf entry for `file` to the menu.
///
/// The entry goes to the top level when the file names no group, otherwise
/// into the top-level group with that name. Returns `false` (and drops the
/// entry) when no such group exists.
pub fn append_to_menu(file: &File, menu: &mut Vec<MenuItem>) -> bool {
    let entry = MenuItem::leaf(&file.name, &file.title, &file.path);

    if file.menu_group.is_empty() {
        menu.push(entry);
        return true;
    }

    match menu
        .iter_mut()
        .find(|item| item.group && item.name == file.menu_group)
    {
        Some(group) => {
            group.items.push(entry);
            true
        }
        None => {
            tracing::warn!(
                page = %file.name,
                group = %file.menu_group,
                "Menu group not found, page left out of the menu"
            );
            false
        }
    }
}

/// Mark the entries linking to `current_link` as active, clearing the rest.
///
/// Group headings are never active themselves.
pub fn mark_active(menu: &mut [MenuItem], current_link: &str) {
    for item in menu {
        if item.group {
            item.active = false;
            for child in &mut item.items {
                child.active = child.link == current_link;
            }
        } else {
            item.active = item.link == current_link;
        }
    }
}

/// Point every home link (`""` or `"/"`) at `base_url`.
///
/// Does nothing when `base_url` is empty.
pub fn normalize_home_links(menu: &mut [MenuItem], base_url: &str) {
    if base_url.is_empty() {
        return;
    }
    for item in menu {
        if item.group {
            normalize_home_links(&mut item.items, base_url);
        } else if item.links_home() {
            base_url.clone_into(&mut item.link);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn page(name: &str, path: &str, group: &str) -> File {
        File {
            name: name.to_owned(),
            title: name.to_uppercase(),
            path: path.to_owned(),
            menu_group: group.to_owned(),
            add_to_menu: true,
            ..File::default()
        }
    }

    fn sample_menu() -> Vec<MenuItem> {
        let mut guides = MenuItem::group("guides", "Guides");
        guides.items.push(MenuItem::leaf("install", "Install", "guides/install"));
        vec![
            MenuItem::leaf("home", "Home", "/"),
            guides,
            MenuItem::leaf("about", "About", "about"),
        ]
    }

    #[test]
    fn test_append_top_level() {
        let mut menu = Vec::new();

        assert!(append_to_menu(&page("faq", "faq", ""), &mut menu));

        assert_eq!(menu, vec![MenuItem::leaf("faq", "FAQ", "faq")]);
    }

    #[test]
    fn test_append_into_group() {
        let mut menu = sample_menu();

        assert!(append_to_menu(&page("usage", "guides/usage", "guides"), &mut menu));

        assert_eq!(menu.len(), 3);
        let links: Vec<_> = menu[1].items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(links, vec!["guides/install", "guides/usage"]);
    }

    #[test]
    fn test_append_unknown_group_drops_entry() {
        let mut menu = sample_menu();

        assert!(!append_to_menu(&page("x", "x", "missing"), &mut menu));

        assert_eq!(menu, sample_menu());
    }

    #[test]
    fn test_append_ignores_leaf_with_group_name() {
        let mut menu = vec![MenuItem::leaf("guides", "Guides", "guides")];

        assert!(!append_to_menu(&page("x", "x", "guides"), &mut menu));
    }

    #[test]
    fn test_mark_active_is_exclusive() {
        let mut menu = sample_menu();

        mark_active(&mut menu, "guides/install");
        mark_active(&mut menu, "about");

        let active: Vec<_> = menu
            .iter()
            .flat_map(|item| std::iter::once(item).chain(item.items.iter()))
            .filter(|item| item.active)
            .map(|item| item.link.as_str())
            .collect();
        assert_eq!(active, vec!["about"]);
    }

    #[test]
    fn test_mark_active_without_match_clears_all() {
        let mut menu = sample_menu();
        mark_active(&mut menu, "guides/install");

        mark_active(&mut menu, "nowhere");

        assert!(menu.iter().all(|item| !item.active));
        assert!(menu[1].items.iter().all(|item| !item.active));
    }

    #[test]
    fn test_group_heading_never_active() {
        let mut menu = sample_menu();
        menu[1].link = "guides/install".to_owned();

        mark_active(&mut menu, "guides/install");

        assert!(!menu[1].active);
        assert!(menu[1].items[0].active);
    }

    #[test]
    fn test_normalize_home_links() {
        let mut menu = sample_menu();
        menu[1].items.push(MenuItem::leaf("start", "Start", ""));

        normalize_home_links(&mut menu, "https://x.example");

        assert_eq!(menu[0].link, "https://x.example");
        assert_eq!(menu[1].items[1].link, "https://x.example");
        assert_eq!(menu[2].link, "about");
        assert_eq!(menu[1].link, "");
    }

    #[test]
    fn test_normalize_without_base_url_keeps_links() {
        let mut menu = sample_menu();

        normalize_home_links(&mut menu, "");

        assert_eq!(menu, sample_menu());
    }
}
