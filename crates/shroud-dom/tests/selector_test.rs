use shroud_dom::selector::{Combinator, parse};
use shroud_dom::{DomSnapshot, SnapshotBuilder, match_count, matches, query_all};

/// A small admin-ish page: menu with a submenu, a content area with
/// repeated cards, one form field.
fn fixture() -> DomSnapshot {
    let mut b = SnapshotBuilder::new("https://example.test/admin.php", "Admin");
    let html = b.element(None, "html", &[]);
    let body = b.element(Some(html), "body", &[]);

    let menu = b.element(Some(body), "ul", &[("id", "sidemenu")]);
    let entry = b.element(Some(menu), "li", &[("id", "menu-posts"), ("class", "menu-item")]);
    let link = b.element(Some(entry), "a", &[("href", "admin.php?page=posts")]);
    b.text(link, "Posts");
    let sub = b.element(Some(entry), "ul", &[("class", "submenu")]);
    let sub_li = b.element(Some(sub), "li", &[]);
    let sub_link = b.element(Some(sub_li), "a", &[("href", "admin.php?page=posts-new")]);
    b.text(sub_link, "Add New");

    let content = b.element(Some(body), "div", &[("id", "content")]);
    let card1 = b.element(Some(content), "div", &[("class", "card featured")]);
    let card2 = b.element(Some(content), "div", &[("class", "card")]);
    b.text(card1, "First card");
    b.text(card2, "Second card");
    let input = b.element(Some(content), "input", &[("name", "s"), ("type", "text")]);
    let _ = input;

    b.finish()
}

#[test]
fn id_selector_matches_one_node() {
    let snap = fixture();
    let sel = parse("#sidemenu").expect("parse");
    assert_eq!(query_all(&snap, &sel), vec![2]);
}

#[test]
fn class_combination_narrows_matches() {
    let snap = fixture();
    let card = parse(".card").expect("parse");
    assert_eq!(match_count(&snap, &card), 2);
    let featured = parse(".card.featured").expect("parse");
    assert_eq!(query_all(&snap, &featured), vec![9]);
}

#[test]
fn attribute_selectors_support_exact_and_substring() {
    let snap = fixture();
    let exact = parse("a[href=\"admin.php?page=posts-new\"]").expect("parse");
    assert_eq!(query_all(&snap, &exact), vec![7]);

    // substring form matches both anchors
    let loose = parse("a[href*=\"page=posts\"]").expect("parse");
    assert_eq!(match_count(&snap, &loose), 2);

    let named = parse("input[name=\"s\"]").expect("parse");
    assert_eq!(match_count(&snap, &named), 1);
}

#[test]
fn descendant_and_child_combinators() {
    let snap = fixture();
    let scoped = parse("#sidemenu .submenu a").expect("parse");
    assert_eq!(query_all(&snap, &scoped), vec![7]);

    let child = parse("#content > div").expect("parse");
    assert_eq!(match_count(&snap, &child), 2);

    // the submenu anchor is not a direct child of the menu entry
    let direct = parse("#menu-posts > a").expect("parse");
    assert_eq!(query_all(&snap, &direct), vec![4]);
}

#[test]
fn nth_of_type_disambiguates_siblings() {
    let snap = fixture();
    let second = parse("#content div:nth-of-type(2)").expect("parse");
    assert_eq!(query_all(&snap, &second), vec![10]);
    assert!(!matches(&snap, 9, &second));
}

#[test]
fn selector_lists_union_matches() {
    let snap = fixture();
    let list = parse("#sidemenu, .card.featured").expect("parse");
    assert_eq!(query_all(&snap, &list), vec![2, 9]);
}

#[test]
fn escaped_identifiers_round_trip() {
    let mut b = SnapshotBuilder::new("https://example.test/", "Escapes");
    let html = b.element(None, "html", &[]);
    let body = b.element(Some(html), "body", &[]);
    let odd = b.element(Some(body), "div", &[("id", "My \"Widget\"")]);
    let snap = b.finish();

    let sel = parse("#My\\ \\\"Widget\\\"").expect("escaped id parses");
    assert_eq!(query_all(&snap, &sel), vec![odd]);
}

#[test]
fn combinator_kinds_are_preserved() {
    let list = parse("ul > li a").expect("parse");
    let complex = &list.selectors[0];
    assert_eq!(
        complex.combinators,
        vec![Combinator::Child, Combinator::Descendant]
    );
    assert_eq!(complex.compounds.len(), 3);
}

#[test]
fn malformed_selectors_are_rejected() {
    assert!(parse("").is_err());
    assert!(parse("   ").is_err());
    assert!(parse("div[unclosed").is_err());
    assert!(parse("..double").is_err());
}
