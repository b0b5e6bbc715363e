use super::*;

fn store_with(names: &[&str]) -> BookmarkStore {
    let mut store = BookmarkStore::new();
    let mut camera = Camera::default();
    for (i, name) in names.iter().enumerate() {
        camera.jump_to(Vector2::from_f64(f64::from(u32::try_from(i).unwrap()), 0.0), &Scalar::one());
        store.add(&camera, Some(*name));
    }
    store
}

fn names(found: &[&Bookmark]) -> Vec<String> {
    found.iter().map(|b| b.name.clone()).collect()
}

// --- add ---

#[test]
fn add_captures_camera_view() {
    let mut camera = Camera::default();
    camera.jump_to(Vector2::from_f64(3.0, -1.0), &Scalar::parse("1e-40").unwrap());
    let mut store = BookmarkStore::new();
    let bookmark = store.add(&camera, Some("Deep")).clone();
    assert_eq!(bookmark.name, "Deep");
    assert_eq!(bookmark.pos, camera.pos);
    assert_eq!(bookmark.range, camera.range);
    assert!(bookmark.description.is_empty());
    assert!(bookmark.timestamp.parse::<i64>().unwrap() > 0);
    assert_eq!(bookmark.waypoint().range, camera.range);
}

#[test]
fn add_without_name_uses_default() {
    let mut store = BookmarkStore::new();
    let camera = Camera::default();
    store.add(&camera, None);
    store.add(&camera, Some("   "));
    assert_eq!(store.at(0).unwrap().name, "Bookmark 1");
    assert_eq!(store.at(1).unwrap().name, "Bookmark 2");
}

#[test]
fn ids_are_unique() {
    let store = store_with(&["a", "b"]);
    assert_ne!(store.at(0).unwrap().id, store.at(1).unwrap().id);
}

// --- edit / describe / remove ---

#[test]
fn edit_renames_only() {
    let mut store = store_with(&["a"]);
    let before = store.at(0).unwrap().clone();
    assert!(store.edit(&before.id, " Renamed "));
    let after = store.get(&before.id).unwrap();
    assert_eq!(after.name, "Renamed");
    assert_eq!(after.pos, before.pos);
    assert_eq!(after.range, before.range);
}

#[test]
fn describe_sets_description() {
    let mut store = store_with(&["a"]);
    let id = store.at(0).unwrap().id.clone();
    assert!(store.describe(&id, "the spiral arm"));
    assert_eq!(store.get(&id).unwrap().description, "the spiral arm");
}

#[test]
fn unknown_ids_are_ignored() {
    let mut store = store_with(&["a"]);
    assert!(!store.edit("missing", "x"));
    assert!(!store.describe("missing", "x"));
    assert!(store.remove("missing").is_none());
    assert_eq!(store.len(), 1);
    assert_eq!(store.at(0).unwrap().name, "a");
}

#[test]
fn remove_deletes_by_id() {
    let mut store = store_with(&["a", "b", "c"]);
    let id = store.at(1).unwrap().id.clone();
    assert_eq!(store.remove(&id).unwrap().name, "b");
    assert_eq!(store.len(), 2);
    assert!(store.index_of(&id).is_none());
    assert_eq!(store.at(1).unwrap().name, "c");
}

// --- reorder ---

#[test]
fn reorder_moves_forward_and_back() {
    let mut store = store_with(&["a", "b", "c", "d"]);
    assert!(store.reorder(0, 2));
    let order: Vec<_> = store.as_slice().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(order, ["b", "c", "a", "d"]);
    assert!(store.reorder(3, 0));
    let order: Vec<_> = store.as_slice().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(order, ["d", "b", "c", "a"]);
}

#[test]
fn reorder_out_of_range_is_ignored() {
    let mut store = store_with(&["a", "b"]);
    assert!(!store.reorder(0, 5));
    assert!(!store.reorder(7, 0));
    assert_eq!(store.at(0).unwrap().name, "a");
}

// --- search ---

#[test]
fn wildcard_prefix_search() {
    let store = store_with(&["Introduction", "Summary"]);
    assert_eq!(names(&store.search("intro*")), ["Introduction"]);
}

#[test]
fn search_is_case_insensitive_substring() {
    let store = store_with(&["Mandelbrot Valley", "Seahorse tail"]);
    assert_eq!(names(&store.search("VALLEY")), ["Mandelbrot Valley"]);
}

#[test]
fn tokens_are_anded() {
    let store = store_with(&["alpha beta", "alpha", "beta"]);
    assert_eq!(names(&store.search("alpha beta")), ["alpha beta"]);
    assert_eq!(names(&store.search("beta")), ["alpha beta", "beta"]);
}

#[test]
fn tokens_may_match_name_or_description() {
    let mut store = store_with(&["Spiral", "Cusp"]);
    let id = store.at(0).unwrap().id.clone();
    store.describe(&id, "deep inside the seahorse valley");
    assert_eq!(names(&store.search("spiral seahorse")), ["Spiral"]);
    assert!(store.search("cusp seahorse").is_empty());
}

#[test]
fn wildcard_in_the_middle() {
    let store = store_with(&["north tower", "north gate tower", "south tower"]);
    assert_eq!(names(&store.search("n*tower")), ["north tower", "north gate tower"]);
}

#[test]
fn regex_metacharacters_are_literal() {
    let store = store_with(&["f(x) = x^2", "fx"]);
    assert_eq!(names(&store.search("f(x)")), ["f(x) = x^2"]);
    assert!(store.search("a.b").is_empty());
}

#[test]
fn blank_query_matches_everything() {
    let store = store_with(&["a", "b"]);
    assert_eq!(store.search("   ").len(), 2);
}

#[test]
fn search_keeps_list_order() {
    let mut store = store_with(&["view one", "view two"]);
    store.reorder(1, 0);
    assert_eq!(names(&store.search("view")), ["view two", "view one"]);
}

// --- serde ---

#[test]
fn bookmark_json_round_trip_keeps_precision() {
    let mut camera = Camera::default();
    let pos = Vector2::new(Scalar::parse("0.100000000000000000000000000000000000000000000000001").unwrap(), Scalar::zero());
    camera.jump_to(pos, &Scalar::parse("1e-95").unwrap());
    let mut store = BookmarkStore::new();
    let bookmark = store.add(&camera, Some("precise")).clone();
    let json = serde_json::to_string(&bookmark).unwrap();
    let back: Bookmark = serde_json::from_str(&json).unwrap();
    assert_eq!(back, bookmark);
}
