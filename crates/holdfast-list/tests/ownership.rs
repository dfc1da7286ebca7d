//! Every list operation keeps element ownership balanced.

use holdfast_heap::HeapTracked;
use holdfast_list::{List, Text};
use holdfast_test_utils::fixtures::{strings, text_list, Tally};
use holdfast_test_utils::recorded_registry;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn scenario_a_b_c() {
    let (registry, reporter) = recorded_registry();
    let list = text_list(registry, &["a", "b", "c"]);

    assert_eq!(list.count(), 3);
    assert_eq!(list.get(0), "a");
    assert_eq!(list.get(10), "c");

    let subset = list.subset(2, 5).expect("range overlaps the list");
    assert_eq!(strings(&subset), ["b", "c"]);

    list.cut(2, 5);
    assert_eq!(strings(&list), ["b", "c"]);
    assert!(reporter.is_empty());
}

#[test]
fn releasing_every_list_frees_everything() {
    let (registry, reporter) = recorded_registry();
    let list = text_list(registry, &["a", "b", "c", "a"]);
    let copy = list.copy();
    let subset = list.subset(1, 2).expect("non-empty");
    let unique = list.remove_duplicates().expect("non-empty");

    for l in [&list, &copy, &subset, &unique] {
        let _ = l.retain();
    }
    for l in [&list, &copy, &subset, &unique] {
        let _ = l.release();
    }

    assert!(registry.is_empty(), "{}", registry.shutdown());
    assert!(reporter.is_empty());
}

#[test]
fn copy_owns_its_elements() {
    let (registry, reporter) = recorded_registry();
    let original = text_list(registry, &["x", "y"]);
    let copy = original.copy();

    let _ = original.retain();
    let _ = original.release();

    assert_eq!(strings(&copy), ["x", "y"]);
    for item in copy.to_vec() {
        assert_eq!(registry.ref_count(item.heap_ptr()), Some(1));
    }
    assert!(reporter.is_empty());
}

#[test]
fn marker_traffic_balances_through_mutations() {
    let (registry, _) = recorded_registry();
    let tally = Tally::new();
    let list = List::new_in(registry);
    for id in [5, 3, 9, 3] {
        list.append(tally.marker(id));
    }
    assert_eq!(tally.retains(), 4);

    list.insert(tally.marker(1), 2);
    list.prepend(tally.marker(0));
    list.set(tally.marker(7), 3, false);
    list.set(tally.marker(8), 7, true);
    assert_eq!(list.count(), 7);

    list.exchange(1, 9);
    list.reverse();
    list.sort();
    list.shuffle_with(1.0, &mut ChaCha8Rng::seed_from_u64(11));
    let outstanding = tally.outstanding();
    assert_eq!(outstanding, 7);

    list.remove_first();
    list.remove_last();
    list.remove_at(2);
    list.remove_at(0);
    list.remove_at(99);
    assert_eq!(tally.outstanding(), outstanding - 3);

    let unique = list.remove_duplicates().expect("non-empty");
    let subset = list.subset(2, 2).expect("non-empty");
    list.cut(2, 2);
    list.for_each(|_| true);
    list.remove_all();

    let _ = unique.retain();
    let _ = unique.release();
    let _ = subset.retain();
    let _ = subset.release();
    let _ = list.retain();
    let _ = list.release();

    assert_eq!(tally.outstanding(), 0);
    assert!(registry.is_empty());
}

#[test]
fn with_count_retains_fill_once_per_slot() {
    let (registry, _) = recorded_registry();
    let tally = Tally::new();
    let list = List::with_count_in(registry, 4, tally.marker(1));
    assert_eq!(tally.retains(), 4);
    let _ = list.retain();
    let _ = list.release();
    assert_eq!(tally.releases(), 4);
}

#[test]
fn nested_lists_free_bottom_up() {
    let (registry, reporter) = recorded_registry();
    let inner = text_list(registry, &["leaf"]);
    let outer: List<Option<List<Text>>> = List::new_in(registry);
    outer.append(Some(inner.clone()));
    outer.append(Some(inner));
    outer.append(None);

    let _ = outer.retain();
    let _ = outer.release();

    assert!(registry.is_empty());
    assert!(reporter.is_empty());
}

#[test]
fn list_summary_and_external_form() {
    let (registry, _) = recorded_registry();
    let list = text_list(registry, &["a", ""]);
    assert_eq!(
        list.summary(),
        "List containing 2 items: <ul>\n<li>a</li>\n<li>&nbsp;</li></ul>"
    );
    let text = list.to_external_form();
    assert_eq!(text, r#"["a",""]"#);
    let back: List<Text> = List::from_external_form_in(registry, &text).expect("valid json");
    assert_eq!(strings(&back), ["a", ""]);
}
