//! Integration tests for fuzzy product sorting.

use label_oxide::product::{ProductInfo, ProductRecord, ProductSet};
use label_oxide::sorting::{apply_order, summarize_groups, FuzzyProductSorter, ProductSorter};
use proptest::prelude::*;

fn family(family: &str) -> ProductRecord {
    ProductRecord::new(ProductInfo::new().with_family(family))
}

fn set(items: Vec<(&str, ProductRecord)>) -> ProductSet {
    items
        .into_iter()
        .map(|(id, record)| (id.to_string(), record))
        .collect()
}

fn position(order: &[String], id: &str) -> usize {
    order.iter().position(|x| x == id).unwrap()
}

fn screws_and_nut() -> ProductSet {
    set(vec![
        ("C", family("hex nut C")),
        ("B", family("M8x50 socket screw B")),
        ("A", family("M3x10 socket screw A")),
    ])
}

#[test]
fn test_screws_grouped_by_thread_size() {
    for sorter in [FuzzyProductSorter::catalog(), FuzzyProductSorter::clustered(0.3)] {
        let products = screws_and_nut();
        let groups = sorter.group(&products);
        let order = sorter.sort(&products);

        assert!(position(&order, "A") < position(&order, "B"), "{}", sorter.name());
        assert_eq!(position(&order, "B") - position(&order, "A"), 1);

        let nut_group = groups.iter().position(|g| g.ids.contains(&"C".to_string())).unwrap();
        let screw_group = groups.iter().position(|g| g.ids.contains(&"A".to_string())).unwrap();
        assert_ne!(nut_group, screw_group);
        assert_eq!(groups[nut_group].ids, vec!["C"]);
    }
}

#[test]
fn test_catalog_orders_categories_then_sizes() {
    let socket = |thread: &str| {
        ProductRecord::new(
            ProductInfo::new()
                .with_family("Alloy Steel Socket Head Screw")
                .with_spec("Thread Size", thread)
                .with_spec("Length", "1/2\""),
        )
    };
    let products = set(vec![
        (
            "washer",
            ProductRecord::new(
                ProductInfo::new()
                    .with_family("Zinc-Plated Steel Washer")
                    .with_spec("Washer Type", "Flat"),
            ),
        ),
        ("nut", family("Steel Hex Nut")),
        ("quarter", socket("1/4\"-20")),
        ("m5", socket("M5 x 0.8 mm")),
        ("ten", socket("10-24")),
    ]);

    let sorter = FuzzyProductSorter::catalog();
    assert_eq!(sorter.sort(&products), vec!["ten", "m5", "quarter", "nut", "washer"]);

    let labels: Vec<String> = sorter.group(&products).into_iter().map(|g| g.label).collect();
    assert_eq!(labels, vec!["socket_screws", "hex_nuts", "flat_washers"]);
}

#[test]
fn test_catalog_material_then_length() {
    let screw = |family: &str, length: &str| {
        ProductRecord::new(
            ProductInfo::new()
                .with_family(family)
                .with_spec("Thread Size", "M4")
                .with_spec("Length", length),
        )
    };
    let products = set(vec![
        ("alloy-long", screw("Alloy Steel Socket Head Screw", "20 mm")),
        ("alloy-short", screw("Alloy Steel Socket Head Screw", "8 mm")),
        ("stainless", screw("18-8 Stainless Steel Socket Head Screw", "30 mm")),
    ]);
    assert_eq!(
        FuzzyProductSorter::catalog().sort(&products),
        vec!["stainless", "alloy-short", "alloy-long"]
    );
}

#[test]
fn test_catalog_ignores_input_order() {
    let products = screws_and_nut();
    let reversed: ProductSet = products
        .iter()
        .rev()
        .map(|(id, record)| (id.clone(), record.clone()))
        .collect();
    let sorter = FuzzyProductSorter::catalog();
    assert_eq!(sorter.sort(&products), sorter.sort(&reversed));
}

#[test]
fn test_sorted_batch_and_summary() {
    let products = screws_and_nut();
    let sorter = FuzzyProductSorter::catalog();
    let sorted = apply_order(&products, &sorter.sort(&products));
    let ids: Vec<&String> = sorted.keys().collect();
    assert_eq!(ids, vec!["A", "B", "C"]);

    let summary = summarize_groups(&sorter.group(&products), &products);
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].products, vec!["A", "B"]);
    assert_eq!(summary[1].family, "hex nut C");
}

const FAMILIES: &[&str] = &[
    "Alloy Steel Socket Head Screw",
    "18-8 Stainless Steel Hex Nut",
    "Nylon-Insert Locknut",
    "Zinc-Plated Steel Flat Washer",
    "M6x20 Button Head Screw",
    "Brass Threaded Rod",
    "Dowel Pin",
    "Widget",
    "",
];

fn batch() -> impl Strategy<Value = ProductSet> {
    prop::collection::vec(0..FAMILIES.len(), 0..12).prop_map(|picks| {
        picks
            .into_iter()
            .enumerate()
            .map(|(i, pick)| (format!("P{:02}", i), family(FAMILIES[pick])))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_sort_is_a_permutation(products in batch(), clustered in any::<bool>()) {
        let sorter = if clustered {
            FuzzyProductSorter::clustered(0.3)
        } else {
            FuzzyProductSorter::catalog()
        };
        let mut order = sorter.sort(&products);
        let mut ids: Vec<String> = products.keys().cloned().collect();
        order.sort();
        ids.sort();
        prop_assert_eq!(order, ids);
    }

    #[test]
    fn prop_sort_is_deterministic(products in batch()) {
        for sorter in [FuzzyProductSorter::catalog(), FuzzyProductSorter::clustered(0.5)] {
            prop_assert_eq!(sorter.sort(&products), sorter.sort(&products));
        }
    }
}
