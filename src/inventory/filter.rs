//! Search filtering over the in-memory item list

use super::repo::Item;

/// Items whose name contains `query` as a case-insensitive substring,
/// in their original relative order. An empty query keeps everything.
/// Pure function; recomputed by the view on every list or query change.
pub fn filter_items(items: &[Item], query: &str) -> Vec<Item> {
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> Item {
        Item {
            name: name.to_string(),
            quantity: 1,
            image_url: String::new(),
        }
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let items = vec![item("banana"), item("Apple"), item("cherry")];
        assert_eq!(filter_items(&items, ""), items);
    }

    #[test]
    fn matches_are_case_insensitive() {
        let items = vec![item("Apple"), item("pineapple"), item("cherry")];
        let hits = filter_items(&items, "APPLE");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Apple");
        assert_eq!(hits[1].name, "pineapple");
    }

    #[test]
    fn no_match_yields_empty() {
        let items = vec![item("apple")];
        assert!(filter_items(&items, "zucchini").is_empty());
    }

    #[test]
    fn inputs_are_left_untouched() {
        let items = vec![item("apple"), item("banana")];
        let before = items.clone();
        let _ = filter_items(&items, "an");
        assert_eq!(items, before);
    }
}
