// Read-only views over a loaded catalog

use std::collections::HashMap;
use super::CatalogRecord;

/// Records carrying `tag`, in catalog order
pub fn filter_by_tag<'a>(records: &'a [CatalogRecord], tag: &str) -> Vec<&'a CatalogRecord> {
    records
        .iter()
        .filter(|r| r.tags.iter().any(|t| t == tag))
        .collect()
}

/// Each distinct tag with its number of occurrences, in order of first appearance
pub fn tag_counts(records: &[CatalogRecord]) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for tag in records.iter().flat_map(|r| r.tags.iter()) {
        match index.get(tag.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(tag.as_str(), counts.len());
                counts.push((tag.clone(), 1));
            }
        }
    }

    counts
}
