//! Genre grouping of search results

use std::collections::HashMap;

use crate::types::SearchRecord;

/// All records sharing one genre, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreGroup<'a> {
    pub genre: &'a str,
    pub records: Vec<&'a SearchRecord>,
}

/// Partition `records` by genre.
///
/// Groups appear in first-seen genre order and records keep their arrival
/// order inside each group, so concatenating the groups yields a stable
/// reordering of the input.
pub fn group_by_genre(records: &[SearchRecord]) -> Vec<GenreGroup<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GenreGroup<'_>> = Vec::new();

    for rec in records {
        let slot = *index.entry(rec.genre_name.as_str()).or_insert_with(|| {
            groups.push(GenreGroup { genre: rec.genre_name.as_str(), records: Vec::new() });
            groups.len() - 1
        });
        groups[slot].records.push(rec);
    }

    groups
}

/// Return the record shown as number `n` (1-based) when records are listed
/// group by group.
pub fn nth_in_display_order(records: &[SearchRecord], n: usize) -> Option<&SearchRecord> {
    if n == 0 {
        return None;
    }
    group_by_genre(records)
        .into_iter()
        .flat_map(|g| g.records)
        .nth(n - 1)
}
