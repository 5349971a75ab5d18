//! Merge record lists of several kinds into one timeline

use std::cmp::Ordering;

use super::ContentRecord;

/// Concatenate record lists and sort them newest first
///
/// Records with the same date are ordered by slug, then by kind.
pub fn aggregate<I>(lists: I) -> Vec<ContentRecord>
where
    I: IntoIterator<Item = Vec<ContentRecord>>,
{
    let mut records: Vec<ContentRecord> = lists.into_iter().flatten().collect();
    records.sort_by(newest_first);
    records
}

fn newest_first(a: &ContentRecord, b: &ContentRecord) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| a.slug.cmp(&b.slug))
        .then_with(|| a.kind.cmp(&b.kind))
}
