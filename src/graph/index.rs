use std::collections::HashMap;

use crate::database::models::Identified;

/// Map each row's id to the row. Duplicate ids keep the last row seen.
pub fn index_by_id<T: Identified>(rows: &[T]) -> HashMap<i64, &T> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.insert(row.id(), row);
    }
    index
}

/// Group child rows under their parent id, preserving input order within each group.
/// Rows whose key is null are left out.
pub fn group_by<T, F>(rows: &[T], parent_id: F) -> HashMap<i64, Vec<&T>>
where
    F: Fn(&T) -> Option<i64>,
{
    let mut groups: HashMap<i64, Vec<&T>> = HashMap::new();
    for row in rows {
        if let Some(id) = parent_id(row) {
            groups.entry(id).or_default().push(row);
        }
    }
    groups
}
