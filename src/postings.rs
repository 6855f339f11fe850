//! Merge-style set operations on sorted posting lists.
//!
//! The canonical form everywhere in this crate is ascending with no
//! repeats. `intersect` and `union` require canonical inputs and produce
//! canonical output.

use crate::models::DocId;

/// Sort and deduplicate a sequence of postings into canonical form.
pub fn sort_dedup(src: &[DocId]) -> Vec<DocId> {
    let mut postings = src.to_vec();
    postings.sort_unstable();
    postings.dedup();
    postings
}

/// Intersect two canonical posting lists with a linear two-pointer walk.
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let mut postings = Vec::with_capacity(a.len().min(b.len()));
    let (mut ia, mut ib) = (0, 0);
    while ia < a.len() && ib < b.len() {
        match a[ia].cmp(&b[ib]) {
            std::cmp::Ordering::Less => ia += 1,
            std::cmp::Ordering::Greater => ib += 1,
            std::cmp::Ordering::Equal => {
                postings.push(a[ia]);
                ia += 1;
                ib += 1;
            }
        }
    }

    postings
}

/// Unite two canonical posting lists with a linear merge.
pub fn union(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut postings = Vec::with_capacity(a.len() + b.len());
    let (mut ia, mut ib) = (0, 0);
    while ia < a.len() && ib < b.len() {
        match a[ia].cmp(&b[ib]) {
            std::cmp::Ordering::Less => {
                postings.push(a[ia]);
                ia += 1;
            }
            std::cmp::Ordering::Greater => {
                postings.push(b[ib]);
                ib += 1;
            }
            std::cmp::Ordering::Equal => {
                postings.push(a[ia]);
                ia += 1;
                ib += 1;
            }
        }
    }
    postings.extend_from_slice(&a[ia..]);
    postings.extend_from_slice(&b[ib..]);

    postings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_dedup() {
        assert_eq!(sort_dedup(&[5, 1, 3, 1, 5, 2]), vec![1, 2, 3, 5]);
        assert_eq!(sort_dedup(&[]), Vec::<DocId>::new());
        assert_eq!(sort_dedup(&[7]), vec![7]);
    }

    #[test]
    fn test_sort_dedup_idempotent() {
        let once = sort_dedup(&[9, 9, 4, 6, 4]);
        assert_eq!(sort_dedup(&once), once);
    }

    #[test]
    fn test_intersect_boundaries() {
        assert_eq!(intersect(&[2, 3, 5, 10], &[1, 2, 5, 11]), vec![2, 5]);
        assert_eq!(intersect(&[], &[1, 2, 3]), Vec::<DocId>::new());
        assert_eq!(intersect(&[1, 2, 3], &[]), Vec::<DocId>::new());
        assert_eq!(intersect(&[2, 4, 6], &[1, 3, 5]), Vec::<DocId>::new());
    }

    #[test]
    fn test_intersect_commutes() {
        let a = vec![1, 4, 6, 9];
        let b = vec![2, 4, 9, 12];
        assert_eq!(intersect(&a, &b), intersect(&b, &a));
    }

    #[test]
    fn test_union() {
        assert_eq!(union(&[1, 3, 5], &[2, 3, 6]), vec![1, 2, 3, 5, 6]);
        assert_eq!(union(&[], &[2, 3]), vec![2, 3]);
        assert_eq!(union(&[2, 3], &[]), vec![2, 3]);
        assert_eq!(union(&[1, 2], &[1, 2]), vec![1, 2]);
    }

    #[test]
    fn test_union_commutes_and_contains_both() {
        let a = vec![1, 5, 8];
        let b = vec![2, 5, 13];
        let u = union(&a, &b);
        assert_eq!(u, union(&b, &a));
        assert!(a.iter().all(|x| u.contains(x)));
        assert!(b.iter().all(|x| u.contains(x)));
    }
}
