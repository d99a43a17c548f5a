use std::collections::HashSet;

/// Jaccard similarity between two string sets
///
/// Items are compared trimmed and case-insensitively; duplicates collapse.
/// Returns 0.0 when either set is empty, since an empty list is a real
/// mismatch rather than a missing preference.
pub fn jaccard_similarity<A, B>(a: &[A], b: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let set_a = normalized_set(a);
    let set_b = normalized_set(b);

    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    intersection as f64 / union as f64
}

fn normalized_set<S: AsRef<str>>(items: &[S]) -> HashSet<String> {
    items
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
