use confmigrate_types::{ConfigTree, DiffEntry, Value};
use tracing::debug;

/// Compare `current` against `reference`.
///
/// - nested trees on both sides are compared recursively;
/// - unequal leaves (type mismatches included) yield `Differs` with the current value;
/// - keys only in `reference` yield `Missing` with the reference value, once per
///   missing branch at its shallowest point;
/// - keys only in `current` are never reported.
///
/// All `Differs` entries come first, then all `Missing` entries, each in document
/// order. Callers should not rely on that ordering.
pub fn diff_trees(current: &ConfigTree, reference: &ConfigTree) -> Vec<DiffEntry> {
    let mut out = Vec::new();
    let mut path = Vec::new();

    collect_differs(current, reference, &mut path, &mut out);
    collect_missing(current, reference, &mut path, &mut out);

    debug!(
        entries = out.len(),
        missing = out.iter().filter(|e| e.is_missing()).count(),
        "diffed config trees"
    );
    out
}

fn collect_differs(
    current: &ConfigTree,
    reference: &ConfigTree,
    path: &mut Vec<String>,
    out: &mut Vec<DiffEntry>,
) {
    for (key, cur) in current.iter() {
        let Some(reference_value) = reference.get(key) else {
            continue;
        };

        path.push(key.clone());
        match (cur, reference_value) {
            (Value::Tree(c), Value::Tree(r)) => collect_differs(c, r, path, out),
            _ if cur != reference_value => out.push(DiffEntry::differs(path.clone(), cur.clone())),
            _ => {}
        }
        path.pop();
    }
}

fn collect_missing(
    current: &ConfigTree,
    reference: &ConfigTree,
    path: &mut Vec<String>,
    out: &mut Vec<DiffEntry>,
) {
    for (key, reference_value) in reference.iter() {
        path.push(key.clone());
        match (current.get(key), reference_value) {
            // Whole branch reported here; never descend into it.
            (None, _) => out.push(DiffEntry::missing(path.clone(), reference_value.clone())),
            (Some(Value::Tree(c)), Value::Tree(r)) => collect_missing(c, r, path, out),
            (Some(_), _) => {}
        }
        path.pop();
    }
}
