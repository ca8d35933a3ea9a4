// Trigger normalization: turns one row's raw trigger bag into the final
// deduplicated list that ends up in the document.
//
// Two passes. The first keeps the first occurrence of every non-blank
// trigger. The second walks that finished base list and appends the
// space-free form of each multi-word trigger, unless it is already there.
// The second pass never iterates the list it appends to.

use std::collections::HashSet;

/// Normalizes a trigger bag.
///
/// Base entries keep their first-seen order. Derived (space-removed) entries
/// come after all base entries, in the order of the trigger they came from.
/// The result never contains duplicates or blank strings.
pub fn normalize_triggers<I, S>(bag: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut base: Vec<String> = Vec::new();

    for trigger in bag {
        let trigger = trigger.as_ref();
        if trigger.trim().is_empty() {
            continue;
        }
        if seen.insert(trigger.to_string()) {
            base.push(trigger.to_string());
        }
    }

    let mut derived: Vec<String> = Vec::new();
    for trigger in &base {
        if !trigger.contains(' ') {
            continue;
        }
        let compact = trigger.replace(' ', "");
        if compact.is_empty() {
            continue;
        }
        if seen.insert(compact.clone()) {
            derived.push(compact);
        }
    }

    base.extend(derived);
    base
}
