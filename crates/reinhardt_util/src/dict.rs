//! Ordered-map helpers.

use std::collections::BTreeMap;

/// Move the value stored under `old_key` to `new_key`.
///
/// Returns `true` when `old_key` was present. An existing value under
/// `new_key` is overwritten.
pub fn replace_key<K: Ord, V>(old_key: &K, new_key: K, dict: &mut BTreeMap<K, V>) -> bool {
    let Some(value) = dict.remove(old_key) else {
        return false;
    };
    dict.insert(new_key, value);
    true
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::replace_key;

    #[test]
    fn replace_key_moves_present_values_only() {
        let mut dict = BTreeMap::from([("name", 1), ("email", 2)]);

        assert!(replace_key(&"name", "full_name", &mut dict));
        assert_eq!(dict, BTreeMap::from([("full_name", 1), ("email", 2)]));

        assert!(!replace_key(&"missing", "other", &mut dict));
        assert_eq!(dict.len(), 2);

        assert!(replace_key(&"email", "full_name", &mut dict));
        assert_eq!(dict, BTreeMap::from([("full_name", 2)]));
    }
}
