use std::fmt::Display;

/// Filters that can be encoded as URL query parameters.
pub trait QueryPairs {
    /// Returns `(name, value)` pairs for every filter that is set.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

pub(super) fn push_pair<T: Display>(
    pairs: &mut Vec<(&'static str, String)>,
    name: &'static str,
    value: Option<T>,
) {
    if let Some(value) = value {
        pairs.push((name, value.to_string()));
    }
}

pub(super) fn matches_search(needle: &str, haystacks: &[&str]) -> bool {
    haystacks
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::{matches_search, push_pair};

    #[test]
    fn unset_values_are_skipped() {
        let mut pairs = Vec::new();
        push_pair(&mut pairs, "page", Some(2));
        push_pair::<u32>(&mut pairs, "limit", None);
        assert_eq!(pairs, vec![("page", "2".to_owned())]);
    }

    #[test]
    fn search_is_case_insensitive_over_any_field() {
        assert!(matches_search("mart", &["Sophie", "Martin"]));
        assert!(!matches_search("zoe", &["Sophie", "Martin"]));
    }
}
