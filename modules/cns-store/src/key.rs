//! Key splitting and the wildcard filter.
//!
//! The schema (spec §3) fixes what each positional segment means. Naming the
//! positions here (instead of scattering `parts[6]` through the engine) is
//! the one bit of extra structure spec §9 suggests without going as far as a
//! segment trie.

use std::collections::HashMap;

use regex::RegexBuilder;

/// Fixed positions in a `cns/...` key, per spec §3/§4.3. Not every key uses
/// every position — e.g. a network's `name` key only goes to `NETWORK`.
pub mod pos {
    pub const ROOT: usize = 0;
    pub const NETWORK: usize = 1;
    /// Second-level discriminator: `name`, `orchestrator`, `profiles`, `nodes`.
    pub const CATEGORY: usize = 2;
    pub const NODE: usize = 3;
    pub const CONTEXTS_LITERAL: usize = 4;
    pub const CONTEXT: usize = 5;
    pub const ROLE: usize = 6;
    pub const PROFILE: usize = 7;
    /// `version`, `scope`, `properties`, or `connections`.
    pub const CAPABILITY_SUB: usize = 8;
    /// A property name, or a connection id.
    pub const NAME_OR_ID: usize = 9;
    /// `properties`, when `CAPABILITY_SUB` was `connections`.
    pub const CONNECTION_SUB: usize = 10;
    /// The connection-level property name.
    pub const CONN_PROPERTY: usize = 11;
}

pub const ROOT_SEGMENT: &str = "cns";

/// Split a key on `/` into its segments.
pub fn split(key: &str) -> Vec<&str> {
    key.split('/').collect()
}

/// Join segments back into a `/`-delimited key.
pub fn join(parts: &[&str]) -> String {
    parts.join("/")
}

/// `parts.get(i)`, the way the engine references segments by position.
pub fn segment<'a>(parts: &[&'a str], i: usize) -> Option<&'a str> {
    parts.get(i).copied()
}

/// Filter a map of keys to the subset whose key has the same segment count as
/// `pattern` and whose segments each match the corresponding pattern segment
/// under glob semantics: `*` expands to `.*` (matches within one segment
/// only — there is no recursive wildcard), every other regex metacharacter is
/// escaped, and the match is case-insensitive.
pub fn filter<'a>(map: &'a HashMap<String, String>, pattern: &str) -> HashMap<&'a str, &'a str> {
    let pattern_parts = split(pattern);
    let regexes: Vec<regex::Regex> = pattern_parts
        .iter()
        .map(|seg| compile_segment(seg))
        .collect();

    map.iter()
        .filter_map(|(k, v)| {
            let key_parts = split(k);
            if key_parts.len() != regexes.len() {
                return None;
            }
            let matches = key_parts
                .iter()
                .zip(regexes.iter())
                .all(|(seg, re)| re.is_match(seg));
            if matches {
                Some((k.as_str(), v.as_str()))
            } else {
                None
            }
        })
        .collect()
}

fn compile_segment(segment: &str) -> regex::Regex {
    // split('*') drops the wildcards themselves, so re-insert `.*` between
    // every piece except after the last one.
    let pieces: Vec<&str> = segment.split('*').collect();
    let mut pattern = String::from("^");
    for (i, piece) in pieces.iter().enumerate() {
        pattern.push_str(&regex::escape(piece));
        if i + 1 < pieces.len() {
            pattern.push_str(".*");
        }
    }
    pattern.push('$');
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .expect("segment pattern always compiles: literal pieces are escaped")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn split_and_join_roundtrip() {
        let key = "cns/net1/nodes/a/contexts/x/provider/p1/version";
        let parts = split(key);
        assert_eq!(parts.len(), 8);
        assert_eq!(join(&parts), key);
    }

    #[test]
    fn segment_by_position() {
        let parts = split("cns/net1/nodes/a/contexts/x/provider/p1/version");
        assert_eq!(segment(&parts, pos::ROOT), Some("cns"));
        assert_eq!(segment(&parts, pos::NETWORK), Some("net1"));
        assert_eq!(segment(&parts, pos::ROLE), Some("provider"));
        assert_eq!(segment(&parts, 99), None);
    }

    #[test]
    fn filter_requires_same_segment_count() {
        let m = map(&[
            ("cns/net1/name", "Net One"),
            ("cns/net1/nodes/a/name", "Node A"),
        ]);
        let matched = filter(&m, "cns/*/name");
        assert_eq!(matched.len(), 1);
        assert!(matched.contains_key("cns/net1/name"));
    }

    #[test]
    fn filter_wildcard_is_single_segment_and_case_insensitive() {
        let m = map(&[
            ("cns/NET1/nodes/a/name", "Node A"),
            ("cns/net2/nodes/b/name", "Node B"),
            ("cns/net1/nested/deep/name", "no match, wrong shape"),
        ]);
        let matched = filter(&m, "cns/*/nodes/*/name");
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn filter_escapes_regex_metacharacters() {
        let m = map(&[("cns/net.1/name", "literal dot"), ("cns/netX1/name", "not a match")]);
        let matched = filter(&m, "cns/net.1/name");
        assert_eq!(matched.len(), 1);
        assert!(matched.contains_key("cns/net.1/name"));
    }
}
