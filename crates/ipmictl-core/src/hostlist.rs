//! Host-set expressions (`node[01-04,07],admin1`)
//!
//! Items are separated by top-level commas. Each item is literal text
//! interleaved with bracket groups of `N`, `A-B` or `A-B/STEP` elements;
//! several groups expand as a cartesian product. Zero padding follows the
//! lower bound (`[01-10]` gives `01` .. `10`). Duplicates are dropped,
//! keeping the first occurrence.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::IpmiError;

/// Ordered set of unique host names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSet {
    nodes: Vec<String>,
}

impl NodeSet {
    /// Expand a host-set expression
    ///
    /// # Errors
    /// Returns `IpmiError::InvalidHostlist` for unbalanced brackets, empty or
    /// non-numeric range elements, reversed bounds and zero steps
    pub fn parse(expr: &str) -> Result<Self, IpmiError> {
        let invalid = |reason: String| IpmiError::InvalidHostlist {
            expr: expr.to_string(),
            reason,
        };

        let mut seen = HashSet::new();
        let mut nodes = Vec::new();

        for item in split_top_level(expr).map_err(invalid)? {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            for node in expand_item(item).map_err(invalid)? {
                if seen.insert(node.clone()) {
                    nodes.push(node);
                }
            }
        }

        Ok(Self { nodes })
    }

    /// Number of hosts
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate host names in expansion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    /// Host names as a slice
    pub fn as_slice(&self) -> &[String] {
        &self.nodes
    }
}

impl FromStr for NodeSet {
    type Err = IpmiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nodes.join(","))
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Split on commas outside brackets
fn split_top_level(expr: &str) -> Result<Vec<&str>, String> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in expr.char_indices() {
        match ch {
            '[' => {
                if depth > 0 {
                    return Err("nested '['".to_string());
                }
                depth += 1;
            }
            ']' => {
                if depth == 0 {
                    return Err("unbalanced ']'".to_string());
                }
                depth -= 1;
            }
            ',' if depth == 0 => {
                items.push(&expr[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err("unclosed '['".to_string());
    }
    items.push(&expr[start..]);

    Ok(items)
}

/// Expand one item, brackets already known to be balanced
fn expand_item(item: &str) -> Result<Vec<String>, String> {
    let mut acc = vec![String::new()];
    let mut rest = item;

    while !rest.is_empty() {
        let (literal, group, tail) = match rest.find('[') {
            Some(open) => {
                let close = rest[open..]
                    .find(']')
                    .map(|c| open + c)
                    .ok_or_else(|| "unclosed '['".to_string())?;
                (&rest[..open], Some(&rest[open + 1..close]), &rest[close + 1..])
            }
            None => (rest, None, ""),
        };

        for prefix in &mut acc {
            prefix.push_str(literal);
        }

        if let Some(group) = group {
            let values = expand_group(group)?;
            acc = acc
                .iter()
                .flat_map(|prefix| values.iter().map(move |v| format!("{prefix}{v}")))
                .collect();
        }

        rest = tail;
    }

    Ok(acc)
}

/// Expand the inside of one bracket group
fn expand_group(group: &str) -> Result<Vec<String>, String> {
    let mut values = Vec::new();

    for elem in group.split(',') {
        let elem = elem.trim();
        if elem.is_empty() {
            return Err("empty range element".to_string());
        }

        let (range, step) = match elem.split_once('/') {
            Some((range, step)) => {
                let step = parse_bound(step)?;
                if step == 0 {
                    return Err(format!("zero step in {elem:?}"));
                }
                (range, step)
            }
            None => (elem, 1),
        };

        let (lo_str, hi_str) = range.split_once('-').unwrap_or((range, range));
        let lo = parse_bound(lo_str)?;
        let hi = parse_bound(hi_str)?;
        if lo > hi {
            return Err(format!("reversed range {elem:?}"));
        }

        let width = if lo_str.len() > 1 && lo_str.starts_with('0') {
            lo_str.len()
        } else {
            0
        };

        #[allow(clippy::cast_possible_truncation)]
        let step = step as usize;
        values.extend((lo..=hi).step_by(step).map(|n| format!("{n:0width$}")));
    }

    Ok(values)
}

fn parse_bound(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid number {s:?}"));
    }
    s.parse::<u64>().map_err(|e| format!("invalid number {s:?}: {e}"))
}
