//! Target-facing name derivation and method grouping.
//!
//! Original C++ identifiers are renamed to camelCase through a deterministic
//! tokenizer. All methods that normalize to the same camel name form one
//! [`MethodGroup`] — the unit the ergonomic layer emits. Two *different*
//! original identifiers colliding on the same camel name is a fatal
//! configuration error, never a silent merge.

use std::collections::HashMap;

use super::error::DomainError;
use super::method::Method;

/// All methods sharing one target-facing (camel-converted) name.
#[derive(Debug, Clone)]
pub struct MethodGroup {
    /// The camel-converted name emitted into the generated surface.
    pub camel_name: String,
    /// The single original identifier every overload shares.
    pub source_name: String,
    /// Overloads in extraction order.
    pub overloads: Vec<Method>,
}

impl MethodGroup {
    /// Largest parameter count across all overloads.
    pub fn max_args(&self) -> usize {
        self.overloads.iter().map(Method::max_args).max().unwrap_or(0)
    }
}

/// Split an identifier into word tokens.
///
/// Underscores split first; each fragment is then split on camel-run
/// boundaries. At every position the first matching rule wins:
///
/// 1. a run of two-or-more uppercase letters followed by a lowercase `s`
///    (plural acronym: `IDs`),
/// 2. a maximal uppercase run not followed by a lowercase letter (`IC` in
///    `RunIC`; `HTTP` in `HTTPServer` keeps its last letter for rule 3),
/// 3. an uppercase-led word (`Load`),
/// 4. a lowercase run,
/// 5. a digit run.
pub fn tokenize(identifier: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for fragment in identifier.split('_').filter(|f| !f.is_empty()) {
        split_camel_runs(fragment, &mut tokens);
    }

    // A leading token like `Getvolume` demotes to a bare `get` head
    // followed by the lower-cased remainder.
    if let Some(first) = tokens.first() {
        let lower = first.to_lowercase();
        if first.len() > 3 && (lower.starts_with("set") || lower.starts_with("get")) {
            let head = lower[..3].to_string();
            let rest = lower[3..].to_string();
            tokens.splice(0..1, [head, rest]);
        }
    }

    tokens
}

fn split_camel_runs(fragment: &str, tokens: &mut Vec<String>) {
    let chars: Vec<char> = fragment.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
        } else if c.is_lowercase() {
            let start = i;
            while i < chars.len() && chars[i].is_lowercase() {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
        } else if c.is_uppercase() {
            let start = i;
            let mut run = 0;
            while i + run < chars.len() && chars[i + run].is_uppercase() {
                run += 1;
            }

            let after = chars.get(i + run).copied();
            if run >= 2 && after == Some('s') && !followed_by_lowercase(&chars, i + run + 1) {
                // Rule 1: plural acronym keeps its trailing `s`.
                i += run + 1;
                tokens.push(chars[start..i].iter().collect());
            } else if run >= 2 && after.is_some_and(|a| a.is_lowercase()) {
                // Rule 2 back-off: the run's last letter leads the next word.
                i += run - 1;
                tokens.push(chars[start..i].iter().collect());
            } else if run >= 2 {
                // Rule 2: maximal uppercase run.
                i += run;
                tokens.push(chars[start..i].iter().collect());
            } else {
                // Rule 3: uppercase-led word.
                i += 1;
                while i < chars.len() && chars[i].is_lowercase() {
                    i += 1;
                }
                tokens.push(chars[start..i].iter().collect());
            }
        } else {
            // Non-alphanumeric byte inside an identifier fragment; skip it.
            i += 1;
        }
    }
}

fn followed_by_lowercase(chars: &[char], idx: usize) -> bool {
    chars.get(idx).is_some_and(|c| c.is_lowercase())
}

/// Re-join tokens camelCase: first token lowercased, subsequent tokens with
/// an uppercased first letter.
pub fn camel_name(identifier: &str) -> String {
    let tokens = tokenize(identifier);
    let mut out = String::new();
    for (idx, token) in tokens.iter().enumerate() {
        if idx == 0 {
            out.push_str(&token.to_lowercase());
        } else {
            let mut chars = token.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

/// Lower-snake variant of the same tokenization, used for artifact file
/// stems.
pub fn snake_name(identifier: &str) -> String {
    tokenize(identifier)
        .iter()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Build method groups from the full extracted list, after ignore-listed
/// names have been removed.
///
/// # Errors
///
/// [`DomainError::NameCollision`] when two distinct source identifiers map
/// onto the same camel name.
pub fn build_method_groups(methods: &[Method]) -> Result<Vec<MethodGroup>, DomainError> {
    let mut groups: Vec<MethodGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for method in methods {
        let camel = camel_name(&method.name);
        match index.get(&camel) {
            Some(&slot) => {
                let group = &mut groups[slot];
                if group.source_name != method.name {
                    return Err(DomainError::NameCollision {
                        camel_name: camel,
                        first: group.source_name.clone(),
                        second: method.name.clone(),
                    });
                }
                group.overloads.push(method.clone());
            }
            None => {
                index.insert(camel.clone(), groups.len());
                groups.push(MethodGroup {
                    camel_name: camel,
                    source_name: method.name.clone(),
                    overloads: vec![method.clone()],
                });
            }
        }
    }

    Ok(groups)
}
