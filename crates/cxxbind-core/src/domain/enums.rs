//! Resolved enumeration and flag-group definitions.

use std::collections::HashSet;

use serde::Serialize;

/// One `{name, value}` member of an enum or flag group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Assign member values following C++ enumerator semantics: an unset value
/// defaults to the previous member's value + 1 (starting at 0).
pub fn assign_member_values(raw: Vec<(String, Option<i64>)>) -> Vec<EnumMember> {
    let mut members = Vec::with_capacity(raw.len());
    let mut next = 0i64;
    for (name, explicit) in raw {
        let value = explicit.unwrap_or(next);
        next = value + 1;
        members.push(EnumMember { name, value });
    }
    members
}

/// A resolved enumeration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDefinition {
    /// Target-facing name emitted into the generated interface.
    pub target_name: String,
    /// Acceptable C++ spellings (simple, qualified, `enum `-prefixed) so a
    /// type matches regardless of how a given AST node spells it.
    pub cpp_names: HashSet<String>,
    /// Ordered members in declaration order.
    pub members: Vec<EnumMember>,
}

impl EnumDefinition {
    /// Build a definition from the simple C++ name and an optional owning
    /// scope, registering every acceptable spelling variant.
    pub fn new(simple_name: &str, owner: Option<&str>, members: Vec<EnumMember>) -> Self {
        let mut cpp_names = HashSet::new();
        cpp_names.insert(simple_name.to_string());
        cpp_names.insert(format!("enum {simple_name}"));
        if let Some(owner) = owner {
            cpp_names.insert(format!("{owner}::{simple_name}"));
            cpp_names.insert(format!("enum {owner}::{simple_name}"));
        }
        Self {
            target_name: simple_name.to_string(),
            cpp_names,
            members,
        }
    }

    /// Simple (unqualified) C++ name with the `e`-prefix convention stripped,
    /// used by the `Set<Enum>`/`Get<Enum>` method-name match.
    pub fn convention_stem(&self) -> &str {
        let name = self.target_name.as_str();
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some('e'), Some(second)) if second.is_ascii_uppercase() => &name[1..],
            _ => name,
        }
    }

    pub fn matches_spelling(&self, spelling: &str) -> bool {
        self.cpp_names.contains(spelling)
    }
}

/// A bitmask constant group associated with one method, detected from the
/// documentation convention naming that method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagDefinition {
    /// Target-facing name emitted into the generated interface.
    pub target_name: String,
    /// Name of the method the flags apply to.
    pub method_name: String,
    /// Ordered members in declaration order.
    pub members: Vec<EnumMember>,
}

impl FlagDefinition {
    pub fn new(method_name: &str, members: Vec<EnumMember>) -> Self {
        Self {
            target_name: format!("{method_name}Flags"),
            method_name: method_name.to_string(),
            members,
        }
    }
}

/// Growing set of discovered definitions with first-writer-wins conflict
/// resolution: a definition is uniquely identified by its target name or by
/// any of its C++ spellings, and a later duplicate is dropped.
#[derive(Debug, Clone, Default)]
pub struct DefinitionSet {
    pub enums: Vec<EnumDefinition>,
    pub flags: Vec<FlagDefinition>,
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enum definition unless its target name or one of its C++
    /// spellings is already claimed. Returns whether it was added.
    pub fn add_enum(&mut self, def: EnumDefinition) -> bool {
        let conflict = self.enums.iter().any(|existing| {
            existing.target_name == def.target_name
                || existing.cpp_names.intersection(&def.cpp_names).next().is_some()
        }) || self.flags.iter().any(|f| f.target_name == def.target_name);
        if conflict {
            return false;
        }
        self.enums.push(def);
        true
    }

    /// Add a flag group; empty groups and target-name conflicts are dropped.
    pub fn add_flags(&mut self, def: FlagDefinition) -> bool {
        if def.members.is_empty() {
            return false;
        }
        let conflict = self.flags.iter().any(|f| f.target_name == def.target_name)
            || self.enums.iter().any(|e| e.target_name == def.target_name);
        if conflict {
            return false;
        }
        self.flags.push(def);
        true
    }

    /// Find the enum matching a C++ spelling (any registered variant).
    pub fn enum_for_spelling(&self, spelling: &str) -> Option<&EnumDefinition> {
        self.enums.iter().find(|e| e.matches_spelling(spelling))
    }

    pub fn enum_by_target(&self, target_name: &str) -> Option<&EnumDefinition> {
        self.enums.iter().find(|e| e.target_name == target_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_follow_previous_plus_one() {
        let members = assign_member_values(vec![
            ("tA".into(), None),
            ("tB".into(), None),
            ("tC".into(), None),
        ]);
        assert_eq!(members, vec![
            EnumMember::new("tA", 0),
            EnumMember::new("tB", 1),
            EnumMember::new("tC", 2),
        ]);
    }

    #[test]
    fn explicit_values_reset_the_counter() {
        let members = assign_member_values(vec![
            ("A".into(), None),
            ("B".into(), Some(10)),
            ("C".into(), None),
            ("D".into(), Some(-2)),
            ("E".into(), None),
        ]);
        let values: Vec<i64> = members.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![0, 10, 11, -2, -1]);
    }

    #[test]
    fn reserializing_in_order_reproduces_values() {
        // Re-deriving unset values via previous+1 over the
        // declaration order reproduces the original integers exactly.
        let original = assign_member_values(vec![
            ("A".into(), Some(3)),
            ("B".into(), None),
            ("C".into(), Some(7)),
        ]);
        let rederived = assign_member_values(
            original
                .iter()
                .map(|m| (m.name.clone(), Some(m.value)))
                .collect(),
        );
        assert_eq!(original, rederived);
    }

    #[test]
    fn enum_spelling_variants() {
        let def = EnumDefinition::new("eMode", Some("Engine"), vec![]);
        assert!(def.matches_spelling("eMode"));
        assert!(def.matches_spelling("enum eMode"));
        assert!(def.matches_spelling("Engine::eMode"));
        assert!(def.matches_spelling("enum Engine::eMode"));
        assert!(!def.matches_spelling("Mode"));
    }

    #[test]
    fn convention_stem_strips_e_prefix() {
        assert_eq!(EnumDefinition::new("eMode", None, vec![]).convention_stem(), "Mode");
        assert_eq!(EnumDefinition::new("Mode", None, vec![]).convention_stem(), "Mode");
        assert_eq!(EnumDefinition::new("error", None, vec![]).convention_stem(), "error");
    }

    #[test]
    fn first_writer_wins_on_duplicate_spelling() {
        let mut set = DefinitionSet::new();
        let first = EnumDefinition::new("eMode", Some("Engine"), vec![EnumMember::new("tA", 0)]);
        let second = EnumDefinition::new("eMode", None, vec![EnumMember::new("tX", 9)]);
        assert!(set.add_enum(first));
        assert!(!set.add_enum(second));
        assert_eq!(set.enums.len(), 1);
        assert_eq!(set.enums[0].members[0].name, "tA");
    }

    #[test]
    fn empty_flag_group_is_dropped() {
        let mut set = DefinitionSet::new();
        assert!(!set.add_flags(FlagDefinition::new("Run", vec![])));
        assert!(set.add_flags(FlagDefinition::new(
            "Run",
            vec![EnumMember::new("RUN_FAST", 1)]
        )));
        assert_eq!(set.flags.len(), 1);
        assert_eq!(set.flags[0].target_name, "RunFlags");
    }
}
