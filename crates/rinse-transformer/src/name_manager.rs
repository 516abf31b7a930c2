//! Allocation of generated identifiers that cannot collide with the file's own.

use rinse_parser::{Token, TokenType};
use rustc_hash::FxHashSet;

/// Every identifier spelling in a file plus the names handed out so far.
#[derive(Debug, Default)]
pub struct NameManager {
    used_names: FxHashSet<String>,
}

impl NameManager {
    pub fn new(source: &str, tokens: &[Token]) -> Self {
        let used_names = tokens
            .iter()
            .filter(|token| token.kind == TokenType::Name)
            .map(|token| token.text(source).to_string())
            .collect();
        Self { used_names }
    }

    /// Returns `name`, or `name2`, `name3`, ... if taken, and reserves it.
    pub fn claim_free_name(&mut self, name: &str) -> String {
        let free = self.find_free_name(name);
        self.used_names.insert(free.clone());
        free
    }

    pub fn find_free_name(&self, name: &str) -> String {
        if !self.used_names.contains(name) {
            return name.to_string();
        }
        (2..)
            .map(|suffix| format!("{name}{suffix}"))
            .find(|candidate| !self.used_names.contains(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rinse_parser::{parse_file, Dialect};

    #[test]
    fn test_claims_skip_taken_names() {
        let source = "const _a = 1, _a2 = 2;";
        let file = parse_file(source, Dialect::default()).unwrap();
        let mut names = NameManager::new(source, &file.tokens);
        assert_eq!(names.claim_free_name("_a"), "_a3");
        assert_eq!(names.claim_free_name("_a"), "_a4");
        assert_eq!(names.claim_free_name("_b"), "_b");
        assert_eq!(names.claim_free_name("_b"), "_b2");
    }
}
