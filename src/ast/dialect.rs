//! Compiler-line dialects.
//!
//! The supported solc lines share one grammar superset; the dialect table
//! records which node kinds each line can emit, so a kind outside the
//! active dialect is treated as an unknown kind (recoverable warning)
//! rather than silently accepted.

/// A supported compiler line. 0.7 exports the 0.8 shape minus a few kinds
/// and is folded into [`Dialect::V08`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    V04,
    V05,
    V06,
    V08,
}

/// Kinds first emitted by 0.6 exports.
const SINCE_V06: &[&str] = &["TryStatement", "TryCatchClause"];

/// Kinds first emitted by 0.8 exports.
const SINCE_V08: &[&str] = &[
    "ErrorDefinition",
    "RevertStatement",
    "UncheckedBlock",
    "IdentifierPath",
];

/// Kinds dropped after the 0.4 line.
const ONLY_V04: &[&str] = &["Throw"];

impl Dialect {
    /// Whether this compiler line can emit `kind` at all.
    pub fn emits(self, kind: &str) -> bool {
        if ONLY_V04.contains(&kind) {
            return self == Dialect::V04;
        }
        if SINCE_V08.contains(&kind) {
            return self == Dialect::V08;
        }
        if SINCE_V06.contains(&kind) {
            return matches!(self, Dialect::V06 | Dialect::V08);
        }
        true
    }

    /// Structured Yul bodies replace raw assembly text from 0.6 on.
    pub fn structured_assembly(self) -> bool {
        matches!(self, Dialect::V06 | Dialect::V08)
    }

    fn from_minor(minor: u32) -> Option<Dialect> {
        match minor {
            4 => Some(Dialect::V04),
            5 => Some(Dialect::V05),
            6 => Some(Dialect::V06),
            7 | 8 => Some(Dialect::V08),
            _ => None,
        }
    }

    /// Pick the dialect from a `PragmaDirective`'s literal list.
    ///
    /// The literals come tokenized, e.g. `["solidity", "^", "0.8", ".0"]`
    /// or `["solidity", ">=", "0.4", ".21", "<", "0.6", ".0"]`. Relational
    /// constraints resolve to their lower bound (`>` bumps one minor up,
    /// `<` one down when it is the only bound), matching how the effective
    /// version is picked upstream.
    pub fn from_pragma_literals(literals: &[String]) -> Option<Dialect> {
        let tokens: Vec<&str> = literals.iter().map(|l| l.trim()).collect();
        let relational = tokens
            .iter()
            .any(|t| matches!(*t, ">=" | ">" | "<=" | "<"));

        if !relational {
            let minor = tokens.iter().find_map(|t| parse_minor(t))?;
            return Dialect::from_minor(minor);
        }

        let mut lower: Option<u32> = None;
        let mut upper: Option<u32> = None;
        for (index, token) in tokens.iter().enumerate() {
            let bound = tokens.get(index + 1).and_then(|t| parse_minor(t));
            match *token {
                ">=" => lower = bound,
                ">" => lower = bound.map(|m| m + 1),
                "<=" => upper = bound,
                "<" => upper = bound.map(|m| m.saturating_sub(1)),
                _ => {}
            }
        }

        let minor = match (lower, upper) {
            (Some(lo), Some(hi)) if hi < lo => return None,
            (Some(lo), _) => lo,
            (None, Some(hi)) => hi,
            (None, None) => return None,
        };
        Dialect::from_minor(minor)
    }
}

/// Parse a `0.N` version token into its minor number.
fn parse_minor(token: &str) -> Option<u32> {
    let rest = token.strip_prefix("0.")?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_version() {
        let d = Dialect::from_pragma_literals(&lits(&["solidity", "0.8", ".13"]));
        assert_eq!(d, Some(Dialect::V08));
    }

    #[test]
    fn test_caret_version() {
        let d = Dialect::from_pragma_literals(&lits(&["solidity", "^", "0.5", ".0"]));
        assert_eq!(d, Some(Dialect::V05));
    }

    #[test]
    fn test_zero_seven_folds_into_v08() {
        let d = Dialect::from_pragma_literals(&lits(&["solidity", "^", "0.7", ".6"]));
        assert_eq!(d, Some(Dialect::V08));
    }

    #[test]
    fn test_lower_bound_wins() {
        let d = Dialect::from_pragma_literals(&lits(&[
            "solidity", ">=", "0.4", ".21", "<", "0.6", ".0",
        ]));
        assert_eq!(d, Some(Dialect::V04));
    }

    #[test]
    fn test_strict_lower_bound_bumps() {
        let d = Dialect::from_pragma_literals(&lits(&["solidity", ">", "0.5", ".0"]));
        assert_eq!(d, Some(Dialect::V06));
    }

    #[test]
    fn test_upper_bound_only() {
        let d = Dialect::from_pragma_literals(&lits(&["solidity", "<", "0.7", ".0"]));
        assert_eq!(d, Some(Dialect::V06));
    }

    #[test]
    fn test_contradictory_bounds() {
        let d = Dialect::from_pragma_literals(&lits(&[
            "solidity", ">=", "0.8", ".0", "<=", "0.4", ".0",
        ]));
        assert_eq!(d, None);
    }

    #[test]
    fn test_dialect_kind_gating() {
        assert!(Dialect::V04.emits("Throw"));
        assert!(!Dialect::V08.emits("Throw"));
        assert!(Dialect::V08.emits("UncheckedBlock"));
        assert!(!Dialect::V05.emits("UncheckedBlock"));
        assert!(Dialect::V06.emits("TryStatement"));
        assert!(!Dialect::V05.emits("TryStatement"));
        assert!(Dialect::V04.emits("ContractDefinition"));
    }
}
