//! Condition expression codec
//!
//! A condition reads `<consumer predicate> => <provider predicate>`. Either
//! side may be empty. Decoding then encoding normalizes whitespace; it is not
//! a byte-exact round trip.

/// Separator between the consumer and provider halves
pub const ARROW: &str = "=>";

/// One decoded condition
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Clause {
    /// Consumer side predicate
    pub when: String,
    /// Provider side predicate
    pub then: String,
}

/// Split a condition on its first `=>`. Input without an arrow is treated
/// as a provider-only predicate.
pub fn decode(condition: &str) -> Clause {
    let condition = condition.trim();
    match condition.split_once(ARROW) {
        Some((when, then)) => Clause {
            when: when.trim().to_string(),
            then: then.trim().to_string(),
        },
        None => Clause {
            when: String::new(),
            then: condition.to_string(),
        },
    }
}

/// Join clauses into a single expression. Same-side predicates are joined
/// with ` & `; the `when => then` shape is always emitted.
pub fn encode<'a>(clauses: impl IntoIterator<Item = &'a Clause>) -> String {
    let mut when: Vec<&str> = Vec::new();
    let mut then: Vec<&str> = Vec::new();

    for clause in clauses {
        if !clause.when.is_empty() {
            when.push(&clause.when);
        }
        if !clause.then.is_empty() {
            then.push(&clause.then);
        }
    }

    format!("{} {} {}", when.join(" & "), ARROW, then.join(" & "))
}

/// Decode then re-encode a single condition
pub fn normalize(condition: &str) -> String {
    encode([&decode(condition)])
}
