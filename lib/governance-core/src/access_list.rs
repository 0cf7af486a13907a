//! Access list projection over a document's conditions
//!
//! Access entries share the `conditions` list of a routing document. An
//! entry is a consumer-only `host` predicate with an empty provider side:
//! `host = a,b =>` denies the listed addresses and `host != a,b =>` denies
//! everyone except them.

use crate::expression::ARROW;
use governance_api::AccessRequest;

const HOST: &str = "host";

/// Whether a condition is an access list entry
pub fn is_access_entry(condition: &str) -> bool {
    let condition = condition.trim();
    let marked = ["host=", "host =", "host!=", "host !="]
        .iter()
        .any(|prefix| condition.starts_with(prefix));
    marked && condition.ends_with(ARROW)
}

/// Partition conditions into `(access entries, routing conditions)`, each
/// keeping its relative order
pub fn extract(conditions: &[String]) -> (Vec<String>, Vec<String>) {
    conditions
        .iter()
        .cloned()
        .partition(|condition| is_access_entry(condition))
}

/// Replace the access entries of `conditions` with `access`.
///
/// Existing access slots are refilled in order, surplus new entries are
/// appended and surplus old slots dropped. Routing conditions are untouched.
pub fn inject(conditions: &[String], access: Vec<String>) -> Vec<String> {
    splice(conditions, access, is_access_entry)
}

/// Replace the routing conditions of `conditions` with `routing`, leaving
/// access entries in their slots
pub fn replace_routing(conditions: &[String], routing: Vec<String>) -> Vec<String> {
    splice(conditions, routing, |condition| !is_access_entry(condition))
}

fn splice(conditions: &[String], replacement: Vec<String>, selected: fn(&str) -> bool) -> Vec<String> {
    let mut replacement = replacement.into_iter();
    let mut spliced = Vec::with_capacity(conditions.len());

    for condition in conditions {
        if !selected(condition) {
            spliced.push(condition.clone());
        } else if let Some(next) = replacement.next() {
            spliced.push(next);
        }
    }
    spliced.extend(replacement);
    spliced
}

/// Build access entries from a request: whitelist first, then blacklist
pub fn to_entries(request: &AccessRequest) -> Vec<String> {
    let mut entries = Vec::new();
    if let Some(list) = join_addresses(&request.whitelist) {
        entries.push(format!("{} != {} {}", HOST, list, ARROW));
    }
    if let Some(list) = join_addresses(&request.blacklist) {
        entries.push(format!("{} = {} {}", HOST, list, ARROW));
    }
    entries
}

/// Parse access entries back into `(blacklist, whitelist)`.
/// Addresses are deduplicated in first-seen order.
pub fn to_lists(entries: &[String]) -> (Vec<String>, Vec<String>) {
    let mut blacklist = Vec::new();
    let mut whitelist = Vec::new();

    for entry in entries.iter().filter(|e| is_access_entry(e)) {
        let predicate = entry.trim().trim_start_matches(HOST).trim_start();
        let predicate = predicate.trim_end_matches(ARROW);
        let (list, values) = match predicate.strip_prefix("!=") {
            Some(values) => (&mut whitelist, values),
            None => (&mut blacklist, predicate.trim_start_matches('=')),
        };
        for address in values.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            if !list.iter().any(|known| known == address) {
                list.push(address.to_string());
            }
        }
    }

    (blacklist, whitelist)
}

/// Combined expression published for legacy clients:
/// `host != <whitelist> & host = <blacklist> => false`
pub fn to_expression(blacklist: &[String], whitelist: &[String]) -> String {
    let mut predicates = Vec::new();
    if let Some(list) = join_addresses(whitelist) {
        predicates.push(format!("{} != {}", HOST, list));
    }
    if let Some(list) = join_addresses(blacklist) {
        predicates.push(format!("{} = {}", HOST, list));
    }
    format!("{} {} false", predicates.join(" & "), ARROW)
}

fn join_addresses(addresses: &[String]) -> Option<String> {
    let cleaned: Vec<&str> = addresses
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.join(","))
    }
}
