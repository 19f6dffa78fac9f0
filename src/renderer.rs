//! Turns resolved tree nodes into display strings.

use crate::tree::{Node, Scalar};

/// Surname synonyms, tried first when assembling a person's name.
pub const SURNAME_KEYS: &[&str] = &[
    "last",
    "last_name",
    "lastname",
    "surname",
    "familiya",
    "Фамилия",
];

/// Given-name synonyms.
pub const GIVEN_NAME_KEYS: &[&str] = &[
    "first",
    "first_name",
    "firstname",
    "given_name",
    "imya",
    "Имя",
];

/// Patronymic synonyms.
pub const PATRONYMIC_KEYS: &[&str] = &[
    "middle",
    "middle_name",
    "middlename",
    "patronymic",
    "otchestvo",
    "Отчество",
];

/// Renders a node as a single display string. Never fails; empty means "nothing useful".
///
/// Maps are first tried as a split person name (surname, given name,
/// patronymic). Otherwise every child is rendered and joined with a space.
pub fn render(node: &Node) -> String {
    match node {
        Node::Absent => String::new(),
        Node::Scalar(scalar) => render_scalar(scalar),
        Node::Seq(items) => join_non_empty(items.iter().map(render)),
        Node::Map(entries) => {
            let assembled = assemble_person_name(entries);
            if !assembled.is_empty() {
                return assembled;
            }
            join_non_empty(entries.iter().map(|(_, v)| render(v)))
        }
    }
}

fn render_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::String(s) => s.trim().to_string(),
        Scalar::Number(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }
}

/// Builds "Surname Given Patronymic" from whichever slots the map provides.
fn assemble_person_name(entries: &[(String, Node)]) -> String {
    let slots = [SURNAME_KEYS, GIVEN_NAME_KEYS, PATRONYMIC_KEYS]
        .iter()
        .filter_map(|group| first_in_group(entries, group));
    join_non_empty(slots)
}

fn first_in_group(entries: &[(String, Node)], group: &[&str]) -> Option<String> {
    group.iter().find_map(|member| {
        let member = member.to_lowercase();
        entries
            .iter()
            .find(|(key, _)| key.to_lowercase() == member)
            .map(|(_, value)| render(value))
            .filter(|rendered| !rendered.is_empty())
    })
}

fn join_non_empty(parts: impl Iterator<Item = String>) -> String {
    parts
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapses every whitespace run to a single space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
