use std::sync::LazyLock;

use regex::Regex;

static BY_DOT_OR_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s.]+").expect("static pattern"));
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:\\.|[^"\\])*""#).expect("static pattern"));

/// Lowercase particles kept as their bare first letter.
const PARTICLES: &[&str] = &[
    "von", "фон", "van", "ван", "der", "дер", "til", "тиль", "zu", "цу", "zum", "цум", "zur", "цур",
    "af", "аф", "of", "из", "da", "да", "de", "де", "des", "дез", "del", "дель", "di", "ди", "dos",
    "душ", "дос", "du", "дю", "la", "ла", "ля", "le", "ле", "haut", "от", "the",
];

fn upper_first(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

fn first(name: &str) -> String {
    name.chars().next().map(String::from).unwrap_or_default()
}

fn form_initial(name: &str) -> String {
    let mut cut = name.split('\'');
    let head = cut.next().unwrap_or_default();
    if let Some(tail) = cut.next().filter(|t| !t.is_empty()) {
        let tail_first = tail.chars().next().unwrap_or_default();
        if tail_first.is_lowercase() && !head.is_empty() {
            return upper_first(head);
        }
        return format!("{head}'{tail_first}");
    }

    if name.chars().count() > 1 {
        match name {
            "Старший" => return "Ст".to_string(),
            "Младший" => return "Мл".to_string(),
            "Ст" | "ст" | "Sr" | "Мл" | "мл" | "Jr" => return name.to_string(),
            _ => {}
        }
        // Camel-cased prefixes: MacManus, McNickle, dinAlt.
        let mut chars = name.char_indices().skip(1);
        if let Some((i, c)) = chars.find(|(_, c)| c.is_uppercase()) {
            return name[..i + c.len_utf8()].to_string();
        }
    }

    if PARTICLES.contains(&name) {
        return first(name);
    }
    upper_first(name)
}

/// Reduce a comma separated author list to dotted initials.
///
/// Quoted nicknames are dropped, hyphenated surnames keep their hyphen.
pub fn initials(authors: &str) -> String {
    let unquoted = QUOTED.replace_all(authors, " ").replace('"', " ");
    unquoted
        .split(',')
        .filter(|author| !author.replace(['.', '-'], "").trim().is_empty())
        .map(|author| {
            let barrels: Vec<String> = author
                .split('-')
                .filter(|barrel| !barrel.replace('.', "").trim().is_empty())
                .map(|barrel| {
                    BY_DOT_OR_SPACE
                        .split(barrel)
                        .filter(|name| !name.is_empty())
                        .map(form_initial)
                        .collect::<Vec<_>>()
                        .join(".")
                })
                .collect();
            barrels.join("-") + "."
        })
        .collect::<Vec<_>>()
        .join(",")
}
