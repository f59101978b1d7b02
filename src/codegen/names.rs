// src/codegen/names.rs

/// Identifier-safe words of `raw`: splits on anything non-alphanumeric and on
/// lower→upper case boundaries (`HTTPCode` → `HTTP`, `Code`).
fn words(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while",
    "abstract", "become", "box", "do", "final", "gen", "macro", "override", "priv", "try",
    "typeof", "unsized", "virtual", "yield",
];

/// Make `ident` usable as a Rust identifier.
fn escape(ident: String) -> String {
    match ident.as_str() {
        "" => "_".to_string(),
        // these cannot be raw identifiers
        "self" | "super" | "crate" | "Self" => format!("{}_", ident),
        s if KEYWORDS.contains(&s) => format!("r#{}", ident),
        s if s.starts_with(|c: char| c.is_ascii_digit()) => format!("_{}", ident),
        _ => ident,
    }
}

/// `FirstName` → `first_name`
pub fn snake_case(raw: &str) -> String {
    let joined = words(raw)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_");
    escape(joined)
}

/// `people_data` → `PeopleData`
pub fn upper_camel_case(raw: &str) -> String {
    let joined: String = words(raw)
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect();
    escape(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_splits_words() {
        assert_eq!(snake_case("Name"), "name");
        assert_eq!(snake_case("FirstName"), "first_name");
        assert_eq!(snake_case("HTTPCode"), "http_code");
        assert_eq!(snake_case("Address2Line"), "address2_line");
        assert_eq!(snake_case("Zip Code"), "zip_code");
        assert_eq!(snake_case("my-data"), "my_data");
    }

    #[test]
    fn camel_case_joins_words() {
        assert_eq!(upper_camel_case("people"), "People");
        assert_eq!(upper_camel_case("stock_levels"), "StockLevels");
        assert_eq!(upper_camel_case("OrderLine"), "OrderLine");
        assert_eq!(upper_camel_case("HTTPCode"), "HttpCode");
    }

    #[test]
    fn keywords_and_digits_are_escaped() {
        assert_eq!(snake_case("Type"), "r#type");
        assert_eq!(snake_case("Self"), "self_");
        assert_eq!(upper_camel_case("Self"), "Self_");
        assert_eq!(snake_case("2ndPlace"), "_2nd_place");
        assert_eq!(snake_case("--"), "_");
    }
}
