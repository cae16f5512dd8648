//! INI parsing.
//!
//! Supports `[section]` headers, `key = value` pairs, `;` and `#` comments,
//! quoted values and `key[] = value` list entries. Unquoted values are
//! decoded as typed scalars; quoted values stay strings.

use super::{Pairs, Section};
use crate::value::Value;

pub(super) fn parse_ini(content: &str) -> Result<Vec<Section>, String> {
    let mut sections = vec![Section {
        name: None,
        pairs: Pairs::new(),
    }];

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| format!("unterminated section header on line {}", index + 1))?
                .trim();
            sections.push(Section {
                name: Some(name.to_string()),
                pairs: Pairs::new(),
            });
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| format!("expected `key = value` on line {}", index + 1))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("empty key on line {}", index + 1));
        }

        let value = parse_value(value.trim());
        let Some(current) = sections.last_mut() else {
            continue;
        };
        match key.strip_suffix("[]") {
            Some(list_key) => push_list_item(&mut current.pairs, list_key.trim(), value),
            None => current.pairs.push((key.to_string(), value)),
        }
    }

    Ok(sections
        .into_iter()
        .filter(|s| s.name.is_some() || !s.pairs.is_empty())
        .collect())
}

fn parse_value(raw: &str) -> Value {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return Value::String(raw[1..raw.len() - 1].to_string());
        }
    }
    let unquoted = strip_inline_comment(raw);
    match unquoted.to_ascii_lowercase().as_str() {
        "on" | "yes" => Value::Bool(true),
        "off" | "no" | "none" => Value::Bool(false),
        _ => Value::decode_scalar(unquoted),
    }
}

fn strip_inline_comment(raw: &str) -> &str {
    [" ;", " #"]
        .iter()
        .filter_map(|marker| raw.find(marker))
        .min()
        .map_or(raw, |idx| raw[..idx].trim_end())
}

fn push_list_item(pairs: &mut Pairs, key: &str, value: Value) {
    if let Some((_, Value::List(items))) = pairs.iter_mut().rev().find(|(k, _)| k == key) {
        items.push(value);
        return;
    }
    pairs.push((key.to_string(), Value::List(vec![value])));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_and_typed_values() {
        let sections = parse_ini(
            "; global\nname = envy\n\n[test]\nfoo = bar\nbar = 1\ndebug = on\n\n[prod]\nfoo = \"baz\"\n",
        )
        .expect("valid ini");

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].name, None);
        assert_eq!(sections[1].name.as_deref(), Some("test"));
        assert_eq!(
            sections[1].pairs,
            vec![
                ("foo".to_string(), Value::String("bar".into())),
                ("bar".to_string(), Value::Integer(1)),
                ("debug".to_string(), Value::Bool(true)),
            ]
        );
        assert_eq!(sections[2].pairs[0].1, Value::String("baz".into()));
    }

    #[test]
    fn test_quoted_numbers_stay_strings() {
        let sections = parse_ini("[a]\nport = \"8080\"\n").expect("valid ini");
        assert_eq!(sections[0].pairs[0].1, Value::String("8080".into()));
    }

    #[test]
    fn test_list_entries_accumulate() {
        let sections = parse_ini("[a]\nhosts[] = one\nhosts[] = two\n").expect("valid ini");
        assert_eq!(
            sections[0].pairs,
            vec![(
                "hosts".to_string(),
                Value::List(vec![Value::String("one".into()), Value::String("two".into())])
            )]
        );
    }

    #[test]
    fn test_inline_comment_is_stripped() {
        let sections = parse_ini("[a]\nlevel = debug ; verbose\n").expect("valid ini");
        assert_eq!(sections[0].pairs[0].1, Value::String("debug".into()));
    }

    #[test]
    fn test_empty_leading_section_is_dropped() {
        let sections = parse_ini("[only]\nx = 1\n").expect("valid ini");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name.as_deref(), Some("only"));
    }

    #[test]
    fn test_line_without_equals_is_error() {
        let err = parse_ini("[a]\njust some words\n").unwrap_err();
        assert!(err.contains("line 2"));
        assert!(!err.contains("just some words"));
    }

    #[test]
    fn test_unterminated_header_is_error() {
        assert!(parse_ini("[broken\n").is_err());
    }
}
