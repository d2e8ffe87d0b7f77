use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};

/// Tags under which a YAML producer may emit an interned symbol.
const SYMBOL_TAGS: &[&str] = &["ruby/symbol", "ruby/sym", "symbol", "sym"];

/// Return a copy of `value` in which every symbol-style mapping key is replaced
/// by its plain string name, recursively through mappings, sequences and
/// tagged values.
///
/// Mapping order is preserved and `Null` maps to `Null`. Values (as opposed to
/// keys) are only rewritten to drop a non-specific `!` tag.
pub fn normalize_keys(value: &Value) -> Value {
    match value {
        Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, val) in map {
                out.insert(normalize_key(key), normalize_keys(val));
            }
            Value::Mapping(out)
        }
        Value::Sequence(seq) => Value::Sequence(seq.iter().map(normalize_keys).collect()),
        Value::Tagged(tagged) if is_non_specific_tag(tagged) => normalize_keys(&tagged.value),
        Value::Tagged(tagged) => Value::Tagged(Box::new(TaggedValue {
            tag: tagged.tag.clone(),
            value: normalize_keys(&tagged.value),
        })),
        other => other.clone(),
    }
}

fn normalize_key(key: &Value) -> Value {
    match key {
        Value::Tagged(tagged) if is_symbol_tag(tagged) => match &tagged.value {
            Value::String(s) => Value::String(s.clone()),
            Value::Number(n) => Value::String(n.to_string()),
            Value::Bool(b) => Value::String(b.to_string()),
            other => normalize_keys(other),
        },
        Value::Tagged(tagged) if is_non_specific_tag(tagged) => normalize_key(&tagged.value),
        Value::String(s) => match symbol_literal_name(s) {
            Some(name) => Value::String(name.to_owned()),
            None => key.clone(),
        },
        other => normalize_keys(other),
    }
}

/// Whether a tagged value is a serialized symbol.
pub fn is_symbol_tag(tagged: &TaggedValue) -> bool {
    SYMBOL_TAGS.iter().any(|tag| tagged.tag == *tag)
}

/// Whether a value carries the non-specific `!` tag, which adds no type
/// information and only forces the scalar to be read as a string.
pub fn is_non_specific_tag(tagged: &TaggedValue) -> bool {
    tagged.tag == "!"
}

/// The bare name of a Ruby-style symbol literal (`:name`), if `s` is one.
pub fn symbol_literal_name(s: &str) -> Option<&str> {
    let name = s.strip_prefix(':')?;
    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(name)
    } else {
        None
    }
}

/// `s` with a leading symbol-literal colon removed, or `s` unchanged.
pub fn plain_key_name(s: &str) -> &str {
    symbol_literal_name(s).unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::value::Tag;

    fn symbol(name: &str) -> Value {
        Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new("ruby/symbol"),
            value: Value::String(name.to_owned()),
        }))
    }

    fn string(s: &str) -> Value {
        Value::String(s.to_owned())
    }

    #[test]
    fn replaces_tagged_symbol_keys_recursively() {
        let mut inner = Mapping::new();
        inner.insert(symbol("port"), Value::Number(8080.into()));
        let mut outer = Mapping::new();
        outer.insert(symbol("apache"), Value::Mapping(inner));

        let normalized = normalize_keys(&Value::Mapping(outer));
        assert_eq!(
            normalized["apache"]["port"],
            Value::Number(8080.into()),
            "nested symbol keys should be reachable as strings"
        );
    }

    #[test]
    fn replaces_symbol_literal_keys() {
        let value: Value = serde_yaml::from_str("':webserver': nginx\n").unwrap();
        let normalized = normalize_keys(&value);
        assert_eq!(normalized["webserver"], string("nginx"));
    }

    #[test]
    fn descends_into_sequences() {
        let mut entry = Mapping::new();
        entry.insert(symbol("name"), string("vim"));
        let value = Value::Sequence(vec![Value::Mapping(entry), string("plain")]);

        let normalized = normalize_keys(&value);
        assert_eq!(normalized[0]["name"], string("vim"));
        assert_eq!(normalized[1], string("plain"));
    }

    #[test]
    fn preserves_mapping_order() {
        let value: Value = serde_yaml::from_str("zeta: 1\n':alpha': 2\nmid: 3\n").unwrap();
        let normalized = normalize_keys(&value);
        let keys: Vec<_> = normalized
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap().to_owned())
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn leaves_values_and_plain_keys_alone() {
        let value: Value =
            serde_yaml::from_str("'*': ':not_a_key'\nkey: ':also_value'\n'a:b': 1\n").unwrap();
        assert_eq!(normalize_keys(&value), value);
    }

    #[test]
    fn null_stays_null() {
        assert_eq!(normalize_keys(&Value::Null), Value::Null);
    }

    #[test]
    fn does_not_mutate_input() {
        let mut map = Mapping::new();
        map.insert(symbol("os"), string("linux"));
        let value = Value::Mapping(map);
        let before = value.clone();
        let _ = normalize_keys(&value);
        assert_eq!(value, before);
    }

    #[test]
    fn unwraps_non_specific_tagged_scalars() {
        let value: Value =
            serde_yaml::from_str("base:\n  ! '*':\n    - php\n  role: ! web\n").unwrap();
        let normalized = normalize_keys(&value);
        assert_eq!(normalized["base"]["*"][0], string("php"));
        assert_eq!(normalized["base"]["role"], string("web"));
    }

    #[test]
    fn keeps_other_tags_on_values() {
        let value: Value = serde_yaml::from_str("port: !custom 80\n").unwrap();
        assert_eq!(normalize_keys(&value), value);
    }

    #[test]
    fn symbol_literal_detection() {
        assert_eq!(symbol_literal_name(":base"), Some("base"));
        assert_eq!(symbol_literal_name(":_private1"), Some("_private1"));
        assert_eq!(symbol_literal_name("base"), None);
        assert_eq!(symbol_literal_name(":"), None);
        assert_eq!(symbol_literal_name(":1st"), None);
        assert_eq!(symbol_literal_name(":with-dash"), None);
    }

    #[test]
    fn plain_key_name_strips_only_symbol_literals() {
        assert_eq!(plain_key_name(":top"), "top");
        assert_eq!(plain_key_name("top.sls"), "top.sls");
        assert_eq!(plain_key_name(":top.sls"), ":top.sls");
    }
}
