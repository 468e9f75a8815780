use crate::ports::{DocumentFormat, FormatError};
use confmigrate_types::{ConfigTree, Scalar, Value};
use serde_yaml::{Mapping, Number};

/// YAML documents via `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

const NAME: &str = "yaml";

impl DocumentFormat for YamlFormat {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parse(&self, text: &str) -> Result<ConfigTree, FormatError> {
        if text.lines().all(is_blank_or_comment) {
            return Ok(ConfigTree::new());
        }
        let doc: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| parse_err(e.to_string()))?;
        match from_yaml(doc)? {
            Value::Tree(tree) => Ok(tree),
            Value::Scalar(Scalar::Null) => Ok(ConfigTree::new()),
            _ => Err(parse_err("top-level document is not a mapping")),
        }
    }

    fn dump(&self, value: &Value) -> Result<String, FormatError> {
        let mut out = serde_yaml::to_string(&to_yaml(value)).map_err(|e| FormatError::Dump {
            format: NAME,
            message: e.to_string(),
        })?;
        while out.ends_with('\n') {
            out.pop();
        }
        Ok(out)
    }
}

fn is_blank_or_comment(line: &str) -> bool {
    let t = line.trim();
    t.is_empty() || t.starts_with('#')
}

fn parse_err(message: impl Into<String>) -> FormatError {
    FormatError::Parse {
        format: NAME,
        message: message.into(),
    }
}

fn from_yaml(v: serde_yaml::Value) -> Result<Value, FormatError> {
    Ok(match v {
        serde_yaml::Value::Null => Value::null(),
        serde_yaml::Value::Bool(b) => Value::from(b),
        serde_yaml::Value::Number(n) => Value::Scalar(number(&n)),
        serde_yaml::Value::String(s) => Value::from(s),
        serde_yaml::Value::Sequence(items) => Value::List(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            let mut tree = ConfigTree::new();
            for (k, v) in map {
                tree.insert(key_text(k)?, from_yaml(v)?);
            }
            Value::Tree(tree)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

fn number(n: &Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Int(i)
    } else {
        // u64 beyond i64::MAX, or a real float.
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Config keys are addressed as text; scalar keys are rendered to their string form.
fn key_text(k: serde_yaml::Value) -> Result<String, FormatError> {
    match k {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => key_text(tagged.value),
        other => Err(parse_err(format!("unsupported mapping key: {other:?}"))),
    }
}

fn to_yaml(v: &Value) -> serde_yaml::Value {
    match v {
        Value::Scalar(Scalar::Null) => serde_yaml::Value::Null,
        Value::Scalar(Scalar::Bool(b)) => serde_yaml::Value::Bool(*b),
        Value::Scalar(Scalar::Int(i)) => serde_yaml::Value::Number(Number::from(*i)),
        Value::Scalar(Scalar::Float(x)) => serde_yaml::Value::Number(Number::from(*x)),
        Value::Scalar(Scalar::String(s)) => serde_yaml::Value::String(s.clone()),
        Value::List(items) => serde_yaml::Value::Sequence(items.iter().map(to_yaml).collect()),
        Value::Tree(tree) => {
            let mut map = Mapping::new();
            for (k, v) in tree.iter() {
                map.insert(serde_yaml::Value::String(k.clone()), to_yaml(v));
            }
            serde_yaml::Value::Mapping(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_nested_mapping_in_document_order() {
        let tree = YamlFormat
            .parse("server:\n  port: 25565\n  name: lobby\nenabled: true\n")
            .unwrap();

        let keys: Vec<_> = tree.keys().map(String::as_str).collect();
        assert_eq!(keys, ["server", "enabled"]);
        assert_eq!(
            tree.get_path(&["server", "port"]),
            Some(&Value::from(25565i64))
        );
        assert_eq!(tree.get("enabled"), Some(&Value::from(true)));
    }

    #[test]
    fn nan_in_both_documents_compares_equal() {
        assert_eq!(YamlFormat.name(), "yaml");
        let a = YamlFormat.parse("a: .nan\n").unwrap();
        let b = YamlFormat.parse("a: .NaN\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_and_comment_only_documents_are_empty_trees() {
        assert!(YamlFormat.parse("").unwrap().is_empty());
        assert!(YamlFormat.parse("# just a comment\n").unwrap().is_empty());
    }

    #[test]
    fn top_level_sequence_is_rejected() {
        let err = YamlFormat.parse("- a\n- b\n").unwrap_err();
        assert!(matches!(err, FormatError::Parse { .. }));
        assert!(err.to_string().contains("not a mapping"));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = YamlFormat.parse("a: [1, 2\n").unwrap_err();
        assert!(matches!(err, FormatError::Parse { format: "yaml", .. }));
    }

    #[test]
    fn numeric_keys_become_text() {
        let tree = YamlFormat.parse("levels:\n  1: bronze\n  2: silver\n").unwrap();
        assert_eq!(
            tree.get_path(&["levels", "2"]),
            Some(&Value::from("silver"))
        );
    }

    #[test]
    fn dump_scalar_is_single_line() {
        assert_eq!(YamlFormat.dump(&Value::from(2i64)).unwrap(), "2");
        assert_eq!(YamlFormat.dump(&Value::from("hello")).unwrap(), "hello");
        assert_eq!(YamlFormat.dump(&Value::from(true)).unwrap(), "true");
    }

    #[test]
    fn dump_tree_is_multi_line() {
        let value = Value::Tree(ConfigTree::new().with("host", "localhost").with("port", 3306i64));
        assert_eq!(YamlFormat.dump(&value).unwrap(), "host: localhost\nport: 3306");
    }

    #[test]
    fn dump_list_is_block_sequence() {
        let value = Value::from(vec!["world", "world_nether"]);
        assert_eq!(YamlFormat.dump(&value).unwrap(), "- world\n- world_nether");
    }
}
