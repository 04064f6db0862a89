//! Variable schemas
//!
//! Declares the rule each environment variable has to satisfy. The server
//! schema covers variables that must never reach client code, the client
//! schema is the explicit allow-list of variables exposed to the browser.

use serde::Serialize;
use std::fmt;

/// Allowed values for `NODE_ENV`
pub const NODE_ENV_VALUES: &[&str] = &["development", "test", "production"];

/// Prefix every client-exposed variable carries
pub const PUBLIC_PREFIX: &str = "NEXT_PUBLIC_";

/// A validated (and possibly coerced) variable value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(u64),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "string",
            Value::Number(_) => "number",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Validation rule for a single variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Required string, restricted to one of the listed values
    OneOf(&'static [&'static str]),
    /// Required non-empty string
    Text,
    /// A string is replaced by its character count, anything else by 0,
    /// and the result is validated as a number
    Length,
}

impl Rule {
    /// Check `input` against this rule, returning the coerced value or the
    /// list of messages describing why it was rejected.
    pub fn check(&self, input: Option<&Value>) -> Result<Value, Vec<String>> {
        match self {
            Rule::OneOf(allowed) => {
                let text = expect_text(input)?;
                if allowed.contains(&text) {
                    Ok(Value::Text(text.to_string()))
                } else {
                    let expected = allowed
                        .iter()
                        .map(|v| format!("'{}'", v))
                        .collect::<Vec<_>>()
                        .join(" | ");
                    Err(vec![format!(
                        "Invalid enum value. Expected {}, received '{}'",
                        expected, text
                    )])
                }
            }
            Rule::Text => {
                let text = expect_text(input)?;
                if text.is_empty() {
                    Err(vec!["String must contain at least 1 character(s)".to_string()])
                } else {
                    Ok(Value::Text(text.to_string()))
                }
            }
            Rule::Length => {
                let length = match input {
                    Some(Value::Text(s)) => s.chars().count() as u64,
                    _ => 0,
                };
                Ok(Value::Number(length))
            }
        }
    }
}

fn expect_text(input: Option<&Value>) -> Result<&str, Vec<String>> {
    match input {
        None => Err(vec!["Required".to_string()]),
        Some(Value::Text(s)) => Ok(s),
        Some(other) => Err(vec![format!(
            "Expected string, received {}",
            other.kind()
        )]),
    }
}

/// A named variable together with its rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
}

/// Ordered set of variable rules
///
/// Schemas are only built by the constructors below, so the set of names a
/// process knows about is fixed when the binary is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Variables only the server may read
    pub fn server() -> Self {
        Self {
            fields: vec![
                Field {
                    name: "NODE_ENV",
                    rule: Rule::OneOf(NODE_ENV_VALUES),
                },
                Field {
                    name: "BAZ",
                    rule: Rule::Text,
                },
                Field {
                    name: "FOO",
                    rule: Rule::Length,
                },
            ],
        }
    }

    /// Variables exposed to client bundles. Every name starts with
    /// [`PUBLIC_PREFIX`].
    pub fn client() -> Self {
        Self {
            fields: vec![Field {
                name: "NEXT_PUBLIC_BAR",
                rule: Rule::Text,
            }],
        }
    }

    /// Combine two schemas. Fields of `other` are appended; a field with a
    /// name already present replaces the existing rule in place.
    pub fn merge(&self, other: &Schema) -> Schema {
        let mut fields = self.fields.clone();
        for field in &other.fields {
            match fields.iter_mut().find(|f| f.name == field.name) {
                Some(existing) => existing.rule = field.rule,
                None => fields.push(*field),
            }
        }
        Schema { fields }
    }

    /// Single-field schema for `name`, if declared here
    pub fn pick(&self, name: &str) -> Option<Schema> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|field| Schema {
                fields: vec![*field],
            })
    }

    pub fn rule(&self, name: &str) -> Option<Rule> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.rule)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Every variable name the application declares, server names first
    pub fn declared_names() -> Vec<&'static str> {
        Schema::server().merge(&Schema::client()).names().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_length_rule_coerces_strings() {
        assert_eq!(Rule::Length.check(Some(&text("abcde"))), Ok(Value::Number(5)));
        assert_eq!(Rule::Length.check(Some(&text("héllo"))), Ok(Value::Number(5)));
        assert_eq!(Rule::Length.check(None), Ok(Value::Number(0)));
        // Already coerced values collapse to zero but still validate
        assert_eq!(Rule::Length.check(Some(&Value::Number(7))), Ok(Value::Number(0)));
    }

    #[test]
    fn test_one_of_rule() {
        let rule = Rule::OneOf(NODE_ENV_VALUES);
        assert_eq!(rule.check(Some(&text("test"))), Ok(text("test")));

        let errors = rule.check(Some(&text("staging"))).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Invalid enum value. Expected 'development' | 'test' | 'production', received 'staging'"
                    .to_string()
            ]
        );

        assert_eq!(rule.check(None), Err(vec!["Required".to_string()]));
    }

    #[test]
    fn test_text_rule() {
        assert_eq!(Rule::Text.check(Some(&text("x"))), Ok(text("x")));
        assert_eq!(
            Rule::Text.check(Some(&text(""))),
            Err(vec!["String must contain at least 1 character(s)".to_string()])
        );
        assert_eq!(
            Rule::Text.check(Some(&Value::Number(3))),
            Err(vec!["Expected string, received number".to_string()])
        );
    }

    #[test]
    fn test_merge_and_pick() {
        let merged = Schema::server().merge(&Schema::client());
        let names: Vec<_> = merged.names().collect();
        assert_eq!(names, vec!["NODE_ENV", "BAZ", "FOO", "NEXT_PUBLIC_BAR"]);

        let picked = Schema::server().pick("FOO").unwrap();
        assert_eq!(picked.fields().len(), 1);
        assert_eq!(picked.rule("FOO"), Some(Rule::Length));

        assert!(Schema::server().pick("NEXT_PUBLIC_BAR").is_none());
        assert!(Schema::server().pick("PATH").is_none());
    }

    #[test]
    fn test_merge_replaces_duplicate_names() {
        let override_schema = Schema {
            fields: vec![Field {
                name: "BAZ",
                rule: Rule::Length,
            }],
        };
        let merged = Schema::server().merge(&override_schema);
        assert_eq!(merged.fields().len(), 3);
        assert_eq!(merged.rule("BAZ"), Some(Rule::Length));
    }

    #[test]
    fn test_client_names_carry_public_prefix() {
        assert!(Schema::client().names().all(|n| n.starts_with(PUBLIC_PREFIX)));
        assert!(!Schema::server().names().any(|n| n.starts_with(PUBLIC_PREFIX)));
    }
}
