use super::WarehouseError;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

fn is_plain_identifier(part: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]{0,127}$").ok())
        .as_ref()
        .map_or(false, |re| re.is_match(part))
}

/// A table, view or schema name that is safe to splice into statement text.
///
/// Identifiers cannot be bound as placeholders, so they are only ever taken from
/// configuration, checked against a strict pattern and emitted double-quoted.
/// Values supplied by users are always bound instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    schema: Option<String>,
    name: String,
}

impl Identifier {
    /// Accepts `name` or `schema.name`.
    pub fn parse(raw: &str) -> Result<Self, WarehouseError> {
        let raw = raw.trim();
        let mut parts = raw.split('.');
        let (schema, name) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), None, None) => (None, name),
            (Some(schema), Some(name), None) => (Some(schema), name),
            _ => return Err(WarehouseError::InvalidIdentifier(raw.to_string())),
        };

        for part in schema.iter().chain(std::iter::once(&name)) {
            if !is_plain_identifier(part) {
                return Err(WarehouseError::InvalidIdentifier(raw.to_string()));
            }
        }

        Ok(Self {
            schema: schema.map(str::to_string),
            name: name.to_string(),
        })
    }

    /// Parses a bare schema name. `schema.name` forms are rejected.
    pub fn schema_name(raw: &str) -> Result<String, WarehouseError> {
        let parsed = Self::parse(raw)?;
        if parsed.schema.is_some() {
            return Err(WarehouseError::InvalidIdentifier(raw.trim().to_string()));
        }
        Ok(parsed.name)
    }

    /// Qualifies an unqualified name with `schema`; already qualified names are kept.
    pub fn in_schema(mut self, schema: &str) -> Result<Self, WarehouseError> {
        if self.schema.is_none() {
            self.schema = Some(Self::schema_name(schema)?);
        }
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Quoted form for statement text, e.g. `"trial_balance"."audit_log"`.
    pub fn quoted(&self) -> String {
        match &self.schema {
            Some(schema) => format!("\"{}\".\"{}\"", schema, self.name),
            None => format!("\"{}\"", self.name),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
