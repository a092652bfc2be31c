//! Flat JSON records used as elements by the `mindex` tool.

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::types::{MindexError, MindexResult};

/// One input object. Scalar fields hold one value, array fields several;
/// every value is kept as its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Record {
    /// Position in the input array.
    pub id: usize,
    pub fields: BTreeMap<String, Vec<String>>,
}

impl Record {
    /// Convert one JSON object.
    pub fn from_json(id: usize, value: &Value) -> MindexResult<Self> {
        let Value::Object(object) = value else {
            return Err(MindexError::InvalidRecord {
                position: id,
                reason: "expected an object".to_string(),
            });
        };
        let mut fields = BTreeMap::new();
        for (name, value) in object {
            let values: Vec<String> = match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| scalar(id, name, item))
                    .collect::<MindexResult<Vec<_>>>()?
                    .into_iter()
                    .flatten()
                    .collect(),
                other => scalar(id, name, other)?.into_iter().collect(),
            };
            fields.insert(name.clone(), values);
        }
        Ok(Self { id, fields })
    }

    /// Values of `field`; empty when the field is absent or null.
    pub fn values(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the record has `field` at all.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

fn scalar(id: usize, field: &str, value: &Value) -> MindexResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err(MindexError::InvalidRecord {
            position: id,
            reason: format!("field '{}' is nested", field),
        }),
    }
}

/// Parse a JSON array of flat objects.
pub fn parse_records(content: &str) -> MindexResult<Vec<Rc<Record>>> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        return Err(MindexError::InvalidRecord {
            position: 0,
            reason: "input must be a JSON array".to_string(),
        });
    };
    items
        .iter()
        .enumerate()
        .map(|(id, item)| Record::from_json(id, item).map(Rc::new))
        .collect()
}

/// Read and parse a record file.
pub fn load_records(path: &Path) -> MindexResult<Vec<Rc<Record>>> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}
