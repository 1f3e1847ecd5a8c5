use rusqlite::types::Value;

/// An ordered column → value payload for writes, the dynamic counterpart of
/// a typed row. Later puts for the same column overwrite the earlier one.
#[derive(Debug, Clone, Default)]
pub struct Values {
    entries: Vec<(String, Value)>,
}

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<V: Into<Value>>(&mut self, column: &str, value: V) -> &mut Self {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| c == column) {
            entry.1 = value;
        } else {
            self.entries.push((column.to_string(), value));
        }
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        match self.get(column) {
            Some(Value::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        match self.get(column) {
            Some(Value::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.entries.iter().any(|(c, _)| c == column)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Build a value set from a JSON object. Scalars map to their SQL
    /// counterparts; arrays and nested objects are stored as JSON text,
    /// which is how survey item lists reach the surveys table.
    pub fn from_json(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        use serde_json::Value as Json;

        let mut values = Values::new();
        for (column, json) in object {
            let value = match json {
                Json::Null => Value::Null,
                Json::Bool(b) => Value::Integer(i64::from(*b)),
                Json::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        Value::Integer(i)
                    } else {
                        Value::Real(n.as_f64().unwrap_or_default())
                    }
                }
                Json::String(s) => Value::Text(s.clone()),
                Json::Array(_) | Json::Object(_) => Value::Text(json.to_string()),
            };
            values.put(column, value);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_overwrites_existing_column() {
        let mut values = Values::new();
        values.put("survey_pending_time", 100i64);
        values.put("survey_pending_time", 200i64);
        assert_eq!(values.len(), 1);
        assert_eq!(values.get_i64("survey_pending_time"), Some(200));
    }

    #[test]
    fn from_json_flattens_nested_values() {
        let object = serde_json::json!({
            "survey_id": "s1",
            "survey_version": 2,
            "survey_items": [{"survey_item_type": "message", "survey_item_id": "intro"}]
        });
        let values = Values::from_json(object.as_object().unwrap());
        assert_eq!(values.get_str("survey_id"), Some("s1"));
        assert_eq!(values.get_i64("survey_version"), Some(2));
        let items = values.get_str("survey_items").unwrap();
        assert!(items.starts_with('['));
    }
}
