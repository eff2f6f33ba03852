//! Removal of low-value fields from API response records
//!
//! GitLab responses carry many URLs, avatar links and internal IDs that cost
//! context without helping an agent. The filter drops a fixed denylist of paths
//! per entity type.

use serde::Serialize;
use serde_json::{Map, Value};

use super::entity::entity_config;

/// Drops denylisted field paths from decoded records.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    paths: &'static [&'static str],
}

impl FieldFilter {
    /// Creates a filter using the denylist registered for `entity_type`.
    pub fn for_entity(entity_type: &str) -> Self {
        Self {
            paths: entity_config(entity_type).filter_fields,
        }
    }

    /// Removes denylisted paths from every record of a list.
    ///
    /// A path `parent.child` removes `child` from `parent` when it is an object,
    /// and from each object element when it is a list. Deeper nesting is not
    /// visited. Input that is not a list is returned as-is.
    pub fn filter<T: Serialize + ?Sized>(&self, items: &T) -> Result<Value, serde_json::Error> {
        let mut value = serde_json::to_value(items)?;
        self.filter_value(&mut value);
        Ok(value)
    }

    /// Applies the denylist in place, for values already in generic form.
    pub fn filter_value(&self, value: &mut Value) {
        if let Value::Array(records) = value {
            for record in records.iter_mut() {
                if let Value::Object(map) = record {
                    self.filter_record(map);
                }
            }
        }
    }

    /// Removes denylisted paths from a single record.
    fn filter_record(&self, record: &mut Map<String, Value>) {
        for path in self.paths {
            match path.split_once('.') {
                None => {
                    record.remove(*path);
                }
                Some((parent, child)) => match record.get_mut(parent) {
                    Some(Value::Object(nested)) => {
                        nested.remove(child);
                    }
                    Some(Value::Array(elements)) => {
                        for element in elements.iter_mut() {
                            if let Value::Object(nested) = element {
                                nested.remove(child);
                            }
                        }
                    }
                    _ => {}
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_issue_top_level_fields() {
        let filter = FieldFilter::for_entity("issue");
        let records = json!([{
            "_links": {"self": "https://gitlab.example.com/api/v4/projects/1/issues/1"},
            "web_url": "https://gitlab.example.com/group/project/-/issues/1",
            "title": "Crash on startup"
        }]);

        let result = filter.filter(&records).unwrap();

        assert_eq!(result, json!([{ "title": "Crash on startup" }]));
    }

    #[test]
    fn test_filter_nested_object_and_list() {
        let filter = FieldFilter::for_entity("issue");
        let records = json!([{
            "author": {"name": "alice", "avatar_url": "a", "web_url": "w"},
            "assignees": [
                {"avatar_url": "x", "name": "y"},
                {"avatar_url": "x2", "web_url": "w2", "name": "z"},
                "not-an-object"
            ]
        }]);

        let result = filter.filter(&records).unwrap();

        assert_eq!(result[0]["author"], json!({"name": "alice"}));
        assert_eq!(
            result[0]["assignees"],
            json!([{"name": "y"}, {"name": "z"}, "not-an-object"])
        );
    }

    #[test]
    fn test_filter_does_not_recurse_deeper() {
        let filter = FieldFilter::for_entity("merge_request");
        let records = json!([{
            "author": {"profile": {"web_url": "deep"}, "web_url": "shallow"}
        }]);

        let result = filter.filter(&records).unwrap();

        assert_eq!(result[0]["author"], json!({"profile": {"web_url": "deep"}}));
    }

    #[test]
    fn test_filter_missing_fields_and_unknown_entity() {
        let filter = FieldFilter::for_entity("issue");
        let records = json!([{"title": "only a title"}, {}]);
        assert_eq!(filter.filter(&records).unwrap(), records);

        let noop = FieldFilter::for_entity("unknown");
        let records = json!([{"web_url": "kept"}]);
        assert_eq!(noop.filter(&records).unwrap(), records);
    }

    #[test]
    fn test_filter_non_list_passes_through() {
        let filter = FieldFilter::for_entity("project");
        let single = json!({"web_url": "kept", "name": "p"});
        assert_eq!(filter.filter(&single).unwrap(), single);
    }
}
