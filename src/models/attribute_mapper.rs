use crate::types::AttributeId;
use std::collections::HashMap;

/// Assigns dense ids to CRF attribute strings (`prefix_2=mi`, `is_last_word`, ...).
#[derive(Debug, Clone, Default)]
pub struct AttributeMapper {
    pub attribute_map: HashMap<String, AttributeId>,
    next_id: AttributeId,
}

impl AttributeMapper {
    /// Creates a new AttributeMapper
    pub fn new() -> Self {
        AttributeMapper {
            attribute_map: HashMap::new(),
            next_id: 0,
        }
    }

    /// Adds an attribute to the map if it doesn't exist,
    /// and returns its unique ID
    pub fn upsert_attribute(&mut self, attribute: &str) -> AttributeId {
        if let Some(&id) = self.attribute_map.get(attribute) {
            id
        } else {
            let id = self.next_id;
            self.attribute_map.insert(attribute.to_string(), id);
            self.next_id += 1;
            id
        }
    }

    /// Gets the ID for an attribute, or None if the attribute was never seen
    pub fn get_attribute_id(&self, attribute: &str) -> Option<AttributeId> {
        self.attribute_map.get(attribute).copied()
    }

    /// Gets the total number of unique attributes
    pub fn attribute_count(&self) -> usize {
        self.attribute_map.len()
    }
}
