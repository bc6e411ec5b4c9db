use serde::{Serialize, Deserialize};

/// One line of the price list, as returned by the collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    /// Sequential identifier, starting at 1
    pub id: u32,

    /// Display name, e.g. "Замена стекла"
    pub name: String,

    /// Price in whole roubles
    pub price: u64,
}

/// A full service record, as returned by the item endpoint.
/// This is the canonical data model used by the server catalog and the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDetails {
    /// Sequential identifier, starting at 1
    pub id: u32,

    /// Display name, e.g. "Замена стекла"
    pub name: String,

    /// Price in whole roubles
    pub price: u64,

    /// Free-form description
    pub content: String,
}

impl ServiceDetails {
    /// Projection without the description
    pub fn summary(&self) -> ServiceSummary {
        ServiceSummary {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glass() -> ServiceDetails {
        ServiceDetails {
            id: 1,
            name: "Замена стекла".to_string(),
            price: 21_000,
            content: "Стекло оригинал от Apple".to_string(),
        }
    }

    #[test]
    fn test_summary_omits_content() {
        let json = serde_json::to_string(&glass().summary()).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"Замена стекла","price":21000}"#);
    }

    #[test]
    fn test_details_wire_shape() {
        let json = serde_json::to_string(&glass()).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"name":"Замена стекла","price":21000,"content":"Стекло оригинал от Apple"}"#
        );
    }
}
