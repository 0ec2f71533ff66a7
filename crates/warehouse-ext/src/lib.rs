#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::pedantic
)]
#![forbid(unsafe_code)]

pub mod rest {
    mod detail;
    pub use detail::{Detail, DetailEntry, ValidationItem};

    mod error;
    pub use error::{ErrorBody, ErrorOrigin, RawError};
}

#[cfg(test)]
mod tests {
    use super::rest::*;

    #[test]
    fn test_fastapi_validation_body_deserialization() {
        let body = serde_json::json!({
            "detail": [
                {
                    "type": "missing",
                    "loc": ["body", "warehouse_dimensions", "width"],
                    "msg": "Field required",
                    "input": {}
                },
                {
                    "type": "greater_than",
                    "loc": ["body", "workstation_configs", 0, "aisle_space"],
                    "msg": "Input should be greater than 0",
                    "ctx": {"gt": 0}
                }
            ]
        });

        let body: ErrorBody = serde_json::from_value(body).unwrap();
        let Some(Detail::Items(items)) = body.detail else {
            panic!("Expected Detail::Items");
        };
        assert_eq!(
            items,
            vec![
                DetailEntry::Item(ValidationItem::new(
                    ["body", "warehouse_dimensions", "width"],
                    "Field required"
                )),
                DetailEntry::Item(ValidationItem::new(
                    ["body", "workstation_configs", "0", "aisle_space"],
                    "Input should be greater than 0"
                )),
            ]
        );
        assert!(body.message.is_none());
    }
}
