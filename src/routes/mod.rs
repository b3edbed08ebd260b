use serde_json::json;

pub mod discounts;
pub mod pricing;

fn error_body(code: &str) -> serde_json::Value {
    json!({ "error": code })
}
