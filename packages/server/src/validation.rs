//! Per-label payload validation for node create and update requests
//!
//! Rules check key presence only. Labels without rules accept any object.

use neo4j_mcp_core::models::Properties;

/// Check `data` against the rules registered for `label`
///
/// Returns every failed rule, in rule order.
///
/// ```rust
/// use neo4j_mcp_server::validation::validate_node_data;
/// use serde_json::json;
///
/// let data = json!({"title": "Lamp"}).as_object().cloned().unwrap();
/// let errors = validate_node_data("Product", &data).unwrap_err();
/// assert_eq!(errors, vec!["Price is required".to_string()]);
/// ```
pub fn validate_node_data(label: &str, data: &Properties) -> Result<(), Vec<String>> {
    let required: &[(&str, &str)] = match label {
        "Person" => &[("name", "Name is required")],
        "Product" => &[("title", "Title is required"), ("price", "Price is required")],
        _ => &[],
    };

    let errors: Vec<String> = required
        .iter()
        .filter(|(key, _)| !data.contains_key(*key))
        .map(|(_, message)| message.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
