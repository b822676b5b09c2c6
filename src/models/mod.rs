use serde::{Deserialize, Deserializer, Serialize};

/// Inbound body shared by all three generation endpoints.
///
/// Every field is optional at the wire level so that a missing field turns
/// into a 400 from the handler instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreationRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    pub ingredients: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub style: Option<String>,
}

impl CreationRequest {
    /// Ingredients, if present and not blank.
    pub fn ingredients(&self) -> Option<&str> {
        non_blank(self.ingredients.as_deref())
    }

    /// Quantity, if present and not blank.
    pub fn quantity(&self) -> Option<&str> {
        non_blank(self.quantity.as_deref())
    }

    /// Style; empty when the caller left it out.
    pub fn style(&self) -> &str {
        self.style.as_deref().map(str::trim).unwrap_or("")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Quantities like `2` arrive as JSON numbers from some callers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeResult {
    pub menu_name: String,
    pub instructions: String,
}

impl RecipeResult {
    pub fn to_json_string(&self) -> String {
        // Two plain string fields cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageResult {
    pub image_url: String,
}

/// Combined endpoint payload. `recipe` is the serialized recipe object, which
/// the web client runs through `JSON.parse`.
#[derive(Debug, Clone, Serialize)]
pub struct CreationResponse {
    pub image_url: String,
    pub recipe: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
