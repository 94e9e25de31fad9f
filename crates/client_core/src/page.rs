use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ListError;

pub const CURRENT_PAGE_FIELD: &str = "currentPage";
pub const TOTAL_PAGES_FIELD: &str = "totalPages";

#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
}

/// Decodes `{ <items_field>: [...], currentPage, totalPages }`.
pub fn parse_page<T: DeserializeOwned>(
    body: Value,
    items_field: &str,
    requested_page: u32,
) -> Result<PageResponse<T>, ListError> {
    let Value::Object(mut fields) = body else {
        return Err(ListError::Decode(format!(
            "expected a JSON object carrying '{items_field}'"
        )));
    };

    let total_pages = page_number(fields.get(TOTAL_PAGES_FIELD)).unwrap_or(1);
    let current_page = page_number(fields.get(CURRENT_PAGE_FIELD))
        .unwrap_or(requested_page.max(1))
        .min(total_pages);

    let items = match fields.remove(items_field) {
        None | Some(Value::Null) => Vec::new(),
        Some(raw @ Value::Array(_)) => serde_json::from_value(raw)
            .map_err(|err| ListError::Decode(format!("invalid '{items_field}' entry: {err}")))?,
        Some(_) => {
            return Err(ListError::Decode(format!(
                "'{items_field}' is not an array"
            )))
        }
    };

    Ok(PageResponse {
        items,
        current_page,
        total_pages,
    })
}

fn page_number(value: Option<&Value>) -> Option<u32> {
    let number = match value? {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|n| n.fract() == 0.0 && *n >= 0.0)
                .map(|n| n as u64)
        }),
        Value::String(raw) => raw.trim().parse::<u64>().ok(),
        _ => None,
    }?;

    u32::try_from(number).ok().filter(|n| *n >= 1)
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
