use serde_json::Value;

use super::error::FilterError;
use super::filter::is_identifier;
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Accepts `"col desc"`, `"a asc, b desc"`, `["a asc", "b desc"]` or `{ "col": "desc" }`
    pub fn validate_and_parse(order: &Value) -> Result<Vec<FilterOrderInfo>, FilterError> {
        match order {
            Value::Null => Ok(vec![]),
            Value::String(s) => Self::parse_order_string(s),
            Value::Array(arr) => {
                let mut out = Vec::new();
                for v in arr {
                    match v {
                        Value::String(s) => out.extend(Self::parse_order_string(s)?),
                        other => return Err(FilterError::InvalidOrder(format!("Expected string, got {}", other))),
                    }
                }
                Ok(out)
            }
            Value::Object(obj) => {
                let mut out = Vec::new();
                for (k, v) in obj {
                    let sort = Self::parse_direction(v.as_str().unwrap_or("asc"))?;
                    out.push(Self::column(k, sort)?);
                }
                Ok(out)
            }
            other => Err(FilterError::InvalidOrder(format!("Unsupported ORDER format: {}", other))),
        }
    }

    fn parse_order_string(s: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }
            let mut it = trimmed.split_whitespace();
            if let Some(col) = it.next() {
                let sort = Self::parse_direction(it.next().unwrap_or("asc"))?;
                if let Some(extra) = it.next() {
                    return Err(FilterError::InvalidOrder(format!("Unexpected token '{}'", extra)));
                }
                out.push(Self::column(col, sort)?);
            }
        }
        Ok(out)
    }

    fn parse_direction(dir: &str) -> Result<SortDirection, FilterError> {
        if dir.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if dir.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(FilterError::InvalidOrder(format!("Unknown sort direction '{}'", dir)))
        }
    }

    fn column(name: &str, sort: SortDirection) -> Result<FilterOrderInfo, FilterError> {
        if !is_identifier(name) {
            return Err(FilterError::InvalidColumn(name.to_string()));
        }
        Ok(FilterOrderInfo { column: name.to_string(), sort })
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() { return String::new(); }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}
