use serde_json::{Map, Value};

use super::error::FilterError;
use super::filter::is_identifier;
use super::types::FilterOp;

/// Turns a JSON condition tree into a parameterised SQL predicate.
/// Placeholders are numbered `$1..$n` in the order values are pushed.
pub struct FilterWhere {
    param_values: Vec<Value>,
}

impl FilterWhere {
    pub fn generate(where_data: &Value) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self { param_values: vec![] };
        let sql = filter_where.build(where_data)?;
        Ok((sql, filter_where.param_values))
    }

    fn build(&mut self, where_data: &Value) -> Result<String, FilterError> {
        match where_data {
            Value::Object(obj) => self.build_object(obj),
            _ => Err(FilterError::InvalidWhereClause("Unsupported WHERE format".to_string())),
        }
    }

    fn build_object(&mut self, obj: &Map<String, Value>) -> Result<String, FilterError> {
        let mut sql_conditions = Vec::with_capacity(obj.len());
        for (key, value) in obj {
            let sql = if key.starts_with('$') {
                self.build_logical(key, value)?
            } else {
                self.build_field(key, value)?
            };
            sql_conditions.push(sql);
        }
        Ok(match sql_conditions.len() {
            0 => "TRUE".to_string(),
            1 => sql_conditions.remove(0),
            _ => sql_conditions.join(" AND "),
        })
    }

    fn build_logical(&mut self, op: &str, value: &Value) -> Result<String, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                if arr.is_empty() {
                    return Ok(if op == "$and" { "TRUE" } else { "FALSE" }.to_string());
                }
                let mut sql_parts = Vec::with_capacity(arr.len());
                for v in arr {
                    let sql = self.build(v)?;
                    // A nested $and/$or already comes back parenthesised
                    sql_parts.push(if is_group(v) { sql } else { format!("({})", sql) });
                }
                let joiner = if op == "$and" { " AND " } else { " OR " };
                Ok(format!("({})", sql_parts.join(joiner)))
            }
            "$not" => Ok(format!("NOT ({})", self.build(value)?)),
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn build_field(&mut self, field: &str, value: &Value) -> Result<String, FilterError> {
        if !is_identifier(field) {
            return Err(FilterError::InvalidColumn(field.to_string()));
        }
        let quoted_column = format!("\"{}\"", field);

        match value {
            Value::Object(obj) => {
                let mut parts = Vec::with_capacity(obj.len());
                for (op_key, op_val) in obj {
                    let operator = FilterOp::parse(op_key)
                        .ok_or_else(|| FilterError::UnsupportedOperator(op_key.clone()))?;
                    parts.push(self.build_condition(&quoted_column, operator, op_val)?);
                }
                if parts.is_empty() {
                    return Err(FilterError::InvalidOperatorData(format!("No operator given for '{}'", field)));
                }
                Ok(parts.join(" AND "))
            }
            // Implicit equality: { field: value }
            other => self.build_condition(&quoted_column, FilterOp::Eq, other),
        }
    }

    fn build_condition(&mut self, column: &str, operator: FilterOp, data: &Value) -> Result<String, FilterError> {
        match operator {
            FilterOp::Eq if data.is_null() => Ok(format!("{} IS NULL", column)),
            FilterOp::Ne if data.is_null() => Ok(format!("{} IS NOT NULL", column)),
            FilterOp::In => match data {
                Value::Array(values) => {
                    if values.is_empty() { return Ok("FALSE".to_string()); }
                    let mut params = Vec::with_capacity(values.len());
                    for v in values {
                        params.push(self.param(v)?);
                    }
                    Ok(format!("{} IN ({})", column, params.join(", ")))
                }
                _ => Err(FilterError::InvalidOperatorData("$in requires array".to_string())),
            },
            FilterOp::Like | FilterOp::ILike if !data.is_string() => Err(FilterError::InvalidOperatorData(
                format!("{} requires a string pattern", operator.to_sql()),
            )),
            _ => {
                let placeholder = self.param(data)?;
                Ok(format!("{} {} {}", column, operator.to_sql(), placeholder))
            }
        }
    }

    fn param(&mut self, value: &Value) -> Result<String, FilterError> {
        match value {
            Value::Array(_) | Value::Object(_) => Err(FilterError::InvalidOperatorData(format!(
                "Expected scalar value, got {}",
                value
            ))),
            _ => {
                self.param_values.push(value.clone());
                Ok(format!("${}", self.param_values.len()))
            }
        }
    }
}

fn is_group(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        obj.len() == 1
            && obj
                .iter()
                .all(|(k, v)| (k == "$and" || k == "$or") && v.as_array().is_some_and(|a| !a.is_empty()))
    })
}
