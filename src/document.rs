//! Document-literal predicate source.
//!
//! Applications that hold their filters as JSON-shaped documents (the usual
//! driver wire format) convert them into [`Predicate`] trees here. The
//! adapter understands the standard query surface: logical operators,
//! comparison and membership operators, `$not`, `$elemMatch` in both its
//! sub-document and scalar forms, and the document-examination operators the
//! analyzer later rejects.
//!
//! The adapter is strict: unknown operators and literals the value model
//! cannot represent are parse errors, not silent equality matches.

use serde_json::Value as Json;

use crate::ast::{FieldOp, Predicate};
use crate::errors::DocumentError;
use crate::value::Value;

/// Parses a filter document into a predicate tree.
pub fn parse(doc: &Json) -> Result<Predicate, DocumentError> {
    let object = doc.as_object().ok_or(DocumentError::NotADocument {
        context: "filter",
    })?;
    if object.is_empty() {
        return Ok(Predicate::Empty);
    }

    let mut clauses = Vec::with_capacity(object.len());
    for (key, value) in object {
        match key.as_str() {
            "$and" => clauses.push(Predicate::And(parse_clause_list("$and", value)?)),
            "$or" => clauses.push(Predicate::Or(parse_clause_list("$or", value)?)),
            "$nor" => clauses.push(Predicate::Nor(parse_clause_list("$nor", value)?)),
            "$where" => {
                let code = value.as_str().ok_or(DocumentError::OperandType {
                    operator: "$where",
                    expected: "a JavaScript string",
                })?;
                clauses.push(Predicate::field("$where", FieldOp::Where(code.to_owned())));
            }
            "$expr" => {
                clauses.push(Predicate::field("$expr", FieldOp::Expr(value.to_string())));
            }
            key if key.starts_with('$') => {
                return Err(DocumentError::UnknownOperator {
                    operator: key.to_owned(),
                })
            }
            path => clauses.push(parse_field_condition(path, value)?),
        }
    }

    Ok(match clauses.len() {
        1 => clauses.into_iter().next().expect("one clause"),
        _ => Predicate::And(clauses),
    })
}

fn parse_clause_list(operator: &'static str, value: &Json) -> Result<Vec<Predicate>, DocumentError> {
    let items = value
        .as_array()
        .ok_or(DocumentError::LogicalOperand { operator })?;
    items.iter().map(parse).collect()
}

/// Parses `{field: condition}` where the condition is either a literal or an
/// operator document.
fn parse_field_condition(path: &str, value: &Json) -> Result<Predicate, DocumentError> {
    let Some(object) = value.as_object() else {
        return Ok(Predicate::field(path, FieldOp::Eq(literal(path, value)?)));
    };
    if object.is_empty() || !object.keys().all(|k| k.starts_with('$')) {
        // A plain embedded document means equality on the whole document,
        // which the scalar value model does not represent.
        return Err(DocumentError::UnsupportedLiteral {
            path: path.to_owned(),
        });
    }

    let mut leaves = Vec::with_capacity(object.len());
    for (operator, operand) in object {
        match operator.as_str() {
            "$elemMatch" => leaves.push(parse_elem_match(path, operand)?),
            _ => leaves.push(Predicate::field(path, parse_operator(path, operator, operand)?)),
        }
    }
    Ok(match leaves.len() {
        1 => leaves.into_iter().next().expect("one leaf"),
        _ => Predicate::And(leaves),
    })
}

/// `$elemMatch` takes either a sub-filter over element fields or a bare
/// operator document applying to the element itself. The scalar form lowers
/// onto the base path directly; a multikey index on the array field serves
/// it the same way.
fn parse_elem_match(path: &str, operand: &Json) -> Result<Predicate, DocumentError> {
    let object = operand.as_object().ok_or(DocumentError::OperandType {
        operator: "$elemMatch",
        expected: "a document",
    })?;
    if !object.is_empty() && object.keys().all(|k| k.starts_with('$')) {
        let mut leaves = Vec::with_capacity(object.len());
        for (operator, inner) in object {
            leaves.push(Predicate::field(path, parse_operator(path, operator, inner)?));
        }
        return Ok(match leaves.len() {
            1 => leaves.into_iter().next().expect("one leaf"),
            _ => Predicate::And(leaves),
        });
    }
    Ok(Predicate::field(
        path,
        FieldOp::ElemMatch(Box::new(parse(operand)?)),
    ))
}

fn parse_operator(path: &str, operator: &str, operand: &Json) -> Result<FieldOp, DocumentError> {
    match operator {
        "$eq" => Ok(FieldOp::Eq(literal(path, operand)?)),
        "$ne" => Ok(FieldOp::Ne(literal(path, operand)?)),
        "$gt" => Ok(FieldOp::Gt(literal(path, operand)?)),
        "$gte" => Ok(FieldOp::Gte(literal(path, operand)?)),
        "$lt" => Ok(FieldOp::Lt(literal(path, operand)?)),
        "$lte" => Ok(FieldOp::Lte(literal(path, operand)?)),
        "$in" => Ok(FieldOp::In(literal_list(path, "$in", operand)?)),
        "$all" => Ok(FieldOp::All(literal_list(path, "$all", operand)?)),
        "$exists" => operand
            .as_bool()
            .map(FieldOp::Exists)
            .ok_or(DocumentError::OperandType {
                operator: "$exists",
                expected: "a boolean",
            }),
        "$not" => {
            let inner = operand
                .as_object()
                .filter(|o| o.len() == 1 && o.keys().all(|k| k.starts_with('$')))
                .ok_or(DocumentError::NotOperand)?;
            let (inner_op, inner_operand) = inner.iter().next().expect("one operator");
            Ok(FieldOp::Not(Box::new(parse_operator(
                path,
                inner_op,
                inner_operand,
            )?)))
        }
        // Reached through `$not`; a bare field-level `$elemMatch` goes
        // through `parse_elem_match`, which also lowers the scalar form.
        "$elemMatch" => Ok(FieldOp::ElemMatch(Box::new(parse(operand)?))),
        "$regex" => operand
            .as_str()
            .map(|p| FieldOp::Regex(p.to_owned()))
            .ok_or(DocumentError::OperandType {
                operator: "$regex",
                expected: "a pattern string",
            }),
        "$mod" => {
            let parts = operand
                .as_array()
                .filter(|a| a.len() == 2)
                .ok_or(DocumentError::OperandType {
                    operator: "$mod",
                    expected: "a [divisor, remainder] array",
                })?;
            match (parts[0].as_i64(), parts[1].as_i64()) {
                (Some(divisor), Some(remainder)) => Ok(FieldOp::Mod { divisor, remainder }),
                _ => Err(DocumentError::OperandType {
                    operator: "$mod",
                    expected: "a [divisor, remainder] array",
                }),
            }
        }
        "$type" => match operand {
            Json::String(name) => Ok(FieldOp::Type(name.clone())),
            Json::Number(code) => Ok(FieldOp::Type(code.to_string())),
            _ => Err(DocumentError::OperandType {
                operator: "$type",
                expected: "a type name or alias code",
            }),
        },
        "$size" => operand
            .as_i64()
            .map(FieldOp::Size)
            .ok_or(DocumentError::OperandType {
                operator: "$size",
                expected: "an integer",
            }),
        other => Err(DocumentError::UnknownOperator {
            operator: other.to_owned(),
        }),
    }
}

fn literal_list(path: &str, operator: &'static str, operand: &Json) -> Result<Vec<Value>, DocumentError> {
    let items = operand.as_array().ok_or(DocumentError::OperandType {
        operator,
        expected: "an array of literals",
    })?;
    items.iter().map(|item| literal(path, item)).collect()
}

fn literal(path: &str, value: &Json) -> Result<Value, DocumentError> {
    match value {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else {
                Ok(Value::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(items) => items
            .iter()
            .map(|item| literal(path, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Json::Object(_) => Err(DocumentError::UnsupportedLiteral {
            path: path.to_owned(),
        }),
    }
}
