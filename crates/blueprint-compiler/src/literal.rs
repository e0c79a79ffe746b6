//! Literal values to expressions

use blueprint_graph::PortValue;

use crate::ast::{self, Expr};
use crate::error::{CompileError, Result};

/// Turn a port or variable value into a literal expression
///
/// `what` names the value in the error when it cannot be serialized.
pub fn literal(what: &str, value: Option<&PortValue>) -> Result<Expr> {
    let value = match value {
        Some(value) => value,
        None => return Ok(ast::ident("undefined")),
    };
    Ok(match value {
        PortValue::Undefined => ast::ident("undefined"),
        PortValue::Null => Expr::Null,
        PortValue::Boolean(b) => Expr::Bool(*b),
        PortValue::Number(n) => Expr::Num(*n),
        PortValue::BigInt(digits) => {
            if !is_integer(digits) {
                return Err(CompileError::bad_param(format!(
                    "{} is not a valid big integer: '{}'",
                    what, digits
                )));
            }
            Expr::BigInt(digits.clone())
        }
        PortValue::String(s) => ast::string(s.clone()),
        PortValue::Structured(json) => Expr::Raw(json.to_string()),
        PortValue::Opaque(type_name) => {
            return Err(CompileError::NonSerializable(format!("{} ({})", what, type_name)));
        }
    })
}

/// Optional single leading minus, then at least one ASCII digit
fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileErrorKind;
    use crate::printer::print_expr;

    fn printed(value: PortValue) -> String {
        print_expr(&literal("test", Some(&value)).unwrap())
    }

    #[test]
    fn test_primitives() {
        assert_eq!(printed(PortValue::Number(1.5)), "1.5");
        assert_eq!(printed(PortValue::Boolean(true)), "true");
        assert_eq!(printed(PortValue::String("hi".into())), "\"hi\"");
        assert_eq!(printed(PortValue::BigInt("12".into())), "12n");
        assert_eq!(printed(PortValue::Null), "null");
        assert_eq!(printed(PortValue::Undefined), "undefined");
        assert_eq!(print_expr(&literal("missing", None).unwrap()), "undefined");
    }

    #[test]
    fn test_structured_embeds_json() {
        let value = PortValue::Structured(serde_json::json!({"x": [1, 2]}));
        assert_eq!(printed(value), r#"{"x":[1,2]}"#);
    }

    #[test]
    fn test_opaque_is_not_serializable() {
        let err = literal("Port value (n1:in)", Some(&PortValue::Opaque("Canvas".into()))).unwrap_err();
        assert_eq!(err.kind(), CompileErrorKind::NonSerializable);
        assert!(err.to_string().contains("Canvas"));
    }

    #[test]
    fn test_malformed_bigint() {
        for bad in ["12a", "", "-", "--5", "5-", "+5"] {
            let err = literal("v", Some(&PortValue::BigInt(bad.into()))).unwrap_err();
            assert_eq!(err.kind(), CompileErrorKind::BadParameter, "{:?}", bad);
        }
        assert_eq!(printed(PortValue::BigInt("-5".into())), "-5n");
    }
}
