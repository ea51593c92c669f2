//! Constraint operators and their evaluation
//!
//! Supports the comparison operators used in Terraform version constraints,
//! including the pessimistic operator `~>`.

use super::semver::{parse, ParsedVersion, SemanticVersion};
use crate::error::ConstraintError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A constraint operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    /// `~>`: allows the rightmost given component to increment
    #[serde(rename = "~>")]
    Pessimistic,
}

impl Operator {
    /// Returns the textual form of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Pessimistic => "~>",
        }
    }
}

impl FromStr for Operator {
    type Err = ConstraintError;

    /// An empty operator means `=`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "=" | "==" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "~>" => Ok(Operator::Pessimistic),
            other => Err(ConstraintError::UnknownOperator {
                operator: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluates `a <op> b`
///
/// Any comparison with an invalid operand is `false`, including `!=`.
/// `~>` fails loudly when `b` does not have two or three components.
pub fn evaluate(
    a: &ParsedVersion,
    op: Operator,
    b: &ParsedVersion,
) -> Result<bool, ConstraintError> {
    let (Some(a), Some(b)) = (a.as_version(), b.as_version()) else {
        return Ok(false);
    };

    let result = match op {
        Operator::Eq => a == b,
        Operator::Ne => a != b,
        Operator::Lt => a < b,
        Operator::Le => a <= b,
        Operator::Gt => a > b,
        Operator::Ge => a >= b,
        Operator::Pessimistic => {
            let (lower, upper) = pessimistic_range(b)?;
            *a >= lower && *a < upper
        }
    };

    Ok(result)
}

/// Expands `~> b` into the half-open range `[b, upper)`
///
/// Fails when `b` does not have two or three components, or when the
/// incremented component would overflow.
pub fn pessimistic_range(
    b: &SemanticVersion,
) -> Result<(SemanticVersion, SemanticVersion), ConstraintError> {
    let overflow = || ConstraintError::ComponentOverflow {
        version: b.to_string(),
    };
    let upper = match b.components() {
        &[major, _] => vec![major.checked_add(1).ok_or_else(overflow)?, 0, 0],
        &[major, minor, _] => vec![major, minor.checked_add(1).ok_or_else(overflow)?, 0],
        _ => {
            return Err(ConstraintError::InvalidConstraintShape {
                version: b.to_string(),
                components: b.len(),
            })
        }
    };
    Ok((b.clone(), SemanticVersion::new(upper)))
}

/// One side of a declared constraint, e.g. `>= 1.0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintBound {
    pub operator: Operator,
    pub version: String,
}

impl ConstraintBound {
    /// Creates a bound from an explicit operator
    pub fn new(operator: Operator, version: impl Into<String>) -> Self {
        Self {
            operator,
            version: version.into(),
        }
    }

    /// Creates a bound from raw text; an empty operator defaults to `=`
    pub fn parse(operator: &str, version: impl Into<String>) -> Result<Self, ConstraintError> {
        Ok(Self::new(operator.parse()?, version))
    }

    /// Returns true if `candidate` satisfies this bound
    pub fn satisfied_by(&self, candidate: &ParsedVersion) -> Result<bool, ConstraintError> {
        evaluate(candidate, self.operator, &parse(&self.version))
    }
}

impl fmt::Display for ConstraintBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(a: &str, op: Operator, b: &str) -> bool {
        evaluate(&parse(a), op, &parse(b)).unwrap()
    }

    #[test]
    fn test_operator_from_str() {
        assert_eq!("".parse::<Operator>().unwrap(), Operator::Eq);
        assert_eq!("=".parse::<Operator>().unwrap(), Operator::Eq);
        assert_eq!("!=".parse::<Operator>().unwrap(), Operator::Ne);
        assert_eq!(">=".parse::<Operator>().unwrap(), Operator::Ge);
        assert_eq!("~>".parse::<Operator>().unwrap(), Operator::Pessimistic);
        assert!("=>".parse::<Operator>().is_err());
    }

    #[test]
    fn test_operator_display() {
        assert_eq!(Operator::Pessimistic.to_string(), "~>");
        assert_eq!(Operator::Le.to_string(), "<=");
    }

    #[test]
    fn test_basic_operators() {
        assert!(eval("1.0.0", Operator::Eq, "1.0.0"));
        assert!(eval("1.0.1", Operator::Ne, "1.0.0"));
        assert!(eval("1.9.0", Operator::Lt, "1.10.0"));
        assert!(eval("1.0.0", Operator::Le, "1.0.0"));
        assert!(eval("2.0", Operator::Gt, "1.99.99"));
        assert!(eval("2.0.0", Operator::Ge, "2.0"));
    }

    #[test]
    fn test_equality_matches_parsed_equality() {
        let pairs = [("1.2.3", "v1.2.3"), ("1.2", "1.2.0"), ("2", "2")];
        for (x, y) in pairs {
            assert_eq!(eval(x, Operator::Eq, y), parse(x) == parse(y));
        }
    }

    #[test]
    fn test_invalid_operand_is_false() {
        let invalid = ParsedVersion::Invalid;
        let valid = parse("1.0.0");
        for op in [
            Operator::Eq,
            Operator::Ne,
            Operator::Lt,
            Operator::Le,
            Operator::Gt,
            Operator::Ge,
            Operator::Pessimistic,
        ] {
            assert!(!evaluate(&valid, op, &invalid).unwrap());
            assert!(!evaluate(&invalid, op, &valid).unwrap());
        }
    }

    #[test]
    fn test_pessimistic_two_components() {
        assert!(eval("1.4.0", Operator::Pessimistic, "1.4"));
        assert!(eval("1.9.0", Operator::Pessimistic, "1.4"));
        assert!(!eval("2.0.0", Operator::Pessimistic, "1.4"));
        assert!(!eval("1.3.9", Operator::Pessimistic, "1.4"));
    }

    #[test]
    fn test_pessimistic_three_components() {
        assert!(eval("1.4.2", Operator::Pessimistic, "1.4.2"));
        assert!(eval("1.4.9", Operator::Pessimistic, "1.4.2"));
        assert!(!eval("1.5.0", Operator::Pessimistic, "1.4.2"));
        assert!(!eval("1.4.1", Operator::Pessimistic, "1.4.2"));
    }

    #[test]
    fn test_pessimistic_invalid_shape() {
        let err = evaluate(&parse("1.0.0"), Operator::Pessimistic, &parse("1")).unwrap_err();
        assert_eq!(
            err,
            ConstraintError::InvalidConstraintShape {
                version: "1".to_string(),
                components: 1,
            }
        );

        let err = evaluate(
            &parse("1.0.0"),
            Operator::Pessimistic,
            &parse("1.0.0-beta1"),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_pessimistic_range() {
        let bound = parse("0.12");
        let (lo, hi) = pessimistic_range(bound.as_version().unwrap()).unwrap();
        assert_eq!(lo.to_string(), "0.12");
        assert_eq!(hi.to_string(), "1.0.0");

        let bound = parse("1.4.2");
        let (_, hi) = pessimistic_range(bound.as_version().unwrap()).unwrap();
        assert_eq!(hi.to_string(), "1.5.0");
    }

    #[test]
    fn test_pessimistic_component_overflow() {
        let max = u64::MAX;
        for bound in [format!("{}.0", max), format!("1.{}.0", max)] {
            let err = evaluate(&parse("1.0.0"), Operator::Pessimistic, &parse(&bound)).unwrap_err();
            assert_eq!(err, ConstraintError::ComponentOverflow { version: bound });
        }

        // The untouched component may be at the limit
        assert!(eval(&format!("1.{}.5", max), Operator::Pessimistic, &format!("1.{}", max)));
    }

    #[test]
    fn test_constraint_bound_parse_defaults_to_eq() {
        let bound = ConstraintBound::parse("", "0.1.3").unwrap();
        assert_eq!(bound.operator, Operator::Eq);
        assert!(bound.satisfied_by(&parse("v0.1.3")).unwrap());
        assert!(!bound.satisfied_by(&parse("v0.1.4")).unwrap());
    }

    #[test]
    fn test_constraint_bound_display() {
        let bound = ConstraintBound::new(Operator::Pessimistic, "4.0");
        assert_eq!(bound.to_string(), "~> 4.0");
    }
}
