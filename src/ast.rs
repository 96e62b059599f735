use std::fmt;

use crate::util::num::format_number;

/// Where a tree node came from.
///
/// Parsed nodes are built from a row's formula. Buff nodes are synthesized by
/// the modifier overlay and only ever appear in display trees. The origin is
/// rendering metadata: evaluation never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Built by the parser.
    #[default]
    Parsed,
    /// Introduced by an active buff.
    Buff,
}

/// An arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
}

impl BinaryOperator {
    /// Applies the operator with IEEE-754 double semantics.
    ///
    /// Division by zero is not an error: it yields an infinity or `NaN`.
    #[must_use]
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Sub => left - right,
            Self::Mul => left * right,
            Self::Div => left / right,
        }
    }
}

/// A node of a formula tree.
///
/// Trees are immutable once built. The overlay builds new nodes around an
/// existing tree instead of flagging nodes in place, which is why every
/// variant that a buff can synthesize carries its [`Origin`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal.
    Value {
        /// The literal value.
        value:  f64,
        /// Whether the parser or a buff produced this node.
        origin: Origin,
    },
    /// A binary arithmetic operation.
    Operator {
        /// Left operand.
        left:   Box<Self>,
        /// The operator.
        op:     BinaryOperator,
        /// Right operand.
        right:  Box<Self>,
        /// Whether the parser or a buff produced this node.
        origin: Origin,
    },
    /// A reference to a row defined earlier in the chain.
    Reference {
        /// The referenced row name.
        name: String,
    },
    /// A parenthesized sub-expression. Only affects display.
    Paren {
        /// The grouped expression.
        inner: Box<Self>,
    },
}

impl Expr {
    /// Creates a parsed numeric literal.
    #[must_use]
    pub const fn value(value: f64) -> Self {
        Self::Value { value,
                      origin: Origin::Parsed }
    }

    /// Creates a parsed binary operation.
    #[must_use]
    pub fn operator(left: Self, op: BinaryOperator, right: Self) -> Self {
        Self::Operator { left: Box::new(left),
                         op,
                         right: Box::new(right),
                         origin: Origin::Parsed }
    }

    /// Creates a reference to a named row.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference { name: name.into() }
    }

    /// Wraps an expression in parentheses.
    #[must_use]
    pub fn paren(inner: Self) -> Self {
        Self::Paren { inner: Box::new(inner) }
    }

    /// Returns the origin of this node. References and parentheses are always
    /// parsed.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        match self {
            Self::Value { origin, .. } | Self::Operator { origin, .. } => *origin,
            Self::Reference { .. } | Self::Paren { .. } => Origin::Parsed,
        }
    }

    /// Returns `true` if this node or any node below it was introduced by a
    /// buff.
    #[must_use]
    pub fn contains_buff(&self) -> bool {
        match self {
            Self::Value { origin, .. } => *origin == Origin::Buff,
            Self::Operator { left,
                             right,
                             origin,
                             .. } => {
                *origin == Origin::Buff || left.contains_buff() || right.contains_buff()
            },
            Self::Reference { .. } => false,
            Self::Paren { inner } => inner.contains_buff(),
        }
    }

    /// Returns `true` if the root of this tree is an operator node.
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        matches!(self, Self::Operator { .. })
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value { value, .. } => write!(f, "{}", format_number(*value)),
            Self::Operator { left, op, right, .. } => write!(f, "{left} {op} {right}"),
            Self::Reference { name } => write!(f, "{name}"),
            Self::Paren { inner } => write!(f, "({inner})"),
        }
    }
}
