//! Boolean expression trees, and their lowering into a [`Fraig`].
//!
//! Sub-expressions are reference counted, so a tree can share sub-trees. Lowering is
//! memoized per shared sub-tree: a DAG-shaped expression is never unfolded into a tree.

use std::{
    fmt,
    ops::{BitAnd, BitOr, BitXor, Not},
    rc::Rc,
};

use ahash::AHashMap;

use crate::{Fraig, FraigHandle, sat::SatSolver};

#[derive(Debug, PartialEq, Eq)]
pub enum ExprKind {
    Zero,
    One,
    /// The variable with given index, complemented if `negated` is set.
    Literal { var: usize, negated: bool },
    Not(Expr),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Xor(Vec<Expr>),
}

/// A Boolean expression over variables `0, 1, ...`, cheap to clone.
///
/// ```rust
/// use fraig::{EquivResult, Fraig, expr::Expr};
/// let a = Expr::posi_literal(0);
/// let b = Expr::posi_literal(1);
/// let f = (a.clone() & !b.clone()) | (!a & b);
///
/// let mut fraig = Fraig::new();
/// let inputs = vec![fraig.make_input(), fraig.make_input()];
/// let h = fraig.make_expr(&f, &inputs);
/// let x = fraig.make_xor(inputs[0], inputs[1]);
/// assert_eq!(fraig.check_equiv(h, x), EquivResult::Equivalent);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr(Rc<ExprKind>);

impl Expr {
    fn new(kind: ExprKind) -> Self {
        Expr(Rc::new(kind))
    }

    pub fn zero() -> Self {
        Expr::new(ExprKind::Zero)
    }

    pub fn one() -> Self {
        Expr::new(ExprKind::One)
    }

    pub fn posi_literal(var: usize) -> Self {
        Expr::new(ExprKind::Literal {
            var,
            negated: false,
        })
    }

    pub fn nega_literal(var: usize) -> Self {
        Expr::new(ExprKind::Literal { var, negated: true })
    }

    /// Conjunction of the operands, [`Expr::one`] if there is none.
    pub fn and(operands: Vec<Expr>) -> Self {
        Expr::new(ExprKind::And(operands))
    }

    /// Disjunction of the operands, [`Expr::zero`] if there is none.
    pub fn or(operands: Vec<Expr>) -> Self {
        Expr::new(ExprKind::Or(operands))
    }

    /// Parity of the operands, [`Expr::zero`] if there is none.
    pub fn xor(operands: Vec<Expr>) -> Self {
        Expr::new(ExprKind::Xor(operands))
    }

    pub fn kind(&self) -> &ExprKind {
        &self.0
    }

    /// Evaluates the expression under an assignment of its variables.
    ///
    /// Panics if a variable has no value.
    pub fn eval(&self, assignment: &[bool]) -> bool {
        match self.kind() {
            ExprKind::Zero => false,
            ExprKind::One => true,
            ExprKind::Literal { var, negated } => assignment[*var] ^ negated,
            ExprKind::Not(e) => !e.eval(assignment),
            ExprKind::And(operands) => operands.iter().all(|e| e.eval(assignment)),
            ExprKind::Or(operands) => operands.iter().any(|e| e.eval(assignment)),
            ExprKind::Xor(operands) => operands
                .iter()
                .fold(false, |acc, e| acc ^ e.eval(assignment)),
        }
    }

    fn children(&self) -> &[Expr] {
        match self.kind() {
            ExprKind::Not(e) => std::slice::from_ref(e),
            ExprKind::And(operands) | ExprKind::Or(operands) | ExprKind::Xor(operands) => {
                operands
            }
            ExprKind::Zero | ExprKind::One | ExprKind::Literal { .. } => &[],
        }
    }

    fn key(&self) -> *const ExprKind {
        Rc::as_ptr(&self.0)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Self::Output {
        let simplified = match self.kind() {
            ExprKind::Zero => Some(Expr::one()),
            ExprKind::One => Some(Expr::zero()),
            ExprKind::Literal { var, negated } => Some(Expr::new(ExprKind::Literal {
                var: *var,
                negated: !negated,
            })),
            ExprKind::Not(e) => Some(e.clone()),
            _ => None,
        };
        simplified.unwrap_or_else(|| Expr::new(ExprKind::Not(self)))
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Self) -> Self::Output {
        Expr::and(vec![self, rhs])
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Self) -> Self::Output {
        Expr::or(vec![self, rhs])
    }
}

impl BitXor for Expr {
    type Output = Expr;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Expr::xor(vec![self, rhs])
    }
}

fn fmt_operands(f: &mut fmt::Formatter<'_>, operands: &[Expr], op: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, e) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", op)?;
        }
        write!(f, "{}", e)?;
    }
    write!(f, ")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::Zero => write!(f, "0"),
            ExprKind::One => write!(f, "1"),
            ExprKind::Literal { var, negated } => {
                write!(f, "{}v{}", if *negated { "~" } else { "" }, var)
            }
            ExprKind::Not(e) => write!(f, "~{}", e),
            ExprKind::And(operands) => fmt_operands(f, operands, "&"),
            ExprKind::Or(operands) => fmt_operands(f, operands, "|"),
            ExprKind::Xor(operands) => fmt_operands(f, operands, "^"),
        }
    }
}

impl<S: SatSolver> Fraig<S> {
    /// Builds the function of an expression, variable `i` being `inputs[i]`.
    ///
    /// Panics if the expression uses a variable with no handle in `inputs`.
    pub fn make_expr(&mut self, expr: &Expr, inputs: &[FraigHandle]) -> FraigHandle {
        // The expression outlives the walk, so sub-tree addresses are stable keys.
        let mut lowered: AHashMap<*const ExprKind, FraigHandle> = AHashMap::new();
        let mut stack: Vec<(&Expr, bool)> = vec![(expr, false)];

        while let Some((e, children_done)) = stack.pop() {
            if lowered.contains_key(&e.key()) {
                continue;
            }
            if !children_done {
                stack.push((e, true));
                for child in e.children() {
                    if !lowered.contains_key(&child.key()) {
                        stack.push((child, false));
                    }
                }
                continue;
            }

            let operands: Vec<FraigHandle> =
                e.children().iter().map(|c| lowered[&c.key()]).collect();
            let h = match e.kind() {
                ExprKind::Zero => FraigHandle::zero(),
                ExprKind::One => FraigHandle::one(),
                ExprKind::Literal { var, negated } => {
                    assert!(
                        *var < inputs.len(),
                        "Hey, you are trying to lower variable {} with only {} input handles.",
                        var,
                        inputs.len()
                    );
                    inputs[*var].invert_if(*negated)
                }
                ExprKind::Not(_) => !operands[0],
                ExprKind::And(_) if operands.is_empty() => FraigHandle::one(),
                ExprKind::And(_) => self.make_and_n(&operands),
                ExprKind::Or(_) if operands.is_empty() => FraigHandle::zero(),
                ExprKind::Or(_) => self.make_or_n(&operands),
                ExprKind::Xor(_) if operands.is_empty() => FraigHandle::zero(),
                ExprKind::Xor(_) => self.make_xor_n(&operands),
            };
            lowered.insert(e.key(), h);
        }

        lowered[&expr.key()]
    }
}
