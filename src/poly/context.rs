use std::sync::Arc;

use ahash::HashMap;
use smartstring::{LazyCompact, SmartString};

use super::order::MonomialOrder;
use crate::error::{PolyError, Result};

pub type Variable = SmartString<LazyCompact>;

/// The shared, read-only description of a polynomial family: the number of
/// variables, their names and the monomial ordering.
///
/// Polynomials hold an `Arc<Context>`. Two polynomials can only be combined
/// when they point to equal contexts.
#[derive(Clone, Debug)]
pub struct Context {
    order: MonomialOrder,
    variables: Vec<Variable>,
    index: HashMap<Variable, usize>,
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.variables == other.variables
    }
}

impl Eq for Context {}

impl Context {
    /// Create a context with `nvars` variables named `x1, ..., xn`.
    pub fn new(nvars: usize, order: MonomialOrder) -> Result<Arc<Context>> {
        if nvars == 0 {
            return Err(PolyError::invalid(
                "a polynomial context needs at least one variable",
            ));
        }

        Context::with_variables((1..=nvars).map(|i| format!("x{}", i)), order)
    }

    /// Create a context with explicitly named variables. The names must be unique
    /// identifiers: a letter or `_` followed by letters, digits or `_`.
    pub fn with_variables<I, S>(names: I, order: MonomialOrder) -> Result<Arc<Context>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut variables = vec![];
        let mut index = HashMap::default();

        for name in names {
            let name = name.as_ref();
            if !is_identifier(name) {
                return Err(PolyError::invalid(format!(
                    "'{}' is not a valid variable name",
                    name
                )));
            }

            let v = Variable::from(name);
            if index.insert(v.clone(), variables.len()).is_some() {
                return Err(PolyError::invalid(format!(
                    "the variable '{}' occurs more than once",
                    name
                )));
            }
            variables.push(v);
        }

        if variables.is_empty() {
            return Err(PolyError::invalid(
                "a polynomial context needs at least one variable",
            ));
        }

        Ok(Arc::new(Context {
            order,
            variables,
            index,
        }))
    }

    #[inline]
    pub fn nvars(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn order(&self) -> MonomialOrder {
        self.order
    }

    #[inline]
    pub fn is_degree_ordering(&self) -> bool {
        self.order.is_degree()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable_name(&self, var: usize) -> &str {
        &self.variables[var]
    }

    /// Look up the index of a variable by name.
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Check that `var` is a valid variable index.
    pub fn check_variable(&self, var: usize) -> Result<()> {
        if var >= self.nvars() {
            Err(PolyError::invalid(format!(
                "variable index {} is out of range for a context with {} variables",
                var,
                self.nvars()
            )))
        } else {
            Ok(())
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
