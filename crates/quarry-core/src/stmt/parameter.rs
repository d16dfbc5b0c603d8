use super::{Type, Value};

/// Comparison operator used when a parameter renders as a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Like,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Direction of a parameter.
///
/// Only `Input` is accepted by the built-in providers; the other directions
/// are carried so that providers supporting them can read results back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Input,
    Output,
    InputOutput,
}

/// A single named parameter value.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Field name. Also the column the parameter compares against when it
    /// renders as a predicate.
    pub name: String,

    pub value: Value,

    /// Database type tag. Inferred from the value when not declared.
    pub ty: Option<Type>,

    pub direction: Direction,

    /// Declared length, e.g. the size of a string parameter.
    pub length: Option<usize>,

    pub op: Op,
}

/// A parameter, or an `AND` / `OR` composite of parameters.
///
/// Every leaf of a composite is registered with the command it is added
/// to; the composite itself only affects rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Leaf(Param),
    And(Vec<Parameter>),
    Or(Vec<Parameter>),
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Like => "LIKE",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
        }
    }
}

impl Param {
    pub fn ty(&self) -> Option<Type> {
        self.ty.or_else(|| self.value.ty())
    }
}

impl Parameter {
    /// Creates an input parameter comparing `name` with `op`.
    pub fn new(name: impl Into<String>, value: impl Into<Value>, op: Op) -> Parameter {
        Parameter::Leaf(Param {
            name: name.into(),
            value: value.into(),
            ty: None,
            direction: Direction::Input,
            length: None,
            op,
        })
    }

    pub fn eq(name: impl Into<String>, value: impl Into<Value>) -> Parameter {
        Parameter::new(name, value, Op::Eq)
    }

    pub fn ne(name: impl Into<String>, value: impl Into<Value>) -> Parameter {
        Parameter::new(name, value, Op::Ne)
    }

    pub fn lt(name: impl Into<String>, value: impl Into<Value>) -> Parameter {
        Parameter::new(name, value, Op::Lt)
    }

    pub fn le(name: impl Into<String>, value: impl Into<Value>) -> Parameter {
        Parameter::new(name, value, Op::Le)
    }

    pub fn gt(name: impl Into<String>, value: impl Into<Value>) -> Parameter {
        Parameter::new(name, value, Op::Gt)
    }

    pub fn ge(name: impl Into<String>, value: impl Into<Value>) -> Parameter {
        Parameter::new(name, value, Op::Ge)
    }

    /// Creates a `LIKE` parameter. The value comes first, mirroring how the
    /// pattern is usually at hand before the field it filters.
    pub fn like(value: impl Into<String>, name: impl Into<String>, length: usize) -> Parameter {
        Parameter::Leaf(Param {
            name: name.into(),
            value: Value::String(value.into()),
            ty: Some(Type::String),
            direction: Direction::Input,
            length: Some(length),
            op: Op::Like,
        })
    }

    pub fn and(parameters: impl IntoIterator<Item = Parameter>) -> Parameter {
        Parameter::And(parameters.into_iter().collect())
    }

    pub fn or(parameters: impl IntoIterator<Item = Parameter>) -> Parameter {
        Parameter::Or(parameters.into_iter().collect())
    }

    /// Declares the type tag of a leaf parameter. No effect on composites.
    pub fn with_type(mut self, ty: Type) -> Parameter {
        if let Parameter::Leaf(param) = &mut self {
            param.ty = Some(ty);
        }
        self
    }

    /// Declares the length of a leaf parameter. No effect on composites.
    pub fn with_length(mut self, length: usize) -> Parameter {
        if let Parameter::Leaf(param) = &mut self {
            param.length = Some(length);
        }
        self
    }

    /// Sets the direction of a leaf parameter. No effect on composites.
    pub fn with_direction(mut self, direction: Direction) -> Parameter {
        if let Parameter::Leaf(param) = &mut self {
            param.direction = direction;
        }
        self
    }

    /// Renders the parameter as a predicate, `field OP {prefix}field`.
    pub fn render(&self, prefix: &str) -> String {
        match self {
            Parameter::Leaf(param) => {
                format!("{} {} {}{}", param.name, param.op.as_str(), prefix, param.name)
            }
            Parameter::And(parameters) => render_composite(parameters, " AND ", prefix),
            Parameter::Or(parameters) => render_composite(parameters, " OR ", prefix),
        }
    }

    /// Returns every leaf, depth first.
    pub fn leaves(&self) -> Vec<&Param> {
        let mut leaves = vec![];
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Param>) {
        match self {
            Parameter::Leaf(param) => leaves.push(param),
            Parameter::And(parameters) | Parameter::Or(parameters) => {
                for parameter in parameters {
                    parameter.collect_leaves(leaves);
                }
            }
        }
    }

    pub(crate) fn into_leaves(self, leaves: &mut Vec<Param>) {
        match self {
            Parameter::Leaf(param) => leaves.push(param),
            Parameter::And(parameters) | Parameter::Or(parameters) => {
                for parameter in parameters {
                    parameter.into_leaves(leaves);
                }
            }
        }
    }
}

fn render_composite(parameters: &[Parameter], separator: &str, prefix: &str) -> String {
    let rendered: Vec<_> = parameters.iter().map(|p| p.render(prefix)).collect();
    format!("({})", rendered.join(separator))
}
