use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VariableNamespace {
    Signal,
    Data,
    Scale,
    Group,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub namespace: VariableNamespace,
    pub name: String,
}

impl Variable {
    pub fn new(ns: VariableNamespace, name: &str) -> Self {
        Self {
            namespace: ns,
            name: String::from(name),
        }
    }

    pub fn new_signal(id: &str) -> Self {
        Self::new(VariableNamespace::Signal, id)
    }

    pub fn new_scale(id: &str) -> Self {
        Self::new(VariableNamespace::Scale, id)
    }

    pub fn new_data(id: &str) -> Self {
        Self::new(VariableNamespace::Data, id)
    }

    /// Variable standing for the instances of a group mark, named by its index
    /// among the group marks of the enclosing scope
    pub fn new_group(index: u32) -> Self {
        Self::new(VariableNamespace::Group, &index.to_string())
    }

    pub fn ns(&self) -> VariableNamespace {
        self.namespace
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let ns = match self.namespace {
            VariableNamespace::Signal => "signal",
            VariableNamespace::Data => "data",
            VariableNamespace::Scale => "scale",
            VariableNamespace::Group => "group",
        };
        write!(f, "{ns}:{}", self.name)
    }
}

// A variable with scope. Variables may be defined at the top level of the specification, or
// inside group marks. The scope encodes the level at which the variable is defined:
//   - An empty scope is the top level.
//   - Each element is the index into the collection of group marks at that level.
pub type ScopedVariable = (Variable, Vec<u32>);
