/// A state of a DFA.
/// It contains the state identifier and a boolean flag indicating whether the
/// state is accepting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DfaNode {
    name: String,
    accepting: bool,
}

impl DfaNode {
    pub fn new(name: String, accepting: bool) -> Self {
        DfaNode { name, accepting }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }
}
