//! An ordered fragment of instructions under construction.
//!
//! Every `Production` carries one of these to accumulate its synthesized
//! IR fragment before handing it up to its parent production.

use crate::instr::Instr;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Code(Vec<Instr>);

impl Code {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(instr: Instr) -> Self {
        Self(vec![instr])
    }

    pub fn push(&mut self, instr: Instr) {
        self.0.push(instr);
    }

    pub fn append(&mut self, mut other: Code) {
        self.0.append(&mut other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Instr> {
        self.0.last()
    }

    pub fn contains_call(&self) -> bool {
        self.0.iter().any(Instr::is_call)
    }

    pub fn ends_with_return(&self) -> bool {
        self.0.last().is_some_and(Instr::is_return)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instr> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Instr> {
        self.0
    }

    pub fn render(&self) -> Vec<String> {
        self.0.iter().map(Instr::to_string).collect()
    }
}

impl FromIterator<Instr> for Code {
    fn from_iter<I: IntoIterator<Item = Instr>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Code {
    type Item = Instr;
    type IntoIter = std::vec::IntoIter<Instr>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
