use serde::{Deserialize, Serialize};

/// Someone to be placed, with committees listed from most to least wanted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub choices: Vec<String>,
}

impl Person {
    pub fn new<I, S>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Person {
            name: name.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// 0-based position of `committee` in this person's list.
    pub fn rank_of(&self, committee: &str) -> Option<usize> {
        self.choices.iter().position(|c| c == committee)
    }
}
