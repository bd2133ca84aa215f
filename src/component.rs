use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SeisError;

/// Channel interleave order of the sample payload.
pub const COMPONENTS_ORDER: [Component; 3] = [Component::Z, Component::X, Component::Y];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Component {
    Z,
    X,
    Y,
}

impl Component {
    /// Position inside one interleaved Z, X, Y sample frame.
    pub fn index(self) -> usize {
        match self {
            Component::Z => 0,
            Component::X => 1,
            Component::Y => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Component::Z => "Z",
            Component::X => "X",
            Component::Y => "Y",
        }
    }
}

impl FromStr for Component {
    type Err = SeisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        COMPONENTS_ORDER
            .iter()
            .copied()
            .find(|c| c.label() == s)
            .ok_or_else(|| SeisError::UnknownComponentName(format!("{s:?} (expected one of Z, X, Y)")))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
