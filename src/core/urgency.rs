use std::fmt::{Display, Formatter};

use crate::quantity::ratios::Multiplier;

/// Request priority, scales the fixed base charge only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Urgency {
    #[default]
    #[value(alias = "1", alias = "1.0")]
    Normal,

    #[value(alias = "1.5")]
    Urgent,

    #[value(alias = "2", alias = "2.0")]
    Critical,
}

impl Urgency {
    pub const fn coefficient(self) -> Multiplier {
        match self {
            Self::Normal => Multiplier(1.0),
            Self::Urgent => Multiplier(1.5),
            Self::Critical => Multiplier(2.0),
        }
    }
}

impl Display for Urgency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Urgent => write!(f, "Urgent"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}
