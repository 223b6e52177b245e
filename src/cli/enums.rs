//! CLI enum types.

use clap::ValueEnum;

use crate::gesture::FirstClick;

/// First-click policy as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FirstClickArg {
    #[default]
    Immediate,
    AfterCooldown,
}

impl From<FirstClickArg> for FirstClick {
    fn from(arg: FirstClickArg) -> Self {
        match arg {
            FirstClickArg::Immediate => FirstClick::Immediate,
            FirstClickArg::AfterCooldown => FirstClick::AfterCooldown,
        }
    }
}
