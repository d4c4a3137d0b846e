use std::fmt;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Nse,
    #[clap(name = "stockprices")]
    Stockprices,
    Stooq,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nse => write!(f, "nse"),
            Self::Stockprices => write!(f, "stockprices"),
            Self::Stooq => write!(f, "stooq"),
        }
    }
}
