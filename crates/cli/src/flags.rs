use clap::ValueEnum;
use ir_lookup::MatchMode;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum MatchModeFlag {
    Substring,
    Exact,
}

impl MatchModeFlag {
    pub(crate) const fn as_domain(self) -> MatchMode {
        match self {
            MatchModeFlag::Substring => MatchMode::Substring,
            MatchModeFlag::Exact => MatchMode::Exact,
        }
    }
}
