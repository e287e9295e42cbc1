pub type Result<T> = std::result::Result<T, Error>;

/// Precondition failures. Layout is a pure function of the input graph, so
/// every error means malformed input, never a transient condition.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cell `{cell}` references unknown bus node `{bus}`")]
    UnknownBus { cell: String, bus: String },

    #[error("extern cell `{cell}` has no bus nodes")]
    EmptyBusSet { cell: String },

    #[error("intern cell `{cell}` has an empty {side} side")]
    EmptySide { cell: String, side: &'static str },

    #[error("chain walk started from an empty candidate set")]
    EmptyChainSeed,
}
