use crate::QueryKey;

/// Side effects requested by [`crate::update`]; executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchQuery { key: QueryKey },
    FetchSchema,
}
