use crate::state::InvocationId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartScrape {
        invocation: InvocationId,
        url: String,
    },
}
