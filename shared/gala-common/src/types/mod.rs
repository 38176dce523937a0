//! Wire Types
//!
//! Request/response payloads shared between server and client.
//! Upload payloads are camelCase, reaction payloads snake_case — both
//! inherited from the gallery's existing wire contract.

mod photo;
mod reaction;
mod upload;

pub use photo::PhotoResponse;
pub use reaction::{BatchReactionsResponse, ReactionCount, ReactionsResponse, ToggleRequest};
pub use upload::{
    ConfirmPhoto, ConfirmRequest, ConfirmResponse, PresignFile, PresignRequest, PresignResponse,
    PresignedFile,
};
