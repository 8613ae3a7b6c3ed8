//! Career recommendation flow: prompt formatting, the single upstream
//! completion call, and the HTTP endpoint that ties them together.

pub mod handlers;
pub mod prompts;
pub mod requester;
