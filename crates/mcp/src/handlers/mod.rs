#![forbid(unsafe_code)]

mod analysis;
mod definitions;
mod dispatch;
mod hypotheses;
mod render;

pub(crate) use definitions::handler_definitions;
pub(crate) use dispatch::dispatch_handler;
