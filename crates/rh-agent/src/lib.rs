//! `rh-agent` — the lower level of the rolling-horizon loop.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                          |
//! |---------------|-------------------------------------------------------------------|
//! | [`request`]   | `AgentRequest`, `SupplyBlock`, `AgentResponse`, `ResponseStatus`  |
//! | [`context`]   | `ReactorContext<'a>` — read-only view of data and state           |
//! | [`reactor`]   | `AgentReactor` trait, `ReactorRegistry`                           |
//! | [`builtin`]   | `AcceptAll`, `ProfitMaxFlowStub`, `CapacityLimited`, `RandomShortfall` |
//! | [`exec`]      | `ExecReactor` — external agent over JSON stdin/stdout             |
//! | [`error`]     | `ReactorError`, `ReactorResult<T>`                                |
//!
//! # Design notes
//!
//! The simulator only interprets a response's status and realized flow.
//! A reactor that cannot honour a commitment returns
//! [`ResponseStatus::Infeasible`]; that is a normal answer, not an error.
//! `Err` is reserved for reactors that could not produce an answer at all.

pub mod builtin;
pub mod context;
pub mod error;
pub mod exec;
pub mod reactor;
pub mod request;

#[cfg(test)]
mod tests;

pub use builtin::{AcceptAll, CapacityLimited, ProfitMaxFlowStub, RandomShortfall};
pub use context::ReactorContext;
pub use error::{ReactorError, ReactorResult};
pub use exec::ExecReactor;
pub use reactor::{AgentReactor, ReactorFactory, ReactorRegistry};
pub use request::{AgentRequest, AgentResponse, ResponseStatus, SupplyBlock};
