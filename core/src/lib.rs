// furrow/src/lib.rs

//! Furrow: async step flows and linear form wizards.
//!
//! Two pieces of machinery share one context model:
//!  - [`Flow`]: a named, ordered list of steps with `before`/`on`/`after`
//!    hooks, run front to back against a shared [`ContextData`]. Used for
//!    request handling such as "validate, then persist".
//!  - [`Wizard`]: a strictly linear multi-step form. Each step carries a
//!    required-field gate that decides whether "next" is enabled, and the
//!    wizard runs hooks for its "save draft" and "submit" transitions.
//!
//! [`Flows`] is a registry keyed by context type so an application can
//! register its flows once at startup and run them from request handlers.

pub mod core;
pub mod error;
pub mod flow;
pub mod registry;
pub mod wizard;

// --- Re-exports for the Public API ---

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{FlowControl, FlowOutcome};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::flow::Flow;

pub use crate::wizard::{RequiredFields, Transition, Wizard, WizardSession, WizardStep};

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::Flows;

/*
    Typical use:
    1. Define a context struct `MyCtx` holding request input and slots for results.
    2. Build a `Flow<MyCtx, AppError>` from step names and attach handlers with `.on_step()`.
    3. Register it with a `Flows<AppError>` registry at startup.
    4. Per request, wrap a fresh `MyCtx` in `ContextData`, call `flows.run(ctx.clone())`,
       then read the results back out of `ctx`.
*/
