// furrow/src/wizard/mod.rs

//! Linear multi-step form wizards.
//!
//! A [`Wizard`] is the static definition (ordered steps, required-field gates,
//! hooks); a [`WizardSession`] is one user's progress through it. Navigation
//! never skips a step: "next" only moves forward once the current step's gate
//! reports no missing fields, "previous" does nothing on the first step.

pub mod definition;
pub mod navigation;
pub mod session;

pub use definition::{RequiredFields, Wizard, WizardStep};
pub use navigation::Transition;
pub use session::WizardSession;
