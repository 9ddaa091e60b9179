//! Schema-driven intake forms
//!
//! A loaded [`FormSchema`](crate::domain::FormSchema) is turned into a
//! [`FieldRegistry`]: the fixed contact fields (`name`, `phoneNumber`,
//! `emailAddress`) followed by the tenant's optional custom fields. The
//! [`FormEngine`] validates drafts against that registry and drives the
//! submission lifecycle; [`IntakePage`] ties schema loading and the engine
//! together for one visitor.

pub mod engine;
pub mod error;
pub mod page;
pub mod registry;
pub mod rules;
pub mod validation;

pub use engine::{FormEngine, SubmitOutcome};
pub use error::{FieldError, LoadError, SubmitError};
pub use page::{FieldView, FormView, IntakePage, PageView};
pub use registry::{FieldRegistry, FieldSpec};
pub use rules::FieldRule;
pub use validation::ValidationResult;
