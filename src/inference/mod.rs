//! Inference generation over the (answers x questions) grid.
//!
//! Every pair is independent, so pairs run on blocking worker tasks bounded by a
//! semaphore. Results are slotted back by `(answer index, question index)`, so the
//! artifact's rows always line up with the question order regardless of completion
//! order. The first failing pair aborts the whole run; no partial artifact is ever
//! returned.

mod error;
mod generator;


pub use error::{GenerationError, GenerationResult};
pub use generator::InferenceGenerator;
