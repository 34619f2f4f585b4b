//! Pipeline stages for page-range summarization.
//!
//! Each submodule implements exactly one step, so each can be tested
//! without the others (and without a live provider).
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ prompt ──▶ llm (primary) ──▶ llm (fallback) ──▶ recover
//! (pdf text)  (prompts)   (raw text)        only on failure    (JSON)
//! ```
//!
//! 1. [`extract`] — parse the PDF on the blocking pool and slice the
//!    requested page window out of the flattened text
//! 2. [`crate::prompts`] — render the instruction prompt
//! 3. [`llm`] — the two provider adapters; the only stage with network I/O
//! 4. [`recover`] — pull the `{"summary": …}` object out of a fallback reply

pub mod extract;
pub mod llm;
pub mod recover;
