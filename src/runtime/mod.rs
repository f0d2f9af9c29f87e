//! Runtime support: the per-run environment, the output sink, and
//! front-end input decoding.

pub mod env;
pub mod input;
pub mod io;

pub use env::{Env, StackId};
pub use input::{check_source, decode_input, LoadError};
pub use io::OutputSink;
