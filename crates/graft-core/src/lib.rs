//! Core runtime for Graft: the value model, constraint index, upsert
//! planner, mutation-field synthesizer, and the execution-adapter boundary.

pub mod error;
pub mod exec;
pub mod index;
pub mod obs;
pub mod plan;
pub mod record;
pub mod synth;
pub mod value;

pub use error::Error;

///
/// Prelude
///
/// Domain vocabulary only. No adapters, sinks, or planners are
/// re-exported here.
///

pub mod prelude {
    pub use crate::{
        record::Record,
        value::{Float64, Value},
    };
    pub use graft_schema::prelude::*;
}
