//! RPC-style procedures.
//!
//! Each procedure is a `POST /rpc/{namespace}.{name}` taking and returning a
//! JSON object. They back the multi-step forms where a REST verb on a single
//! resource would not describe the operation.

pub mod attachment;
pub mod clinic;
pub mod evaluation;
