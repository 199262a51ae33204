//! Tool server exposing the Arcane API over JSON-RPC on stdio.
//!
//! # Overview
//! Every Arcane operation is registered as a named tool with a JSON Schema
//! for its arguments. A language-model host lists the tools, then calls
//! them one line at a time over stdin/stdout.
//!
//! # Design
//! - `registry` owns the tool table and argument decoding. Handlers are
//!   plain functions of `(&ArcaneClient, Args)`.
//! - `tools` holds one module per resource, each adding its tools to a
//!   registry.
//! - `server` speaks newline-delimited JSON-RPC 2.0 over any
//!   `BufRead`/`Write` pair and never writes anything but protocol
//!   messages. Logs go to stderr.
//! - Failures of the Arcane API are tool results flagged `isError`, not
//!   protocol errors, so the host can show them to the model.

pub mod cli;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod tools;

pub use registry::{InputSchema, ToolError, ToolOutput, ToolRegistry};
pub use server::Server;
