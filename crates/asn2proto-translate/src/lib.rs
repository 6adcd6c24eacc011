//! Translates a resolved ASN.1 module AST ([`asn2proto_core::ast`]) into
//! a Protobuf IR ([`asn2proto_core::ir`]) and renders proto3 text with
//! `validate.v1` field rules.
//!
//! The pipeline is one module per stage: [`ident`] transforms
//! identifiers, [`constraints`] compiles subtype constraints,
//! [`values`] renders literal values, [`resolver`] follows `TYPEREF`
//! chains, [`translate`] dispatches a single expression to IR, and
//! [`render`] walks the finished IR to text. [`sink`] is where that
//! text ends up.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod constraints;
pub mod error;
pub mod ident;
pub mod render;
pub mod resolver;
pub mod sink;
pub mod translate;
pub mod values;

pub use error::{Result, TranslateError};
pub use render::{render, render_andfree, RenderOptions};
pub use resolver::{IdentityResolver, ResolvedTerminal, TerminalTypeResolver};
pub use sink::OutputSink;
pub use translate::translate_expr;
