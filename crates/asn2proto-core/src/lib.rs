//! Shared data model for the `asn2proto` translator.
//!
//! This crate provides the two trees the translator sits between: the
//! [`ast`] module models the fully-resolved ASN.1 expression tree handed
//! down by the (external) parser and fixer passes, and the [`ir`] module
//! models the Protobuf intermediate representation the translator builds
//! on the way to rendered `.proto` text.
//!
//! Both `asn2proto-translate` (the translator and renderer) and any CLI
//! or build-script frontend depend on these shared types. You should not
//! need anything beyond them to embed the translator in your own tool.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod ast;
pub mod ir;
