//! Core types and the validation-and-decision engine for nfcheck.
//!
//! A three-field key (region, invoice number, order number) is looked up in a
//! reference table; the planning period of the matching row is compared with
//! a caller-supplied receipt date to decide whether a ticket may be filed now
//! or only after month-end close. Every attempt yields a [`ValidationRecord`]
//! destined for the append-only audit log.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement the traits in [`store`].

#![allow(async_fn_in_trait)]

pub mod audit;
pub mod dates;
pub mod engine;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod table;
pub mod tabular;

pub use audit::AuditRecorder;
pub use dates::{DateNormalizer, MonthNames, YearMonth};
pub use engine::DecisionEngine;
pub use error::{Error, Result};
pub use model::{
  AuditEntry, Decision, ReferenceRow, Rejection, ValidationRecord,
  ValidationRequest,
};
pub use service::{Outcome, Validator};
pub use table::ReferenceTable;

#[cfg(test)]
pub(crate) mod testing;
