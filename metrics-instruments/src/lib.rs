//! Typed instrument handles for a metrics collection SDK.
//!
//! This crate is the instrument layer of a metrics pipeline: the set of
//! handles through which application code and background collectors record
//! numeric measurements.  It validates instrument identity at construction,
//! produces one well-formed [`Measurement`] per recorded data point, and
//! forwards every measurement to an injected [`MeasurementConsumer`].  What
//! happens to a measurement after that -- aggregation, view application,
//! export -- is the consumer's business, not this crate's.
//!
//! # Instrument kinds
//!
//! Six kinds are provided, split across two recording styles.
//!
//! ## Synchronous instruments
//!
//! Invoked directly by caller code; each call delivers at most one
//! measurement to the consumer, on the calling thread:
//!
//! - [`Counter`] -- a monotonically increasing sum.  [`Counter::add`]
//!   discards negative amounts with a warning.
//! - [`UpDownCounter`] -- a sum that can move in both directions.
//!   [`UpDownCounter::add`] forwards every amount.
//! - [`Histogram`] -- a distribution sample.  [`Histogram::record`]
//!   discards negative samples with a warning.
//!
//! A bad amount is deliberately not an error: instrumentation must never be
//! allowed to crash the instrumented application, so the call site gets a
//! warning through the [`DiagnosticsSink`] and execution continues.
//!
//! ## Observable instruments
//!
//! Pulled by an external collector once per collection cycle rather than
//! invoked by the application: [`ObservableCounter`],
//! [`ObservableUpDownCounter`] and [`ObservableGauge`].  Each is constructed
//! with a set of [`Callback`]s -- either plain producers invoked fresh every
//! cycle, or step-producers advanced one step per cycle -- and exposes
//! `collect`, which lazily pulls every callback in registration order.
//!
//! Callbacks are isolated from one another: a callback that fails (or
//! panics) is reported through the diagnostics sink and contributes nothing
//! for that cycle, while its siblings still run.  A step-producer that runs
//! out of observations is skipped silently from then on.  `collect` itself
//! never fails.
//!
//! # Wiring
//!
//! Instruments are constructed with the collaborators an external meter
//! would normally provide: an [`InstrumentationScope`] identifying the
//! owning library, the consumer, and a diagnostics sink ([`TracingSink`]
//! forwards to the `tracing` ecosystem).
//!
//! ```
//! use std::sync::Arc;
//! use metrics_instruments::{
//!     Callback, Counter, InstrumentationScope, MeasurementConsumer, NoopConsumer, Observation,
//!     ObservableGauge, TracingSink,
//! };
//!
//! # fn main() -> Result<(), metrics_instruments::InvalidInstrument> {
//! let scope = Arc::new(InstrumentationScope::new("checkout", None, None));
//!
//! let requests = Counter::new(
//!     "requests_total",
//!     scope.clone(),
//!     Arc::new(NoopConsumer),
//!     Arc::new(TracingSink),
//!     "",
//!     "Total number of requests served.",
//! )?;
//! requests.add(1.0, &[("method", "GET")]);
//!
//! let memory = ObservableGauge::new(
//!     "memory_usage",
//!     scope,
//!     Arc::new(NoopConsumer),
//!     Arc::new(TracingSink),
//!     vec![Callback::from_fn(|| Ok(vec![Observation::new(512.0, vec![])]))],
//!     "By",
//!     "Resident memory.",
//! )?;
//!
//! // Driven by a collector, once per collection cycle.
//! for measurement in memory.collect() {
//!     memory.consumer().consume(measurement);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Identity
//!
//! Every instrument is validated when it is created: names must be ASCII,
//! at most 63 characters, start with a letter and contain only
//! alphanumerics, `_`, `.`, `-` and `/`; units must be ASCII of at most 63
//! characters.  Validation failure is the only error this crate ever
//! returns to a caller -- everything after construction is recovered
//! locally.  Names are stored lower-cased; an instrument's identity never
//! changes after construction.
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

mod attributes;
pub use self::attributes::*;

mod callback;
pub use self::callback::{Callback, CallbackError, Observation};

mod common;
pub use self::common::*;

mod consumer;
pub use self::consumer::*;

mod descriptor;
pub use self::descriptor::*;

mod diagnostics;
pub use self::diagnostics::*;

mod measurement;
pub use self::measurement::*;

mod observable;
pub use self::observable::*;

mod scope;
pub use self::scope::*;

mod sync;
pub use self::sync::*;
