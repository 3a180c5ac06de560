use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::callback::{ObservationSource, Pull};
use crate::{
    Callback, CallbackError, Descriptor, DiagnosticsSink, InstrumentKind, InstrumentationScope,
    InvalidInstrument, Measurement, MeasurementConsumer, SharedString,
};

/// Shared machinery of the observable instruments.
///
/// Holds the normalized callback sources and produces the per-cycle
/// measurement sequence.  Total isolation between callbacks within one cycle
/// is a hard guarantee: a failing callback is reported and contributes
/// nothing, an exhausted step-producer is skipped silently, and in both
/// cases every sibling callback still runs.
pub(crate) struct ObservableInstrument {
    descriptor: Arc<Descriptor>,
    consumer: Arc<dyn MeasurementConsumer>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    sources: Vec<Box<dyn ObservationSource>>,
}

impl ObservableInstrument {
    pub(crate) fn new(
        name: impl Into<SharedString>,
        unit: impl Into<SharedString>,
        description: impl Into<SharedString>,
        kind: InstrumentKind,
        scope: Arc<InstrumentationScope>,
        consumer: Arc<dyn MeasurementConsumer>,
        diagnostics: Arc<dyn DiagnosticsSink>,
        callbacks: Vec<Callback>,
    ) -> Result<Self, InvalidInstrument> {
        let descriptor = Arc::new(Descriptor::new(name, unit, description, kind, scope)?);
        let sources = callbacks.into_iter().map(Callback::into_source).collect();
        Ok(ObservableInstrument { descriptor, consumer, diagnostics, sources })
    }

    /// Pulls every registered callback once, in registration order, lazily.
    ///
    /// Each callback is invoked as iteration reaches it, so an undriven
    /// iterator performs no work.  The sequence is finite and recomputed
    /// fresh on every call; it is not a replay.
    pub(crate) fn collect(&self) -> impl Iterator<Item = Measurement> + '_ {
        self.sources.iter().flat_map(move |source| {
            let batch = match catch_unwind(AssertUnwindSafe(|| source.pull())) {
                Ok(Ok(Pull::Batch(batch))) => batch,
                Ok(Ok(Pull::Exhausted)) => Vec::new(),
                Ok(Err(error)) => {
                    self.diagnostics.callback_failure(&self.descriptor, &error);
                    Vec::new()
                }
                Err(payload) => {
                    let error = panic_to_error(payload);
                    self.diagnostics.callback_failure(&self.descriptor, &error);
                    Vec::new()
                }
            };
            batch.into_iter().map(move |observation| {
                let (value, attributes) = observation.into_parts();
                Measurement::new(value, self.descriptor.clone(), attributes)
            })
        })
    }

    pub(crate) fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub(crate) fn consumer(&self) -> &Arc<dyn MeasurementConsumer> {
        &self.consumer
    }
}

fn panic_to_error(payload: Box<dyn Any + Send>) -> CallbackError {
    let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "callback panicked".to_string()
    };
    message.into()
}

/// Shared behavior of instruments pulled by a collection cycle.
///
/// Collectors typically hold a heterogeneous set of observable instruments
/// and pull each one once per cycle, forwarding the produced measurements to
/// the instrument's consumer.
pub trait AsynchronousCollector {
    /// Pulls the current observations from every registered callback and
    /// returns the produced measurements in registration order.
    fn collect(&self) -> Box<dyn Iterator<Item = Measurement> + '_>;

    /// Identity of the instrument.
    fn descriptor(&self) -> &Descriptor;

    /// The consumer that should receive the measurements pulled from this
    /// instrument.
    fn consumer(&self) -> &Arc<dyn MeasurementConsumer>;
}

macro_rules! observable_instrument {
    ($(#[$attr:meta])* $name:ident, $kind:expr) => {
        $(#[$attr])*
        #[derive(Clone)]
        pub struct $name {
            inner: Arc<ObservableInstrument>,
        }

        impl $name {
            /// Creates the instrument with an initial set of callbacks.
            ///
            /// Callbacks are normalized here, one pull handle per
            /// registered callback; their registration order is the
            /// invocation order during collection.
            ///
            /// # Errors
            ///
            /// Returns [`InvalidInstrument`] if the name or unit fails
            /// validation.
            pub fn new(
                name: impl Into<SharedString>,
                scope: Arc<InstrumentationScope>,
                consumer: Arc<dyn MeasurementConsumer>,
                diagnostics: Arc<dyn DiagnosticsSink>,
                callbacks: Vec<Callback>,
                unit: impl Into<SharedString>,
                description: impl Into<SharedString>,
            ) -> Result<Self, InvalidInstrument> {
                Ok(Self {
                    inner: Arc::new(ObservableInstrument::new(
                        name,
                        unit,
                        description,
                        $kind,
                        scope,
                        consumer,
                        diagnostics,
                        callbacks,
                    )?),
                })
            }

            /// Pulls the current observations from every registered
            /// callback, lazily and in registration order.
            ///
            /// Invoked by an external collector once per collection cycle.
            /// Callback failures are reported through the diagnostics sink
            /// and never abort the cycle; an exhausted step-producer is
            /// skipped silently and stays exhausted.
            pub fn collect(&self) -> impl Iterator<Item = Measurement> + '_ {
                self.inner.collect()
            }

            /// Identity of this instrument.
            pub fn descriptor(&self) -> &Descriptor {
                self.inner.descriptor()
            }

            /// The consumer that should receive the measurements pulled
            /// from this instrument.
            pub fn consumer(&self) -> &Arc<dyn MeasurementConsumer> {
                self.inner.consumer()
            }
        }

        impl AsynchronousCollector for $name {
            fn collect(&self) -> Box<dyn Iterator<Item = Measurement> + '_> {
                Box::new(self.inner.collect())
            }

            fn descriptor(&self) -> &Descriptor {
                self.inner.descriptor()
            }

            fn consumer(&self) -> &Arc<dyn MeasurementConsumer> {
                self.inner.consumer()
            }
        }
    };
}

observable_instrument!(
    /// An observable counter.
    ///
    /// Reports monotonically increasing totals that are read from the
    /// environment rather than accumulated by the application, such as
    /// process CPU time.
    ObservableCounter,
    InstrumentKind::ObservableCounter
);

observable_instrument!(
    /// An observable up-down counter.
    ///
    /// Reports totals that can move in both directions, such as memory in
    /// use.
    ObservableUpDownCounter,
    InstrumentKind::ObservableUpDownCounter
);

observable_instrument!(
    /// An observable gauge.
    ///
    /// Reports point-in-time values that are meaningless to sum, such as a
    /// temperature.
    ObservableGauge,
    InstrumentKind::ObservableGauge
);
