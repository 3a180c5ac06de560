use std::sync::Arc;

use crate::{
    Attribute, Descriptor, DiagnosticsSink, InstrumentKind, InstrumentationScope, IntoAttributes,
    InvalidInstrument, Measurement, MeasurementConsumer, SharedString, SignPolicy,
};

/// Shared machinery of the synchronous instruments.
///
/// Converts a caller-supplied amount and attribute set into a measurement
/// and hands it to the consumer, on the calling thread, with no suspension
/// point.  Exactly one measurement is delivered per accepted call and zero
/// per rejected one.
#[derive(Clone)]
pub(crate) struct SyncInstrument {
    descriptor: Arc<Descriptor>,
    consumer: Arc<dyn MeasurementConsumer>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl SyncInstrument {
    pub(crate) fn new(
        name: impl Into<SharedString>,
        unit: impl Into<SharedString>,
        description: impl Into<SharedString>,
        kind: InstrumentKind,
        scope: Arc<InstrumentationScope>,
        consumer: Arc<dyn MeasurementConsumer>,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Result<Self, InvalidInstrument> {
        let descriptor = Arc::new(Descriptor::new(name, unit, description, kind, scope)?);
        Ok(SyncInstrument { descriptor, consumer, diagnostics })
    }

    pub(crate) fn record(&self, amount: f64, attributes: Vec<Attribute>) {
        if self.descriptor.sign_policy() == SignPolicy::NonNegative && amount < 0.0 {
            self.diagnostics
                .rejected_measurement(&self.descriptor, "amount must be non-negative");
            return;
        }
        self.consumer.consume(Measurement::new(amount, self.descriptor.clone(), attributes));
    }

    pub(crate) fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

/// Shared behavior of instruments invoked directly by application code.
///
/// The concrete types differ only in which public method name they surface
/// and which sign policy their kind carries; `record` applies that policy
/// uniformly, which makes the trait suitable for code that needs to treat
/// the three synchronous kinds interchangeably.
pub trait SynchronousRecorder {
    /// Records one amount against the instrument, subject to its kind's
    /// sign policy.
    fn record(&self, amount: f64, attributes: Vec<Attribute>);

    /// Identity of the instrument.
    fn descriptor(&self) -> &Descriptor;
}

macro_rules! impl_synchronous_recorder {
    ($ty:ty) => {
        impl SynchronousRecorder for $ty {
            fn record(&self, amount: f64, attributes: Vec<Attribute>) {
                self.inner.record(amount, attributes)
            }

            fn descriptor(&self) -> &Descriptor {
                self.inner.descriptor()
            }
        }
    };
}

/// A counter.
///
/// Counters represent monotonically increasing sums, such as the number of
/// operations performed or errors observed.  Adding a negative amount is not
/// an error: the call is discarded with a warning so that a single bad call
/// site cannot crash or raise through arbitrary caller code.
#[derive(Clone)]
pub struct Counter {
    inner: SyncInstrument,
}

impl Counter {
    /// Creates a counter.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInstrument`] if the name or unit fails validation.
    pub fn new(
        name: impl Into<SharedString>,
        scope: Arc<InstrumentationScope>,
        consumer: Arc<dyn MeasurementConsumer>,
        diagnostics: Arc<dyn DiagnosticsSink>,
        unit: impl Into<SharedString>,
        description: impl Into<SharedString>,
    ) -> Result<Self, InvalidInstrument> {
        Ok(Counter {
            inner: SyncInstrument::new(
                name,
                unit,
                description,
                InstrumentKind::Counter,
                scope,
                consumer,
                diagnostics,
            )?,
        })
    }

    /// Adds an amount to the counter.
    ///
    /// The amount must be non-negative; negative amounts are discarded with
    /// a warning naming the instrument, and the call returns normally.
    pub fn add<A: IntoAttributes>(&self, amount: f64, attributes: A) {
        self.inner.record(amount, attributes.into_attributes());
    }

    /// Identity of this counter.
    pub fn descriptor(&self) -> &Descriptor {
        self.inner.descriptor()
    }
}

impl_synchronous_recorder!(Counter);

/// A counter whose sum can decrease.
///
/// Suitable for values that go up and down over time, such as the number of
/// in-flight requests or items in a queue.  No sign restriction applies.
#[derive(Clone)]
pub struct UpDownCounter {
    inner: SyncInstrument,
}

impl UpDownCounter {
    /// Creates an up-down counter.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInstrument`] if the name or unit fails validation.
    pub fn new(
        name: impl Into<SharedString>,
        scope: Arc<InstrumentationScope>,
        consumer: Arc<dyn MeasurementConsumer>,
        diagnostics: Arc<dyn DiagnosticsSink>,
        unit: impl Into<SharedString>,
        description: impl Into<SharedString>,
    ) -> Result<Self, InvalidInstrument> {
        Ok(UpDownCounter {
            inner: SyncInstrument::new(
                name,
                unit,
                description,
                InstrumentKind::UpDownCounter,
                scope,
                consumer,
                diagnostics,
            )?,
        })
    }

    /// Adds an amount to the counter.  The amount may be positive, negative
    /// or zero, and every call is forwarded.
    pub fn add<A: IntoAttributes>(&self, amount: f64, attributes: A) {
        self.inner.record(amount, attributes.into_attributes());
    }

    /// Identity of this counter.
    pub fn descriptor(&self) -> &Descriptor {
        self.inner.descriptor()
    }
}

impl_synchronous_recorder!(UpDownCounter);

/// A histogram.
///
/// Histograms record individual observations of a distribution, such as
/// request latencies.  Samples must be non-negative; negative samples are
/// discarded with a warning, the same availability tradeoff counters make.
#[derive(Clone)]
pub struct Histogram {
    inner: SyncInstrument,
}

impl Histogram {
    /// Creates a histogram.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInstrument`] if the name or unit fails validation.
    pub fn new(
        name: impl Into<SharedString>,
        scope: Arc<InstrumentationScope>,
        consumer: Arc<dyn MeasurementConsumer>,
        diagnostics: Arc<dyn DiagnosticsSink>,
        unit: impl Into<SharedString>,
        description: impl Into<SharedString>,
    ) -> Result<Self, InvalidInstrument> {
        Ok(Histogram {
            inner: SyncInstrument::new(
                name,
                unit,
                description,
                InstrumentKind::Histogram,
                scope,
                consumer,
                diagnostics,
            )?,
        })
    }

    /// Records a sample into the histogram.
    ///
    /// The sample must be non-negative; negative samples are discarded with
    /// a warning naming the instrument, and the call returns normally.
    pub fn record<A: IntoAttributes>(&self, amount: f64, attributes: A) {
        self.inner.record(amount, attributes.into_attributes());
    }

    /// Identity of this histogram.
    pub fn descriptor(&self) -> &Descriptor {
        self.inner.descriptor()
    }
}

impl_synchronous_recorder!(Histogram);

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use mockall::mock;
    use mockall::predicate::always;

    use super::{Counter, Histogram, SynchronousRecorder, UpDownCounter};
    use crate::{
        Attribute, CallbackError, Descriptor, DiagnosticsSink, InstrumentationScope, Measurement,
        MeasurementConsumer,
    };

    mock! {
        pub Consumer {}

        impl MeasurementConsumer for Consumer {
            fn consume(&self, measurement: Measurement);
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        warnings: Mutex<Vec<String>>,
    }

    impl DiagnosticsSink for RecordingSink {
        fn rejected_measurement(&self, instrument: &Descriptor, reason: &str) {
            self.warnings.lock().unwrap().push(format!("{}: {}", instrument.name(), reason));
        }

        fn callback_failure(&self, _instrument: &Descriptor, _error: &CallbackError) {
            unreachable!("synchronous instruments have no callbacks");
        }
    }

    fn scope() -> Arc<InstrumentationScope> {
        Arc::new(InstrumentationScope::new("test", None, None))
    }

    #[test]
    fn counter_delivers_valid_amounts() {
        let mut consumer = MockConsumer::new();
        consumer
            .expect_consume()
            .times(1)
            .withf(|m| m.value() == 42.0 && m.instrument().name() == "requests")
            .return_const(());

        let counter = Counter::new(
            "requests",
            scope(),
            Arc::new(consumer),
            Arc::new(RecordingSink::default()),
            "",
            "",
        )
        .unwrap();
        counter.add(42.0, vec![Attribute::new("method", "GET")]);
    }

    #[test]
    fn counter_drops_negative_amounts() {
        let mut consumer = MockConsumer::new();
        consumer.expect_consume().times(0).with(always()).return_const(());

        let sink = Arc::new(RecordingSink::default());
        let counter =
            Counter::new("requests", scope(), Arc::new(consumer), sink.clone(), "", "").unwrap();
        counter.add(-1.0, vec![]);

        let warnings = sink.warnings.lock().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("requests:"));
    }

    #[test]
    fn histogram_drops_negative_samples() {
        let mut consumer = MockConsumer::new();
        consumer.expect_consume().times(1).withf(|m| m.value() == 0.25).return_const(());

        let sink = Arc::new(RecordingSink::default());
        let histogram =
            Histogram::new("latency", scope(), Arc::new(consumer), sink.clone(), "s", "").unwrap();
        histogram.record(0.25, vec![]);
        histogram.record(-0.25, vec![]);

        assert_eq!(sink.warnings.lock().unwrap().len(), 1);
    }

    #[test]
    fn up_down_counter_forwards_any_sign() {
        let mut consumer = MockConsumer::new();
        consumer.expect_consume().times(3).with(always()).return_const(());

        let sink = Arc::new(RecordingSink::default());
        let counter =
            UpDownCounter::new("in_flight", scope(), Arc::new(consumer), sink.clone(), "", "")
                .unwrap();
        counter.add(1.0, vec![]);
        counter.add(-1.0, vec![]);
        counter.add(0.0, vec![]);

        assert!(sink.warnings.lock().unwrap().is_empty());
    }

    #[test]
    fn recorder_trait_applies_sign_policy() {
        let mut consumer = MockConsumer::new();
        consumer.expect_consume().times(0).with(always()).return_const(());

        let sink = Arc::new(RecordingSink::default());
        let counter: Box<dyn SynchronousRecorder> = Box::new(
            Counter::new("jobs", scope(), Arc::new(consumer), sink.clone(), "", "").unwrap(),
        );
        counter.record(-5.0, vec![]);
        assert_eq!(sink.warnings.lock().unwrap().len(), 1);
    }

    #[test]
    fn recorder_trait_forwards_unrestricted_kinds() {
        let mut consumer = MockConsumer::new();
        consumer.expect_consume().times(1).withf(|m| m.value() == -5.0).return_const(());

        let counter: Box<dyn SynchronousRecorder> = Box::new(
            UpDownCounter::new(
                "jobs",
                scope(),
                Arc::new(consumer),
                Arc::new(RecordingSink::default()),
                "",
                "",
            )
            .unwrap(),
        );
        counter.record(-5.0, vec![]);
    }
}
