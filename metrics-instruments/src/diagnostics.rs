use tracing::{error, warn};

use crate::{CallbackError, Descriptor};

/// Destination for recording-time and collection-time faults.
///
/// Nothing that happens after an instrument is constructed is allowed to
/// propagate to caller code: a bad amount or a failing callback is reported
/// here and the telemetry path stays available.  The sink is injected at
/// construction rather than resolved from a process-wide logger so that test
/// suites can assert on emitted diagnostics directly.
pub trait DiagnosticsSink: Send + Sync {
    /// Called when a synchronous recording is discarded.
    ///
    /// At most once per `add`/`record` call; the discarded call produces no
    /// measurement.
    fn rejected_measurement(&self, instrument: &Descriptor, reason: &str);

    /// Called when a callback fails during a collection cycle.
    ///
    /// The failed callback contributes nothing for the current cycle but
    /// stays registered and is attempted again on later cycles.
    fn callback_failure(&self, instrument: &Descriptor, error: &CallbackError);
}

// Blanket implementations.
macro_rules! impl_sink {
    ($inner_ty:ident, $ptr_ty:ty) => {
        impl<$inner_ty> $crate::DiagnosticsSink for $ptr_ty
        where
            $inner_ty: $crate::DiagnosticsSink + ?Sized,
        {
            fn rejected_measurement(&self, instrument: &$crate::Descriptor, reason: &str) {
                std::ops::Deref::deref(self).rejected_measurement(instrument, reason)
            }

            fn callback_failure(
                &self,
                instrument: &$crate::Descriptor,
                error: &$crate::CallbackError,
            ) {
                std::ops::Deref::deref(self).callback_failure(instrument, error)
            }
        }
    };
}

impl_sink!(T, &T);
impl_sink!(T, std::boxed::Box<T>);
impl_sink!(T, std::sync::Arc<T>);

/// A diagnostics sink that forwards to the `tracing` ecosystem.
///
/// This is the sink production meters install: rejected measurements become
/// warnings and callback failures become errors on whichever subscriber the
/// application has set up.
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn rejected_measurement(&self, instrument: &Descriptor, reason: &str) {
        warn!(
            instrument = instrument.name(),
            kind = instrument.kind().as_str(),
            "measurement discarded: {}",
            reason
        );
    }

    fn callback_failure(&self, instrument: &Descriptor, error: &CallbackError) {
        error!(instrument = instrument.name(), error = %error, "callback failed");
    }
}
