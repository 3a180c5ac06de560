use crate::Measurement;

/// The collaborator that receives every produced measurement.
///
/// Implementations aggregate, apply views, buffer or export; none of that
/// happens in this crate.  `consume` is called synchronously on whichever
/// thread recorded the measurement, so implementations must be safe for
/// concurrent invocation and should never block indefinitely.
pub trait MeasurementConsumer: Send + Sync {
    /// Consumes a single measurement.
    ///
    /// Ownership of the measurement transfers to the consumer; the
    /// instrument retains no reference to it afterwards.
    fn consume(&self, measurement: Measurement);
}

// Blanket implementations.
macro_rules! impl_consumer {
    ($inner_ty:ident, $ptr_ty:ty) => {
        impl<$inner_ty> $crate::MeasurementConsumer for $ptr_ty
        where
            $inner_ty: $crate::MeasurementConsumer + ?Sized,
        {
            fn consume(&self, measurement: $crate::Measurement) {
                std::ops::Deref::deref(self).consume(measurement)
            }
        }
    };
}

impl_consumer!(T, &T);
impl_consumer!(T, std::boxed::Box<T>);
impl_consumer!(T, std::sync::Arc<T>);

/// A no-op consumer.
///
/// Discards every measurement it is handed.  Useful as a default when no
/// pipeline has been wired up yet, and as the root consumer when testing
/// instruments in isolation.
pub struct NoopConsumer;

impl MeasurementConsumer for NoopConsumer {
    fn consume(&self, _measurement: Measurement) {}
}
