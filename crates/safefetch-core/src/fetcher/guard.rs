//! RAII guard that resets the transport when a chain ends.

use std::ops::{Deref, DerefMut};

use crate::transport::Transport;

/// Exclusive use of a transport for one redirect chain; resets it when dropped.
pub(super) struct TransportGuard<'a, T: Transport> {
    transport: &'a mut T,
}

impl<'a, T: Transport> TransportGuard<'a, T> {
    pub(super) fn new(transport: &'a mut T) -> Self {
        Self { transport }
    }
}

impl<T: Transport> Deref for TransportGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.transport
    }
}

impl<T: Transport> DerefMut for TransportGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.transport
    }
}

impl<T: Transport> Drop for TransportGuard<'_, T> {
    fn drop(&mut self) {
        self.transport.reset();
    }
}
