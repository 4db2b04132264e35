use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::component::Component;
use crate::event::{ChannelEvent, EventCategory};
use crate::port::{Port, PortSet};

/// Sink that logs every packet it receives.
#[derive(Debug)]
pub struct Output {
    inports: PortSet,
    outports: PortSet,
    received: Arc<AtomicUsize>,
}

impl Output {
    /// Creates a sink with an untyped `in` port.
    #[must_use]
    pub fn new() -> Self {
        let input = Port::input("in").with_description("Packets to log");
        let received = Arc::new(AtomicUsize::new(0));

        {
            let received = Arc::clone(&received);
            input.on(EventCategory::Data, move |event: &ChannelEvent<'_>| {
                received.fetch_add(1, Ordering::Relaxed);
                if let Some(data) = event.data() {
                    tracing::info!(channel = %event.channel().identity(), %data, "output");
                }
            });
        }

        Self {
            inports: PortSet::new().with(input),
            outports: PortSet::new(),
            received,
        }
    }

    /// Returns how many packets have arrived so far.
    #[must_use]
    pub fn received(&self) -> usize {
        self.received.load(Ordering::Relaxed)
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Output {
    fn in_ports(&self) -> &PortSet {
        &self.inports
    }

    fn out_ports(&self) -> &PortSet {
        &self.outports
    }

    fn description(&self) -> &str {
        "Logs received packets"
    }
}
