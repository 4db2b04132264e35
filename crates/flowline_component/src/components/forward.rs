use crate::component::Component;
use crate::event::{ChannelEvent, EventCategory};
use crate::port::{Port, PortSet};

/// Relays everything arriving on `in` to `out`, groups and connection state
/// included.
#[derive(Debug)]
pub struct Forward {
    inports: PortSet,
    outports: PortSet,
}

impl Forward {
    /// Creates a forwarder with untyped ports.
    #[must_use]
    pub fn new() -> Self {
        let input = Port::input("in").with_description("Packets to forward");
        let output = Port::output("out").with_description("Forwarded packets");

        for category in EventCategory::ALL {
            let out = output.clone();
            input.on(category, move |event: &ChannelEvent<'_>| match *event {
                ChannelEvent::Connect { .. } => out.connect(),
                ChannelEvent::Data { data, .. } => out.send(data),
                ChannelEvent::BeginGroup { group, .. } => out.begin_group(group),
                ChannelEvent::EndGroup { group, .. } => out.end_group(group),
                ChannelEvent::Disconnect { .. } => out.disconnect(),
            });
        }

        Self {
            inports: PortSet::new().with(input),
            outports: PortSet::new().with(output),
        }
    }
}

impl Default for Forward {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Forward {
    fn in_ports(&self) -> &PortSet {
        &self.inports
    }

    fn out_ports(&self) -> &PortSet {
        &self.outports
    }

    fn description(&self) -> &str {
        "Forwards packets and groups from in to out"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, Endpoint};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn relays_full_lifecycle() {
        let forward = Forward::new();
        let upstream = Arc::new(Channel::seed(Endpoint::new("fwd", "in")));
        let downstream = Arc::new(Channel::new(Some(Endpoint::new("fwd", "out")), None));

        forward.in_ports().get("in").unwrap().attach(&upstream);
        forward.out_ports().get("out").unwrap().attach(&downstream);

        let log = Arc::new(Mutex::new(Vec::new()));
        for category in EventCategory::ALL {
            let log = Arc::clone(&log);
            downstream.on(category, move |event: &ChannelEvent<'_>| {
                log.lock().push(event.to_string());
            });
        }

        upstream.connect();
        upstream.begin_group("g");
        upstream.send(&json!({"n": 1}));
        upstream.end_group("g");
        upstream.disconnect();

        assert_eq!(
            *log.lock(),
            vec![
                "Connect(fwd.out:ANON)",
                "BeginGroup(fwd.out:ANON, group: g)",
                "Data(fwd.out:ANON, data: {\"n\":1})",
                "EndGroup(fwd.out:ANON, group: g)",
                "Disconnect(fwd.out:ANON)",
            ]
        );
        assert!(!downstream.is_connected());
    }
}
