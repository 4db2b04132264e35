//! Integration tests wiring core components by hand, without a network.

use std::sync::Arc;

use flowline_component::prelude::*;
use parking_lot::Mutex;
use serde_json::json;

fn wire(from: &dyn Component, from_id: &str, to: &dyn Component, to_id: &str) -> Arc<Channel> {
    let channel = Arc::new(Channel::between(
        Endpoint::new(from_id, "out"),
        Endpoint::new(to_id, "in"),
    ));
    from.out_ports().get("out").expect("out").attach(&channel);
    to.in_ports().get("in").expect("in").attach(&channel);
    channel
}

#[test]
fn chain_of_forwards_delivers_to_output() {
    let registry = ComponentRegistry::with_core_components();
    let first = registry.resolve("Forward").expect("Forward");
    let second = registry.resolve("core/Forward").expect("Forward");
    let sink = Output::new();

    let middle = wire(first.as_ref(), "first", second.as_ref(), "second");
    let last = wire(second.as_ref(), "second", &sink, "sink");

    let seen = Arc::new(Mutex::new(Vec::new()));
    for channel in [&middle, &last] {
        let seen = Arc::clone(&seen);
        channel.on(EventCategory::BeginGroup, move |event: &ChannelEvent<'_>| {
            seen.lock().push(event.to_string());
        });
    }

    let seed = Arc::new(Channel::seed(Endpoint::new("first", "in")));
    first.in_ports().get("in").expect("in").attach(&seed);

    seed.connect();
    seed.begin_group("batch");
    seed.send(&json!(1));
    seed.send(&json!(2));
    seed.disconnect();

    assert_eq!(sink.received(), 2);
    assert_eq!(
        *seen.lock(),
        vec![
            "BeginGroup(first.out:second.in, group: batch)",
            "BeginGroup(second.out:sink.in, group: batch)"
        ]
    );
    assert!(!last.is_connected());
}

#[test]
fn detached_component_stops_receiving() {
    let source = Forward::new();
    let sink = Output::new();
    let channel = wire(&source, "src", &sink, "sink");

    let seed = Arc::new(Channel::seed(Endpoint::new("src", "in")));
    source.in_ports().get("in").expect("in").attach(&seed);

    seed.send(&json!("before"));
    assert!(sink.in_ports().get("in").expect("in").detach(&channel));
    seed.send(&json!("after"));

    assert_eq!(sink.received(), 1);
}
