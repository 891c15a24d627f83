#![forbid(unsafe_code)]

//! Structured log events emitted at the picker's decision points.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use varpick_core::{ElementId, EnvironmentSignals, TokenElement};
use varpick_web::{Picker, PickerConfig, TapTarget};

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn find<'a>(events: &'a [CapturedEvent], message: &str) -> Vec<&'a CapturedEvent> {
    events.iter().filter(|e| e.message() == message).collect()
}

fn touch_picker() -> Picker {
    let config = PickerConfig::new(ElementId::new(100), |_, _| {})
        .zone(ElementId::new(200), "predictor")
        .zone(ElementId::new(201), "response")
        .validate_with(|token, kind| token == "x1" && *kind == "predictor");
    let (picker, _) = Picker::init(
        config,
        &EnvironmentSignals::touch_screen(2),
        [TokenElement::new(ElementId::new(1), "x1")],
    )
    .expect("valid config");
    picker
}

#[test]
fn init_logs_mode_and_attachments() {
    let events = with_captured_events(|| {
        touch_picker();
    });

    let init = find(&events, "picker initialized");
    assert_eq!(init.len(), 1);
    assert_eq!(init[0].level, tracing::Level::INFO);
    assert_eq!(init[0].fields.get("mode").map(String::as_str), Some("touch"));
    assert_eq!(init[0].fields.get("zones").map(String::as_str), Some("2"));

    let attached = find(&events, "token listeners attached");
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].level, tracing::Level::DEBUG);
    assert_eq!(attached[0].fields.get("id").map(String::as_str), Some("x1"));
}

#[test]
fn placement_and_rejection_levels() {
    let events = with_captured_events(|| {
        let mut picker = touch_picker();
        picker.tap(TapTarget::Token(ElementId::new(1)));
        picker.tap(TapTarget::Zone(ElementId::new(201)));
        picker.tap(TapTarget::Token(ElementId::new(1)));
        picker.tap(TapTarget::Zone(ElementId::new(200)));
    });

    let rejected = find(&events, "placement rejected");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].level, tracing::Level::DEBUG);
    assert_eq!(
        rejected[0].fields.get("zone").map(String::as_str),
        Some("response")
    );

    let placed = find(&events, "token placed");
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].level, tracing::Level::INFO);
    assert_eq!(placed[0].fields.get("token").map(String::as_str), Some("x1"));
}

#[test]
fn ignored_inputs_trace_their_reason() {
    let events = with_captured_events(|| {
        let mut picker = touch_picker();
        picker.drag_start(ElementId::new(1));
        picker.tap(TapTarget::Zone(ElementId::new(200)));
    });

    let ignored = find(&events, "input ignored");
    assert_eq!(ignored.len(), 2);
    assert!(ignored.iter().all(|e| e.level == tracing::Level::TRACE));
    assert_eq!(
        ignored[0].fields.get("reason").map(String::as_str),
        Some("WrongMode")
    );
    assert_eq!(
        ignored[1].fields.get("reason").map(String::as_str),
        Some("NothingSelected")
    );
}
