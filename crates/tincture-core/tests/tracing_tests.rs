#![forbid(unsafe_code)]
#![cfg(feature = "tracing")]

//! Tracing integration tests.
//!
//! Verify that buffer colorization, incremental updates and registry
//! selection report themselves through `tracing`.
//!
//! Run with: cargo test -p tincture-core --features tracing

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tincture_core::{
    ColorizedText, Colorizer, ColorizerRegistry, Line, LineState, ModeFlags, SpanSink, Style,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span or event with its fields.
#[derive(Debug, Clone)]
struct Captured {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

/// A tracing Layer that records span creation and events.
struct Capture {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

struct CaptureHandle {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<Captured> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<Captured> {
        self.events.lock().unwrap().clone()
    }
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
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());
        self.spans.lock().unwrap().push(Captured {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let parent_name = ctx
            .event_span(event)
            .map(|span_ref| span_ref.name().to_string());
        self.events.lock().unwrap().push(Captured {
            name: fields.get("message").cloned().unwrap_or_default(),
            fields,
            parent_name,
        });
    }
}

fn with_capture<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = Capture {
        spans: spans.clone(),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

/// `(` opens a comment that `)` closes, possibly lines later.
struct Parens;

impl Colorizer for Parens {
    fn name(&self) -> &'static str {
        "Parens"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["par"]
    }

    fn probe(&self, head: &str) -> u8 {
        if head.starts_with('(') { 10 } else { 0 }
    }

    fn colorize_line(
        &self,
        line: Line<'_>,
        mut state: LineState,
        _flags: ModeFlags,
        out: &mut SpanSink,
    ) -> LineState {
        let mut open = state.bits() == 1;
        let mut start = 0;
        for i in 0..line.len() {
            match line.at(i) {
                '(' if !open => {
                    open = true;
                    start = i;
                }
                ')' if open => {
                    open = false;
                    out.set(start..i + 1, Style::Comment);
                }
                _ => {}
            }
        }
        if open {
            out.set(start..line.len(), Style::Comment);
        }
        state.set_bits(u32::from(open));
        state
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn full_pass_opens_one_span() {
    let handle = with_capture(|| {
        let text = ColorizedText::from_text(&Parens, "a (b\nc) d\n", ModeFlags::empty());
        assert_eq!(text.lines().len(), 2);
    });
    let spans = handle.spans();
    let passes: Vec<_> = spans.iter().filter(|s| s.name == "colorize_text").collect();
    assert_eq!(passes.len(), 1);
    assert_eq!(passes[0].fields.get("colorizer").map(String::as_str), Some("Parens"));
    assert_eq!(passes[0].fields.get("lines").map(String::as_str), Some("2"));
}

#[test]
fn update_reports_touched_lines() {
    let before = ["x", "y", "z", "w"];
    let after = ["(x", "y", "z)", "w"];
    let handle = with_capture(|| {
        let mut text = ColorizedText::from_lines(&Parens, &before, ModeFlags::empty());
        let touched = text.update_line(&Parens, &after, 0);
        assert_eq!(touched, 4);
    });

    let spans = handle.spans();
    let update = spans
        .iter()
        .find(|s| s.name == "update_line")
        .expect("update_line span");
    assert_eq!(update.fields.get("line").map(String::as_str), Some("0"));

    let events = handle.events();
    let done = events
        .iter()
        .find(|e| e.name == "re-colorized")
        .expect("re-colorized event");
    assert_eq!(done.fields.get("touched").map(String::as_str), Some("4"));
    assert_eq!(done.parent_name.as_deref(), Some("update_line"));
}

#[test]
fn registry_logs_selection() {
    let handle = with_capture(|| {
        let mut registry = ColorizerRegistry::new();
        registry.register(Arc::new(Parens));
        assert!(registry.select(None, "(hello").is_some());
        assert!(registry.select(None, "hello").is_none());
    });
    let events = handle.events();
    let selected: Vec<_> = events
        .iter()
        .filter(|e| e.name == "selected colorizer")
        .collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].fields.get("colorizer").map(String::as_str), Some("Parens"));
    assert_eq!(selected[0].fields.get("score").map(String::as_str), Some("10"));
}
