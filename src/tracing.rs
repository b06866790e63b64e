use std::cell::Cell;
use std::collections::HashMap;
use std::fmt::{Display, Write};
use std::io::stdout;
use std::num::NonZeroU64;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use thread_local::ThreadLocal;
use tracing::field::{Field, Visit};
use tracing::span::Id;
use tracing::{span, Event, Level, Metadata, Subscriber};
use tracing_core::Interest;

struct SpanState {
    parent: Option<Id>,
    /// how many handles to the span currently exist; the span is removed
    /// from the map once this drops to zero
    reference_counter: AtomicUsize,
    /// name of the span, followed by its recorded fields
    description: String,
    metadata: &'static Metadata<'static>,
    /// microseconds since the creation of the subscriber, or 0 if not entered
    entered_timestamp: AtomicU64,
    depth: usize
}

///
/// A simple [`Subscriber`] that prints spans and events of the view operations
/// (e.g. sorting, assigning ranges, or rejected view constructions) to stdout or
/// to the output given to [`LogViewSubscriber::with_output()`], indented according to the nesting of spans. Spans deeper than `max_depth` are
/// not printed.
///
pub struct LogViewSubscriber {
    span_ids: AtomicU64,
    span_map: RwLock<HashMap<Id, SpanState>>,
    current_span: ThreadLocal<Cell<Option<NonZeroU64>>>,
    default_instant: Instant,
    interested_level: RangeInclusive<Level>,
    max_depth: usize,
    output: Box<dyn Fn(&str) + Send + Sync>
}

fn print_to_stdout(line: &str) {
    println!("{}", line);
    std::io::Write::flush(&mut stdout()).unwrap();
}

impl LogViewSubscriber {

    fn new(levels: RangeInclusive<Level>, max_depth: usize) -> Self {
        Self::with_output(levels, max_depth, print_to_stdout)
    }

    ///
    /// Creates a subscriber that passes every line it would print to `output` instead.
    ///
    pub fn with_output<F>(levels: RangeInclusive<Level>, max_depth: usize, output: F) -> Self
        where F: Fn(&str) + Send + Sync + 'static
    {
        LogViewSubscriber {
            span_ids: AtomicU64::new(1),
            span_map: RwLock::new(HashMap::new()),
            current_span: ThreadLocal::new(),
            default_instant: Instant::now(),
            interested_level: levels,
            max_depth: max_depth,
            output: Box::new(output)
        }
    }

    ///
    /// Installs the subscriber as global default. Panics if there already is a global
    /// default subscriber.
    ///
    pub fn init(levels: RangeInclusive<Level>, max_depth: usize) {
        tracing::subscriber::set_global_default(Self::new(levels, max_depth)).unwrap()
    }

    ///
    /// Installs the subscriber as global default, unless a global default subscriber
    /// has already been set (e.g. by another test).
    ///
    pub fn init_test() {
        _ = tracing::subscriber::set_global_default(Self::new(Level::ERROR..=Level::DEBUG, 2))
    }

    fn span_map<'a>(&'a self) -> RwLockReadGuard<'a, HashMap<Id, SpanState>> {
        self.span_map.read().unwrap()
    }

    fn span_map_mut<'a>(&'a self) -> RwLockWriteGuard<'a, HashMap<Id, SpanState>> {
        self.span_map.write().unwrap()
    }

    fn current_span_id(&self) -> Option<Id> {
        self.current_span.get_or(|| Cell::new(None)).get().map(Id::from_non_zero_u64)
    }

    fn set_current_span_id(&self, id: Option<&Id>) {
        self.current_span.get_or(|| Cell::new(None)).set(id.map(Id::into_non_zero_u64));
    }

    fn micros_since_start(&self) -> u64 {
        Instant::now().duration_since(self.default_instant).as_micros() as u64
    }

    fn print_line(&self, depth: usize, content: impl Display) {
        (self.output)(&format!("{:indent$}{}", "", content, indent = 2 * depth));
    }
}

struct FieldRecorder {
    message: Option<String>,
    fields: Option<String>
}

impl FieldRecorder {

    fn new() -> Self {
        Self { message: None, fields: None }
    }
}

impl Display for FieldRecorder {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(message) = &self.message {
            write!(f, "{}", message)?;
        }
        if let Some(fields) = &self.fields {
            write!(f, "({})", fields)?;
        }
        Ok(())
    }
}

impl Visit for FieldRecorder {

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else if let Some(fields) = &mut self.fields {
            write!(fields, ", {}={:?}", field.name(), value).unwrap();
        } else {
            self.fields = Some(format!("{}={:?}", field.name(), value));
        }
    }
}

impl Subscriber for LogViewSubscriber {

    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if self.interested_level.contains(metadata.level()) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.interested_level.contains(metadata.level())
    }

    fn current_span(&self) -> tracing_core::span::Current {
        match self.current_span_id() {
            Some(id) => match self.span_map().get(&id) {
                Some(state) => tracing_core::span::Current::new(id, state.metadata),
                None => tracing_core::span::Current::none()
            },
            None => tracing_core::span::Current::none()
        }
    }

    fn new_span(&self, span: &span::Attributes<'_>) -> Id {
        let id = Id::from_u64(self.span_ids.fetch_add(1, Ordering::Relaxed));
        let parent = span.parent().cloned().or_else(|| self.current_span_id());
        let mut spans = self.span_map_mut();
        let depth = parent.as_ref().and_then(|id| spans.get(id)).map(|state| state.depth + 1).unwrap_or(0);

        let mut description = FieldRecorder::new();
        span.record(&mut description);
        description.message = Some(span.metadata().name().to_owned());

        _ = spans.insert(id.clone(), SpanState {
            parent: parent,
            reference_counter: AtomicUsize::new(1),
            description: description.to_string(),
            metadata: span.metadata(),
            entered_timestamp: AtomicU64::new(0),
            depth: depth
        });
        return id;
    }

    fn record(&self, span: &Id, values: &span::Record<'_>) {
        let mut recorded = FieldRecorder::new();
        values.record(&mut recorded);
        if let Some(state) = self.span_map_mut().get_mut(span) {
            write!(state.description, "{}", recorded).unwrap();
        }
    }

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {
        // only the parent relation is used for printing
    }

    fn event(&self, event: &Event<'_>) {
        let depth = self.current_span_id().and_then(|id| self.span_map().get(&id).map(|state| state.depth + 1)).unwrap_or(0);
        if depth <= self.max_depth {
            let mut description = FieldRecorder::new();
            event.record(&mut description);
            self.print_line(depth, format_args!("[{}] {}", event.metadata().level(), description));
        }
    }

    fn enter(&self, span: &Id) {
        self.set_current_span_id(Some(span));
        let span_map = self.span_map();
        if let Some(entered_span) = span_map.get(span) {
            if entered_span.depth < self.max_depth {
                self.print_line(entered_span.depth, &entered_span.description);
            }
            entered_span.entered_timestamp.store(self.micros_since_start(), Ordering::SeqCst);
        }
    }

    fn exit(&self, span: &Id) {
        let span_map = self.span_map();
        if let Some(exited_span) = span_map.get(span) {
            let entered_timestamp = exited_span.entered_timestamp.swap(0, Ordering::SeqCst);
            if exited_span.depth < self.max_depth {
                self.print_line(exited_span.depth, format_args!("done({}us)", self.micros_since_start() - entered_timestamp));
            }
            self.set_current_span_id(exited_span.parent.as_ref());
        }
    }

    fn clone_span(&self, id: &Id) -> Id {
        if let Some(state) = self.span_map().get(id) {
            _ = state.reference_counter.fetch_add(1, Ordering::Relaxed);
        }
        return id.clone();
    }

    fn try_close(&self, id: Id) -> bool {
        let remaining_handles = match self.span_map().get(&id) {
            Some(state) => state.reference_counter.fetch_sub(1, Ordering::Relaxed) - 1,
            None => return false
        };
        if remaining_handles == 0 {
            _ = self.span_map_mut().remove(&id);
            true
        } else {
            false
        }
    }
}

#[test]
fn test_field_recorder() {
    let mut recorder = FieldRecorder::new();
    assert_eq!("", recorder.to_string());
    recorder.message = Some("sort".to_owned());
    assert_eq!("sort", recorder.to_string());
    recorder.fields = Some("start=1, length=3".to_owned());
    assert_eq!("sort(start=1, length=3)", recorder.to_string());
}

#[cfg(test)]
use std::sync::{Arc, Mutex};

#[test]
fn test_subscriber_prints_spans_and_events() {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = lines.clone();
    let subscriber = LogViewSubscriber::with_output(Level::ERROR..=Level::TRACE, 1, move |line: &str| sink.lock().unwrap().push(line.to_owned()));
    tracing::subscriber::with_default(subscriber, || {
        let mut data = vec![3, 2, 1];
        let mut view = crate::make_view(&mut data).full().unwrap();
        view.sort();
        assert!(crate::make_view(&mut data).range(2..2).is_err());
        assert_eq!(vec![1, 2, 3], data);
    });
    let lines = lines.lock().unwrap();
    // `sort` is printed, the nested `sort_by` is deeper than the maximal depth
    assert_eq!("sort", lines[0]);
    assert!(lines[1].starts_with("done(") && lines[1].ends_with("us)"));
    assert!(lines[2].starts_with("[DEBUG] rejected subrange: "));
    assert!(lines[2].contains("len=3"));
    assert_eq!(3, lines.len());
}
