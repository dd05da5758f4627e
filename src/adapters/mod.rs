// Adapters layer: concrete error sinks for the parser.

pub mod sink;

pub use sink::{CsvErrorSink, InMemoryErrorSink, NoopErrorSink};
