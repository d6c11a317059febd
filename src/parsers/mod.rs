pub mod capture;
pub mod run_json;
pub mod types;

pub use capture::Capture;
pub use run_json::{parse_document, parse_run};
pub use types::{
    ChannelData, ChannelTelemetry, ParseError, RawReading, RunDocument, RunTelemetry,
    SuspensionChannel,
};
