//! fastdns domain layer: record types, the parsed request model,
//! configuration and error types shared by every other crate.
pub mod config;
pub mod dns_record;
pub mod dns_request;
pub mod errors;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_record::{MxRecord, Rcode, RecordType, SoaRecord, SrvRecord, CLASS_IN};
pub use dns_request::{Header, Question, Request};
pub use errors::ParseError;
