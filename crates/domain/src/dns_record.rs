mod rcode;
mod record;
mod record_type;

pub use rcode::Rcode;
pub use record::{MxRecord, SoaRecord, SrvRecord};
pub use record_type::RecordType;

/// The Internet class; every other class is passed through untouched.
pub const CLASS_IN: u16 = 1;
