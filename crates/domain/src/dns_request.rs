use super::RecordType;

/// Fixed 12-byte message header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    pub id: u16,
    pub flags: u16,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    pub const LEN: usize = 12;

    pub fn is_response(&self) -> bool {
        self.flags & 0x8000 != 0
    }

    pub fn opcode(&self) -> u8 {
        ((self.flags >> 11) & 0x0F) as u8
    }

    pub fn recursion_desired(&self) -> bool {
        self.flags & 0x0100 != 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Question {
    /// Dotted name as received, original case, no trailing dot.
    pub name: String,
    pub record_type: RecordType,
    pub class: u16,
}

/// A parsed single-question query.
///
/// Requests are pooled: [`Request::reset`] empties every field but keeps the
/// string and byte allocations so the next datagram parses without touching
/// the allocator.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub header: Header,
    pub question: Question,
    /// Lower-cased `question.name`, the form handlers match on.
    pub domain: String,
    /// The datagram this request was parsed from.
    pub raw: Vec<u8>,
    /// Offset in `raw` where the question section ends.
    pub question_end: usize,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.header = Header::default();
        self.question.name.clear();
        self.question.record_type = RecordType::default();
        self.question.class = 0;
        self.domain.clear();
        self.raw.clear();
        self.question_end = 0;
    }

    /// Wire bytes of the question section (QNAME, QTYPE, QCLASS).
    pub fn question_bytes(&self) -> &[u8] {
        self.raw
            .get(Header::LEN..self.question_end)
            .unwrap_or_default()
    }
}
