#![allow(dead_code)]
use fastdns_domain::{RecordType, Request};
use fastdns_infrastructure::dns::parse_request;

pub struct QueryBuilder {
    id: u16,
    flags: u16,
    name: String,
    record_type: RecordType,
    class: u16,
}

impl QueryBuilder {
    pub fn new(name: &str, record_type: RecordType) -> Self {
        Self {
            id: 0x1234,
            flags: 0x0100,
            name: name.to_string(),
            record_type,
            class: 1,
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    pub fn class(mut self, class: u16) -> Self {
        self.class = class;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf.extend_from_slice(&self.flags.to_be_bytes());
        buf.extend_from_slice(&[0x00, 0x01]); // QDCOUNT
        buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        if !self.name.is_empty() {
            for label in self.name.split('.') {
                buf.push(label.len() as u8);
                buf.extend_from_slice(label.as_bytes());
            }
        }
        buf.push(0x00);
        buf.extend_from_slice(&self.record_type.to_u16().to_be_bytes());
        buf.extend_from_slice(&self.class.to_be_bytes());
        buf
    }

    pub fn request(&self) -> Request {
        let mut req = Request::new();
        parse_request(&self.build(), &mut req).unwrap();
        req
    }
}

/// One decoded answer record.
#[derive(Debug)]
pub struct Rr<'a> {
    pub name: [u8; 2],
    pub rtype: u16,
    pub class: u16,
    pub ttl: u32,
    pub rdata: &'a [u8],
}

pub fn read_u16(buf: &[u8], pos: usize) -> u16 {
    u16::from_be_bytes([buf[pos], buf[pos + 1]])
}

pub fn read_u32(buf: &[u8], pos: usize) -> u32 {
    u32::from_be_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]])
}

/// Splits an answer section made of pointer-named records. Panics when a
/// record's RDLENGTH runs past the buffer or bytes are left over.
pub fn split_records(buf: &[u8]) -> Vec<Rr<'_>> {
    let mut records = Vec::new();
    let mut pos = 0;
    while pos < buf.len() {
        let rdlength = read_u16(buf, pos + 10) as usize;
        let end = pos + 12 + rdlength;
        assert!(end <= buf.len(), "RDLENGTH runs past the buffer");
        records.push(Rr {
            name: [buf[pos], buf[pos + 1]],
            rtype: read_u16(buf, pos + 2),
            class: read_u16(buf, pos + 4),
            ttl: read_u32(buf, pos + 6),
            rdata: &buf[pos + 12..end],
        });
        pos = end;
    }
    records
}

/// Reads an uncompressed name (or the question pointer) at `pos`, returning
/// the dotted name and the offset after it.
pub fn read_name(buf: &[u8], mut pos: usize) -> (String, usize) {
    if buf[pos] == 0xC0 {
        return (format!("@{}", buf[pos + 1]), pos + 2);
    }
    let mut labels = Vec::new();
    loop {
        let len = buf[pos] as usize;
        pos += 1;
        if len == 0 {
            break;
        }
        labels.push(String::from_utf8(buf[pos..pos + len].to_vec()).unwrap());
        pos += len;
    }
    (labels.join("."), pos)
}
