//! Complete responses written through a [`ResponseWriter`].
//!
//! Each builder lays out the header, echoes the question section and appends
//! the answers with the [`record`](super::record) encoder, then issues exactly
//! one write.

use super::name::encode_labels;
use super::pool::{Pool, Pooled};
use super::record::{
    append_cname_record, append_host_record, append_mx_record, append_ns_record,
    append_ptr_record, append_soa_record, append_srv_record, append_txt_record,
};
use super::response_writer::ResponseWriter;
use fastdns_domain::{MxRecord, Rcode, Request, SoaRecord, SrvRecord};
use std::io;
use std::net::IpAddr;
use std::sync::LazyLock;

const QR: u16 = 0x8000;
const OPCODE_MASK: u16 = 0x7800;
const RD: u16 = 0x0100;
const RA: u16 = 0x0080;

static MESSAGE_BUFFERS: LazyLock<Pool<Vec<u8>>> =
    LazyLock::new(|| Pool::byte_buffers(1024, 512));

fn message_buffer() -> Pooled<Vec<u8>> {
    MESSAGE_BUFFERS.acquire()
}

/// Response header for `req`: ID, OPCODE and RD echoed, QR and RA set,
/// one question and `ancount` answers.
pub fn append_header(dst: &mut Vec<u8>, req: &Request, rcode: Rcode, ancount: u16) {
    let flags = QR | (req.header.flags & (OPCODE_MASK | RD)) | RA | rcode.to_u8() as u16;
    let id = req.header.id;
    let header = [
        // ID
        (id >> 8) as u8,
        id as u8,
        // FLAGS
        (flags >> 8) as u8,
        flags as u8,
        // QDCOUNT
        0x00,
        0x01,
        // ANCOUNT
        (ancount >> 8) as u8,
        ancount as u8,
        // NSCOUNT
        0x00,
        0x00,
        // ARCOUNT
        0x00,
        0x00,
    ];
    dst.extend_from_slice(&header);
}

/// Question section, copied from the query bytes when the request was parsed
/// off the wire and rebuilt from its fields otherwise.
pub fn append_question(dst: &mut Vec<u8>, req: &Request) {
    let question = req.question_bytes();
    if !question.is_empty() {
        dst.extend_from_slice(question);
        return;
    }
    encode_labels(dst, &req.question.name);
    dst.extend_from_slice(&req.question.record_type.to_be_bytes());
    dst.extend_from_slice(&req.question.class.to_be_bytes());
}

fn respond<F>(
    rw: &mut dyn ResponseWriter,
    req: &Request,
    rcode: Rcode,
    ancount: usize,
    answers: F,
) -> io::Result<usize>
where
    F: FnOnce(&mut Vec<u8>),
{
    let mut buf = message_buffer();
    let buf: &mut Vec<u8> = &mut buf;
    append_header(buf, req, rcode, ancount as u16);
    append_question(buf, req);
    answers(&mut *buf);
    rw.write(buf)
}

/// Answerless response carrying `rcode`.
pub fn error(rw: &mut dyn ResponseWriter, req: &Request, rcode: Rcode) -> io::Result<usize> {
    respond(rw, req, rcode, 0, |_| {})
}

pub fn host(
    rw: &mut dyn ResponseWriter,
    req: &Request,
    ips: &[IpAddr],
    ttl: u32,
) -> io::Result<usize> {
    respond(rw, req, Rcode::NoError, ips.len(), |buf| {
        append_host_record(buf, req, ttl, ips)
    })
}

pub fn cname(
    rw: &mut dyn ResponseWriter,
    req: &Request,
    target: &str,
    ttl: u32,
) -> io::Result<usize> {
    respond(rw, req, Rcode::NoError, 1, |buf| {
        append_cname_record(buf, req, ttl, target)
    })
}

pub fn srv(
    rw: &mut dyn ResponseWriter,
    req: &Request,
    srvs: &[SrvRecord],
    ttl: u32,
) -> io::Result<usize> {
    respond(rw, req, Rcode::NoError, srvs.len(), |buf| {
        append_srv_record(buf, req, ttl, srvs)
    })
}

pub fn ns<S: AsRef<str>>(
    rw: &mut dyn ResponseWriter,
    req: &Request,
    nameservers: &[S],
    ttl: u32,
) -> io::Result<usize> {
    respond(rw, req, Rcode::NoError, nameservers.len(), |buf| {
        append_ns_record(buf, req, ttl, nameservers)
    })
}

pub fn soa(
    rw: &mut dyn ResponseWriter,
    req: &Request,
    soa: &SoaRecord,
    ttl: u32,
) -> io::Result<usize> {
    respond(rw, req, Rcode::NoError, 1, |buf| {
        append_soa_record(buf, req, ttl, soa)
    })
}

pub fn mx(
    rw: &mut dyn ResponseWriter,
    req: &Request,
    mxs: &[MxRecord],
    ttl: u32,
) -> io::Result<usize> {
    respond(rw, req, Rcode::NoError, mxs.len(), |buf| {
        append_mx_record(buf, req, ttl, mxs)
    })
}

pub fn ptr(
    rw: &mut dyn ResponseWriter,
    req: &Request,
    ptr: &str,
    ttl: u32,
) -> io::Result<usize> {
    respond(rw, req, Rcode::NoError, 1, |buf| {
        append_ptr_record(buf, req, ttl, ptr)
    })
}

pub fn txt(
    rw: &mut dyn ResponseWriter,
    req: &Request,
    txt: &str,
    ttl: u32,
) -> io::Result<usize> {
    respond(rw, req, Rcode::NoError, 1, |buf| {
        append_txt_record(buf, req, ttl, txt)
    })
}
