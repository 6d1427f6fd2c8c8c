//! Answer-section encoder.
//!
//! Every `append_*_record` function extends `dst` with complete resource
//! records answering `req`'s question and never reads bytes already in `dst`.
//! The owner NAME is always the compression pointer `C0 0C`, so the message
//! must carry exactly one question starting right after the 12-byte header.
//! Record counts and total message size are the caller's business.

use super::name::{encode_domain, encoded_len, QUESTION_POINTER};
use fastdns_domain::{MxRecord, RecordType, Request, SoaRecord, SrvRecord};
use std::net::IpAddr;

/// Longest character-string a single TXT length octet can describe.
const TXT_SEGMENT_MAX: usize = 255;

/// Size of the fixed part every record starts with.
pub const RR_HEADER_LEN: usize = 12;

/// NAME, TYPE, CLASS, TTL and RDLENGTH.
fn append_rr_header(
    dst: &mut Vec<u8>,
    req: &Request,
    record_type: RecordType,
    ttl: u32,
    rdlength: usize,
) {
    let rtype = record_type.to_u16();
    let class = req.question.class;
    let rdlength = rdlength as u16;
    let header: [u8; RR_HEADER_LEN] = [
        // NAME
        QUESTION_POINTER[0],
        QUESTION_POINTER[1],
        // TYPE
        (rtype >> 8) as u8,
        rtype as u8,
        // CLASS
        (class >> 8) as u8,
        class as u8,
        // TTL
        (ttl >> 24) as u8,
        (ttl >> 16) as u8,
        (ttl >> 8) as u8,
        ttl as u8,
        // RDLENGTH
        (rdlength >> 8) as u8,
        rdlength as u8,
    ];
    dst.extend_from_slice(&header);
}

/// One A record per IPv4 address and one AAAA record per IPv6 address.
pub fn append_host_record(dst: &mut Vec<u8>, req: &Request, ttl: u32, ips: &[IpAddr]) {
    for ip in ips {
        match ip {
            IpAddr::V4(v4) => {
                append_rr_header(dst, req, RecordType::A, ttl, 4);
                dst.extend_from_slice(&v4.octets());
            }
            IpAddr::V6(v6) => {
                append_rr_header(dst, req, RecordType::AAAA, ttl, 16);
                dst.extend_from_slice(&v6.octets());
            }
        }
    }
}

pub fn append_cname_record(dst: &mut Vec<u8>, req: &Request, ttl: u32, target: &str) {
    append_rr_header(dst, req, RecordType::CNAME, ttl, encoded_len(req, target));
    encode_domain(dst, req, target);
}

pub fn append_srv_record(dst: &mut Vec<u8>, req: &Request, ttl: u32, srvs: &[SrvRecord]) {
    for srv in srvs {
        let length = 6 + encoded_len(req, &srv.target);
        append_rr_header(dst, req, RecordType::SRV, ttl, length);
        let fixed = [
            // PRIORITY
            (srv.priority >> 8) as u8,
            srv.priority as u8,
            // WEIGHT
            (srv.weight >> 8) as u8,
            srv.weight as u8,
            // PORT
            (srv.port >> 8) as u8,
            srv.port as u8,
        ];
        dst.extend_from_slice(&fixed);
        // TARGET
        encode_domain(dst, req, &srv.target);
    }
}

pub fn append_ns_record<S: AsRef<str>>(
    dst: &mut Vec<u8>,
    req: &Request,
    ttl: u32,
    nameservers: &[S],
) {
    for ns in nameservers {
        let host = ns.as_ref();
        append_rr_header(dst, req, RecordType::NS, ttl, encoded_len(req, host));
        encode_domain(dst, req, host);
    }
}

pub fn append_soa_record(dst: &mut Vec<u8>, req: &Request, ttl: u32, soa: &SoaRecord) {
    let length = encoded_len(req, &soa.mname) + encoded_len(req, &soa.rname) + 20;
    append_rr_header(dst, req, RecordType::SOA, ttl, length);

    encode_domain(dst, req, &soa.mname);
    encode_domain(dst, req, &soa.rname);

    for field in [soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum] {
        dst.extend_from_slice(&field.to_be_bytes());
    }
}

pub fn append_mx_record(dst: &mut Vec<u8>, req: &Request, ttl: u32, mxs: &[MxRecord]) {
    for mx in mxs {
        let length = 2 + encoded_len(req, &mx.host);
        append_rr_header(dst, req, RecordType::MX, ttl, length);
        // PREFERENCE
        dst.extend_from_slice(&mx.preference.to_be_bytes());
        encode_domain(dst, req, &mx.host);
    }
}

pub fn append_ptr_record(dst: &mut Vec<u8>, req: &Request, ttl: u32, ptr: &str) {
    append_rr_header(dst, req, RecordType::PTR, ttl, encoded_len(req, ptr));
    encode_domain(dst, req, ptr);
}

/// Number of character-strings `len` bytes of text are split into. Empty
/// text still gets one zero-length string.
pub fn txt_segments(len: usize) -> usize {
    if len == 0 {
        1
    } else {
        len.div_ceil(TXT_SEGMENT_MAX)
    }
}

/// A single TXT record; text over 255 bytes is split into consecutive
/// length-prefixed character-strings.
pub fn append_txt_record(dst: &mut Vec<u8>, req: &Request, ttl: u32, txt: &str) {
    let text = txt.as_bytes();
    let length = text.len() + txt_segments(text.len());
    append_rr_header(dst, req, RecordType::TXT, ttl, length);

    if text.is_empty() {
        dst.push(0x00);
        return;
    }

    for segment in text.chunks(TXT_SEGMENT_MAX) {
        dst.push(segment.len() as u8);
        dst.extend_from_slice(segment);
    }
}
