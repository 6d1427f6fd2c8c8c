use fastdns_domain::{MxRecord, RecordType, SoaRecord, SrvRecord};
use fastdns_infrastructure::dns::record::{
    append_cname_record, append_host_record, append_mx_record, append_ns_record,
    append_ptr_record, append_soa_record, append_srv_record, append_txt_record, txt_segments,
};
use std::net::IpAddr;

mod helpers;
use helpers::builders::{read_name, read_u16, read_u32, split_records, QueryBuilder};

const POINTER: [u8; 2] = [0xC0, 0x0C];

#[test]
fn test_a_records_scenario() {
    let req = QueryBuilder::new("example.com", RecordType::A).request();
    let ips: Vec<IpAddr> = vec!["8.8.8.8".parse().unwrap(), "8.8.4.4".parse().unwrap()];

    let mut out = Vec::new();
    append_host_record(&mut out, &req, 300, &ips);

    assert_eq!(out.len(), 2 * 16);
    assert_eq!(
        &out[..16],
        &[0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x01, 0x2C, 0x00, 0x04, 8, 8, 8, 8]
    );
    assert_eq!(
        &out[16..],
        &[0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x01, 0x2C, 0x00, 0x04, 8, 8, 4, 4]
    );
}

#[test]
fn test_aaaa_record_for_ipv6() {
    let req = QueryBuilder::new("example.com", RecordType::AAAA).request();
    let ips: Vec<IpAddr> = vec!["2001:db8::1".parse().unwrap()];

    let mut out = Vec::new();
    append_host_record(&mut out, &req, 60, &ips);

    let records = split_records(&out);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].rtype, 28);
    assert_eq!(records[0].rdata.len(), 16);
    assert_eq!(records[0].rdata[..2], [0x20, 0x01]);
    assert_eq!(records[0].rdata[15], 1);
}

#[test]
fn test_class_is_copied_from_question() {
    let req = QueryBuilder::new("example.com", RecordType::A)
        .class(3)
        .request();
    let mut out = Vec::new();
    append_host_record(&mut out, &req, 1, &["10.0.0.1".parse().unwrap()]);
    assert_eq!(read_u16(&out, 4), 3);
}

#[test]
fn test_srv_scenario() {
    let req = QueryBuilder::new("_https._tcp.example.com", RecordType::SRV).request();
    let srvs = [SrvRecord::new(10, 5, 443, "svc.example.com")];

    let mut out = Vec::new();
    append_srv_record(&mut out, &req, 60, &srvs);

    assert_eq!(&out[..4], &[0xC0, 0x0C, 0x00, 0x21]);
    assert_eq!(&out[4..6], &[0x00, 0x01]);
    assert_eq!(read_u32(&out, 6), 60);
    // "svc.example.com" encodes to 17 bytes
    assert_eq!(read_u16(&out, 10), 6 + 17);

    let rdata = &out[12..];
    assert_eq!(read_u16(rdata, 0), 10);
    assert_eq!(read_u16(rdata, 2), 5);
    assert_eq!(read_u16(rdata, 4), 443);
    let (target, end) = read_name(rdata, 6);
    assert_eq!(target, "svc.example.com");
    assert_eq!(end, rdata.len());
}

#[test]
fn test_srv_records_keep_input_order() {
    let req = QueryBuilder::new("_sip._udp.example.com", RecordType::SRV).request();
    let srvs = [
        SrvRecord::new(10, 60, 5060, "a.example.com"),
        SrvRecord::new(20, 0, 5061, "bb.example.com"),
    ];

    let mut out = Vec::new();
    append_srv_record(&mut out, &req, 30, &srvs);

    let records = split_records(&out);
    assert_eq!(records.len(), 2);
    assert_eq!(read_u16(records[0].rdata, 4), 5060);
    assert_eq!(read_u16(records[1].rdata, 4), 5061);
    assert_eq!(read_name(records[1].rdata, 6).0, "bb.example.com");
}

#[test]
fn test_ns_records() {
    let req = QueryBuilder::new("example.com", RecordType::NS).request();
    let mut out = Vec::new();
    append_ns_record(&mut out, &req, 3600, &["ns1.example.com", "ns2.example.net."]);

    let records = split_records(&out);
    assert_eq!(records.len(), 2);
    for rr in &records {
        assert_eq!(rr.rtype, 2);
        assert_eq!(rr.ttl, 3600);
    }
    assert_eq!(records[0].rdata.len(), "ns1.example.com".len() + 2);
    assert_eq!(read_name(records[0].rdata, 0).0, "ns1.example.com");
    assert_eq!(read_name(records[1].rdata, 0).0, "ns2.example.net");
}

#[test]
fn test_soa_rdata_decodes_back() {
    let req = QueryBuilder::new("example.com", RecordType::SOA).request();
    let soa = SoaRecord {
        mname: "ns1.example.com".to_string(),
        rname: "hostmaster.example.com".to_string(),
        serial: 2024010101,
        refresh: 7200,
        retry: 3600,
        expire: 1_209_600,
        minimum: 300,
    };

    let mut out = Vec::new();
    append_soa_record(&mut out, &req, 300, &soa);

    let records = split_records(&out);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].rtype, 6);

    let rdata = records[0].rdata;
    let (mname, pos) = read_name(rdata, 0);
    let (rname, pos) = read_name(rdata, pos);
    assert_eq!(mname, "ns1.example.com");
    assert_eq!(rname, "hostmaster.example.com");
    assert_eq!(rdata.len() - pos, 20);
    let fields: Vec<u32> = (0..5).map(|i| read_u32(rdata, pos + i * 4)).collect();
    assert_eq!(fields, [2024010101, 7200, 3600, 1_209_600, 300]);
}

#[test]
fn test_mx_records() {
    let req = QueryBuilder::new("example.com", RecordType::MX).request();
    let mxs = [
        MxRecord::new(10, "mail.example.com"),
        MxRecord::new(20, "backup.example.org"),
    ];

    let mut out = Vec::new();
    append_mx_record(&mut out, &req, 900, &mxs);

    let records = split_records(&out);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].rtype, 15);
    assert_eq!(read_u16(records[0].rdata, 0), 10);
    assert_eq!(read_name(records[0].rdata, 2).0, "mail.example.com");
    assert_eq!(read_u16(records[1].rdata, 0), 20);
}

#[test]
fn test_ptr_and_cname() {
    let req = QueryBuilder::new("4.4.8.8.in-addr.arpa", RecordType::PTR).request();
    let mut out = Vec::new();
    append_ptr_record(&mut out, &req, 60, "dns.google");
    let records = split_records(&out);
    assert_eq!(records[0].rtype, 12);
    assert_eq!(read_name(records[0].rdata, 0).0, "dns.google");

    let req = QueryBuilder::new("www.example.com", RecordType::CNAME).request();
    let mut out = Vec::new();
    append_cname_record(&mut out, &req, 60, "example.com");
    let records = split_records(&out);
    assert_eq!(records[0].rtype, 5);
    assert_eq!(read_name(records[0].rdata, 0).0, "example.com");
}

#[test]
fn test_target_equal_to_question_uses_pointer() {
    let req = QueryBuilder::new("Example.com", RecordType::CNAME).request();
    let mut out = Vec::new();
    append_cname_record(&mut out, &req, 60, "example.COM.");

    assert_eq!(read_u16(&out, 10), 2);
    assert_eq!(&out[12..], &POINTER);
}

#[test]
fn test_txt_short_text() {
    let req = QueryBuilder::new("example.com", RecordType::TXT).request();
    let mut out = Vec::new();
    append_txt_record(&mut out, &req, 60, "v=spf1 -all");

    let records = split_records(&out);
    assert_eq!(records[0].rtype, 16);
    assert_eq!(records[0].rdata[0] as usize, "v=spf1 -all".len());
    assert_eq!(&records[0].rdata[1..], b"v=spf1 -all");
}

#[test]
fn test_txt_empty_text_is_one_empty_string() {
    let req = QueryBuilder::new("example.com", RecordType::TXT).request();
    let mut out = Vec::new();
    append_txt_record(&mut out, &req, 60, "");

    assert_eq!(read_u16(&out, 10), 1);
    assert_eq!(&out[12..], &[0x00]);
}

/// Walks the character-strings of a TXT RDATA, returning the prefix count
/// and the concatenated text.
fn decode_txt(rdata: &[u8]) -> (usize, Vec<u8>) {
    let mut pos = 0;
    let mut prefixes = 0;
    let mut text = Vec::new();
    while pos < rdata.len() {
        let len = rdata[pos] as usize;
        prefixes += 1;
        text.extend_from_slice(&rdata[pos + 1..pos + 1 + len]);
        pos += 1 + len;
    }
    (prefixes, text)
}

#[test]
fn test_txt_segmentation_reproduces_text() {
    let req = QueryBuilder::new("example.com", RecordType::TXT).request();

    for len in [1usize, 254, 255, 256, 510, 511, 1000] {
        let text: String = (0..len).map(|i| (b'a' + (i % 26) as u8) as char).collect();
        let mut out = Vec::new();
        append_txt_record(&mut out, &req, 60, &text);

        let records = split_records(&out);
        assert_eq!(records.len(), 1);
        let (prefixes, decoded) = decode_txt(records[0].rdata);
        assert_eq!(prefixes, len.div_ceil(255), "len {len}");
        assert_eq!(prefixes, txt_segments(len));
        assert_eq!(decoded, text.as_bytes());
    }
}

#[test]
fn test_every_record_declares_its_rdata_length() {
    let req = QueryBuilder::new("example.com", RecordType::A).request();
    let soa = SoaRecord {
        mname: "example.com".to_string(),
        rname: "admin.example.com".to_string(),
        serial: 1,
        refresh: 2,
        retry: 3,
        expire: 4,
        minimum: 5,
    };
    let long_text = "x".repeat(700);

    let appenders: Vec<Box<dyn Fn(&mut Vec<u8>) + '_>> = vec![
        Box::new(|b| append_host_record(b, &req, 1, &["1.2.3.4".parse().unwrap()])),
        Box::new(|b| append_host_record(b, &req, 1, &["::1".parse().unwrap()])),
        Box::new(|b| append_cname_record(b, &req, 1, "alias.example.net")),
        Box::new(|b| append_srv_record(b, &req, 1, &[SrvRecord::new(1, 2, 3, "example.com")])),
        Box::new(|b| append_ns_record(b, &req, 1, &["."])),
        Box::new(|b| append_soa_record(b, &req, 1, &soa)),
        Box::new(|b| append_mx_record(b, &req, 1, &[MxRecord::new(5, "mx.example.com")])),
        Box::new(|b| append_ptr_record(b, &req, 1, "host.example.com")),
        Box::new(|b| append_txt_record(b, &req, 1, &long_text)),
    ];

    for append in &appenders {
        // Appending never looks at what is already in the buffer.
        let mut out = vec![0xAA; 7];
        append(&mut out);

        let rr = &out[7..];
        let rdlength = read_u16(rr, 10) as usize;
        assert_eq!(rr.len(), 12 + rdlength);
        assert_eq!(rr[..2], POINTER);
        assert_eq!(out[..7], [0xAA; 7]);
    }
}
