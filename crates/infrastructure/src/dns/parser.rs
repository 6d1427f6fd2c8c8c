use fastdns_domain::{Header, ParseError, RecordType, Request};

const MAX_DOMAIN_LEN: usize = 253;

fn read_u16(buf: &[u8], pos: usize) -> u16 {
    u16::from_be_bytes([buf[pos], buf[pos + 1]])
}

/// Parses a raw single-question query into a (pooled) request.
///
/// `req` is reset first, so a failed parse leaves it empty. Rejected:
///
/// * Buffer shorter than the 12-byte header
/// * QR bit set (response, not query)
/// * QDCOUNT ≠ 1
/// * Compression pointer or extended label type in the QNAME
/// * Non-ASCII bytes in a QNAME label
/// * QNAME longer than 253 bytes in presentation form
/// * QNAME, QTYPE or QCLASS running past the end of the buffer
///
/// Anything after the question (an OPT record, stray answers) is ignored.
pub fn parse_request(buf: &[u8], req: &mut Request) -> Result<(), ParseError> {
    req.reset();

    if buf.len() < Header::LEN {
        return Err(ParseError::TooShort(buf.len()));
    }

    let header = Header {
        id: read_u16(buf, 0),
        flags: read_u16(buf, 2),
        qdcount: read_u16(buf, 4),
        ancount: read_u16(buf, 6),
        nscount: read_u16(buf, 8),
        arcount: read_u16(buf, 10),
    };

    if header.is_response() {
        return Err(ParseError::NotQuery);
    }
    if header.qdcount != 1 {
        return Err(ParseError::QuestionCount(header.qdcount));
    }

    let mut pos = Header::LEN;
    let mut name_len = 0usize;

    loop {
        let label_len = *buf.get(pos).ok_or(ParseError::Truncated)? as usize;
        pos += 1;
        if label_len == 0 {
            break;
        }
        if label_len & 0xC0 != 0 {
            req.reset();
            return Err(ParseError::CompressedName);
        }
        let label = match buf.get(pos..pos + label_len) {
            Some(label) => label,
            None => {
                req.reset();
                return Err(ParseError::Truncated);
            }
        };

        if !label.is_ascii() {
            req.reset();
            return Err(ParseError::NonAsciiName);
        }

        if name_len > 0 {
            req.question.name.push('.');
            req.domain.push('.');
            name_len += 1;
        }
        name_len += label_len;
        if name_len > MAX_DOMAIN_LEN {
            req.reset();
            return Err(ParseError::NameTooLong);
        }

        for &b in label {
            req.question.name.push(char::from(b));
            req.domain.push(char::from(b.to_ascii_lowercase()));
        }
        pos += label_len;
    }

    if pos + 4 > buf.len() {
        req.reset();
        return Err(ParseError::Truncated);
    }

    req.question.record_type = RecordType::from_u16(read_u16(buf, pos));
    req.question.class = read_u16(buf, pos + 2);
    req.question_end = pos + 4;
    req.header = header;
    req.raw.extend_from_slice(buf);

    Ok(())
}
