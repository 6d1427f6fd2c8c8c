use fastdns_domain::Request;

/// Compression pointer to offset 12, where the single question name of a
/// standard query always starts.
pub const QUESTION_POINTER: [u8; 2] = [0xC0, 0x0C];

fn strip_root(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// True when `name` can be written as [`QUESTION_POINTER`].
pub fn is_question_name(req: &Request, name: &str) -> bool {
    strip_root(name).eq_ignore_ascii_case(strip_root(&req.question.name))
}

/// Appends `name` as a label sequence, or as the question pointer when it
/// names the question.
pub fn encode_domain(dst: &mut Vec<u8>, req: &Request, name: &str) {
    if is_question_name(req, name) {
        dst.extend_from_slice(&QUESTION_POINTER);
    } else {
        encode_labels(dst, name);
    }
}

/// Bytes [`encode_domain`] appends for `name`.
pub fn encoded_len(req: &Request, name: &str) -> usize {
    if is_question_name(req, name) {
        QUESTION_POINTER.len()
    } else {
        labels_len(name)
    }
}

/// Appends `name` as uncompressed length-prefixed labels ending in the root
/// label. `""` and `"."` encode as the root alone.
pub fn encode_labels(dst: &mut Vec<u8>, name: &str) {
    let name = strip_root(name);
    if !name.is_empty() {
        for label in name.split('.') {
            dst.push(label.len() as u8);
            dst.extend_from_slice(label.as_bytes());
        }
    }
    dst.push(0x00);
}

pub fn labels_len(name: &str) -> usize {
    let name = strip_root(name);
    if name.is_empty() {
        1
    } else {
        // one length octet per label plus the root octet
        name.len() + 2
    }
}
