//! Stable identifier derivation
//!
//! Every name in the generated program is a pure function of the guids and
//! ids in the document, so recompiling an unchanged document produces the
//! same text.

/// 53-bit string hash over UTF-16 code units (cyrb53)
pub fn hash_string(value: &str, seed: u32) -> u64 {
    let mut h1: u32 = 0xdeadbeef ^ seed;
    let mut h2: u32 = 0x41c6ce57 ^ seed;
    for unit in value.encode_utf16() {
        let ch = unit as u32;
        h1 = (h1 ^ ch).wrapping_mul(2654435761);
        h2 = (h2 ^ ch).wrapping_mul(1597334677);
    }

    h1 = (h1 ^ (h1 >> 16)).wrapping_mul(2246822507) ^ (h2 ^ (h2 >> 13)).wrapping_mul(3266489909);
    h2 = (h2 ^ (h2 >> 16)).wrapping_mul(2246822507) ^ (h1 ^ (h1 >> 13)).wrapping_mul(3266489909);

    (((h2 & 0x1f_ffff) as u64) << 32) | h1 as u64
}

/// Graph variable name: `v<hash>`
pub fn variable_name(name: &str) -> String {
    format!("v{}", hash_string(name, 0))
}

/// Strip a guid down to identifier characters
pub fn sanitize_guid(guid: &str) -> String {
    guid.chars()
        .filter(|c| *c != '-')
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect()
}

/// Name of a node type's basic function: `f<guid>` or `c<guid>` for context nodes
pub fn basic_function_name(type_guid: &str, context: bool) -> String {
    let prefix = if context { 'c' } else { 'f' };
    format!("{}{}", prefix, sanitize_guid(type_guid))
}

/// Per-instance binding holding a context node's result
pub fn context_instance_name(node_id: &str) -> String {
    format!("ci{}", sanitize_guid(node_id))
}

/// Temp store key of a port: `<node id>:<port id>`
pub fn temp_key(node_id: &str, port_id: &str) -> String {
    format!("{}:{}", node_id, port_id)
}
