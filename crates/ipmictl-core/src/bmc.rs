//! Node name to management controller hostname

/// Hostname of the management controller for `host`
///
/// Names starting with a dotted quad are used as-is, anything else gets
/// `prefix` prepended. Already prefixed names are prefixed again.
pub fn management_hostname(host: &str, prefix: &str) -> String {
    if starts_with_dotted_quad(host) {
        host.to_string()
    } else {
        format!("{prefix}{host}")
    }
}

/// Four dot-separated groups of 1 to 3 digits at the start of `s`
pub fn starts_with_dotted_quad(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut pos = 0;

    for group in 0..4 {
        if group > 0 {
            if bytes.get(pos) != Some(&b'.') {
                return false;
            }
            pos += 1;
        }

        let digits = bytes[pos..]
            .iter()
            .take(3)
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return false;
        }
        pos += digits;
    }

    true
}
