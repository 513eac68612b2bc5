//! Best-effort repair of mis-decoded multi-byte text.
//!
//! Some stored snippets went through a lossy byte pipeline: UTF-8 text (often
//! Bengali) was decoded as a single-byte codec somewhere, so what we retrieve
//! is mojibake. If a snippet contains any character above 7-bit ASCII we try
//! to reverse the damage by re-encoding through Latin-1, then Windows-1252,
//! and re-decoding as UTF-8. If neither round trip yields valid UTF-8 the
//! text is returned unchanged — this never fails, it only degrades to a no-op.

/// Repair potentially mis-decoded text. Identity on pure ASCII.
pub fn repair(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }

    if let Some(bytes) = encode_latin1(text)
        && let Ok(fixed) = String::from_utf8(bytes)
    {
        return fixed;
    }

    if let Some(bytes) = encode_windows_1252(text)
        && let Ok(fixed) = String::from_utf8(bytes)
    {
        return fixed;
    }

    text.to_string()
}

/// Encode as Latin-1 (ISO-8859-1). `None` if any char is above U+00FF.
fn encode_latin1(text: &str) -> Option<Vec<u8>> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF { Some(code as u8) } else { None }
        })
        .collect()
}

/// Encode as Windows-1252. `None` if any char has no CP1252 byte.
fn encode_windows_1252(text: &str) -> Option<Vec<u8>> {
    text.chars().map(cp1252_byte).collect()
}

/// The CP1252 byte for one char, if any.
///
/// CP1252 matches Latin-1 except for the 0x80–0x9F block, which maps to
/// typographic punctuation instead of C1 control characters.
fn cp1252_byte(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x00..=0x7F => Some(code as u8),
        0xA0..=0xFF => Some(code as u8),
        _ => match c {
            '\u{20AC}' => Some(0x80), // €
            '\u{201A}' => Some(0x82), // ‚
            '\u{0192}' => Some(0x83), // ƒ
            '\u{201E}' => Some(0x84), // „
            '\u{2026}' => Some(0x85), // …
            '\u{2020}' => Some(0x86), // †
            '\u{2021}' => Some(0x87), // ‡
            '\u{02C6}' => Some(0x88), // ˆ
            '\u{2030}' => Some(0x89), // ‰
            '\u{0160}' => Some(0x8A), // Š
            '\u{2039}' => Some(0x8B), // ‹
            '\u{0152}' => Some(0x8C), // Œ
            '\u{017D}' => Some(0x8E), // Ž
            '\u{2018}' => Some(0x91), // ‘
            '\u{2019}' => Some(0x92), // ’
            '\u{201C}' => Some(0x93), // “
            '\u{201D}' => Some(0x94), // ”
            '\u{2022}' => Some(0x95), // •
            '\u{2013}' => Some(0x96), // –
            '\u{2014}' => Some(0x97), // —
            '\u{02DC}' => Some(0x98), // ˜
            '\u{2122}' => Some(0x99), // ™
            '\u{0161}' => Some(0x9A), // š
            '\u{203A}' => Some(0x9B), // ›
            '\u{0153}' => Some(0x9C), // œ
            '\u{017E}' => Some(0x9E), // ž
            '\u{0178}' => Some(0x9F), // Ÿ
            _ => None,
        },
    }
}
