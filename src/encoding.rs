//! ENC — byte-string decoding, mojibake and C1-corruption repair.
//!
//! Filenames inside legacy GRF archives were written under one of a
//! handful of byte encodings depending on the authoring tool and locale.
//! This module decodes raw name bytes under a chosen encoding, detects
//! when a name looks like it was produced by a lossy Latin-1 reinterpretation
//! of CP949 bytes ("mojibake"), and repairs both mojibake and a narrower
//! C1-control corruption pattern seen in partially-converted paths.

use encoding_rs::EUC_KR;
use unicode_normalization::UnicodeNormalization;

use crate::error::{GrfError, Result};

/// The byte encoding under which an archive's filenames are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Utf8Strict,
    /// CP949 and EUC-KR are treated identically: `encoding_rs::EUC_KR`
    /// already implements the WHATWG "euc-kr" encoding, which is a
    /// superset compatible with CP949's extended lead-byte range.
    Cp949,
    Latin1,
}

impl Encoding {
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8Strict => "utf-8",
            Encoding::Cp949 => "cp949",
            Encoding::Latin1 => "latin1",
        }
    }
}

/// Decodes `bytes` under `encoding`.
///
/// UTF-8 strict mode fails on any ill-formed sequence rather than
/// substituting U+FFFD.
pub fn decode(bytes: &[u8], encoding: Encoding) -> Result<String> {
    match encoding {
        Encoding::Utf8Strict => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| GrfError::ConfigError(format!("invalid UTF-8: {e}"))),
        Encoding::Cp949 => {
            let (cow, _, _had_errors) = EUC_KR.decode(bytes);
            Ok(cow.into_owned())
        }
        Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Encodes `s` under `encoding`, the inverse of [`decode`].
pub fn encode(s: &str, encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Utf8Strict => s.as_bytes().to_vec(),
        Encoding::Cp949 => {
            let (cow, _, _had_errors) = EUC_KR.encode(s);
            cow.into_owned()
        }
        Encoding::Latin1 => s.chars().map(|c| c as u32 as u8).collect(),
    }
}

/// ASCII fast path, otherwise a strict UTF-8 validation.
pub fn is_utf8(bytes: &[u8]) -> bool {
    if bytes.iter().all(u8::is_ascii) {
        return true;
    }
    std::str::from_utf8(bytes).is_ok()
}

/// Counts U+FFFD (REPLACEMENT CHARACTER) code points.
pub fn count_replacement(s: &str) -> usize {
    s.chars().filter(|&c| c == '\u{FFFD}').count()
}

/// Counts C1 control code points, U+0080..=U+009F.
pub fn count_c1(s: &str) -> usize {
    s.chars()
        .filter(|&c| ('\u{0080}'..='\u{009F}').contains(&c))
        .count()
}

/// Counts Hangul syllable code points, U+AC00..=U+D7A3.
pub fn count_hangul(s: &str) -> usize {
    s.chars()
        .filter(|&c| ('\u{AC00}'..='\u{D7A3}').contains(&c))
        .count()
}

/// True when `s` contains a contiguous run of characters in
/// U+00A0..=U+00FF — the signature of CP949 bytes reinterpreted as
/// Latin-1 — that itself decodes cleanly to CP949 and yields Hangul.
/// A real filename typically trails such a run with a plain ASCII
/// extension, so the whole string is not required to qualify, only the
/// longest affected run within it.
pub fn is_mojibake(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    for run in s.split(|c: char| !('\u{00A0}'..='\u{00FF}').contains(&c)) {
        if run.is_empty() {
            continue;
        }
        let bytes: Vec<u8> = run.chars().map(|c| c as u32 as u8).collect();
        let (cow, _, had_errors) = EUC_KR.decode(&bytes);
        if !had_errors && count_hangul(&cow) > 0 {
            return true;
        }
    }
    false
}

/// Reinterprets the code points of `s` as raw bytes in 0x00..=0xFF and
/// decodes those bytes as CP949. Returns `s` unchanged if that decode
/// produces replacement characters (i.e. is not a clean CP949 sequence).
pub fn fix_mojibake(s: &str) -> String {
    let Some(bytes): Option<Vec<u8>> = s
        .chars()
        .map(|c| u8::try_from(c as u32).ok())
        .collect()
    else {
        return s.to_string();
    };

    let (cow, _, had_errors) = EUC_KR.decode(&bytes);
    if had_errors {
        return s.to_string();
    }
    cow.into_owned()
}

/// Collects the leading run of code points `<= 0xFF` in `segment`, decodes
/// them as CP949, and concatenates the result with the unchanged tail.
/// The repair is accepted only if it strictly decreases the C1 count
/// without increasing the U+FFFD count (Open Question (b)).
pub fn fix_c1_prefix(segment: &str, _encoding: Encoding) -> String {
    let prefix_len = segment
        .chars()
        .take_while(|&c| (c as u32) <= 0xFF)
        .count();
    if prefix_len == 0 {
        return segment.to_string();
    }

    let prefix: String = segment.chars().take(prefix_len).collect();
    let tail: String = segment.chars().skip(prefix_len).collect();

    let Some(prefix_bytes): Option<Vec<u8>> =
        prefix.chars().map(|c| u8::try_from(c as u32).ok()).collect()
    else {
        return segment.to_string();
    };

    let (cow, _, had_errors) = EUC_KR.decode(&prefix_bytes);
    if had_errors {
        return segment.to_string();
    }

    let candidate = format!("{}{}", cow, tail);

    let original_c1 = count_c1(segment);
    let candidate_c1 = count_c1(&candidate);
    let original_ufffd = count_replacement(segment);
    let candidate_ufffd = count_replacement(&candidate);

    if candidate_c1 < original_c1 && candidate_ufffd <= original_ufffd {
        candidate
    } else {
        segment.to_string()
    }
}

/// Applies [`fix_mojibake`] to the whole path, then [`fix_c1_prefix`] to
/// each `/`-separated segment.
pub fn repair(filename: &str, encoding: Encoding) -> String {
    let demojibaked = fix_mojibake(filename);
    demojibaked
        .split('/')
        .map(|segment| fix_c1_prefix(segment, encoding))
        .collect::<Vec<_>>()
        .join("/")
}

/// `decode(encode(s, enc), enc) == s`.
pub fn roundtrip_ok(s: &str, enc: Encoding) -> bool {
    let encoded = encode(s, enc);
    match decode(&encoded, enc) {
        Ok(decoded) => decoded == s,
        Err(_) => false,
    }
}

/// Canonicalizes a path for lookup: fold `/`-or-`\` runs to a single `/`,
/// lowercase ASCII, then apply Unicode NFC.
pub fn normalize(path: &str) -> String {
    let mut folded = String::with_capacity(path.len());
    let mut last_was_slash = false;
    for c in path.chars() {
        if c == '/' || c == '\\' {
            if !last_was_slash {
                folded.push('/');
            }
            last_was_slash = true;
        } else {
            folded.push(c.to_ascii_lowercase());
            last_was_slash = false;
        }
    }
    folded.nfc().collect()
}
