//! Delimiter sniffing for plain text tables

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::DataError;

/// Candidate delimiters in tie-break priority order
pub const CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Sniff the delimiter from the first `sample_lines` non-blank lines of a file
pub fn sniff_file(path: &Path, sample_lines: usize) -> Result<u8, DataError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::with_capacity(sample_lines);
    for line in reader.lines() {
        let line = line.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => DataError::malformed(path, "file is not valid UTF-8"),
            _ => e.into(),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        lines.push(line);
        if lines.len() >= sample_lines {
            break;
        }
    }

    let delimiter = sniff_delimiter(&lines)
        .ok_or_else(|| DataError::malformed(path, "could not detect a column delimiter"))?;
    debug!(
        "Detected delimiter {:?} in {}",
        char::from(delimiter),
        path.display()
    );
    Ok(delimiter)
}

/// Pick the candidate whose field count is most consistent across `lines`
pub fn sniff_delimiter<S: AsRef<str>>(lines: &[S]) -> Option<u8> {
    let mut best: Option<(u8, usize)> = None;

    for &candidate in &CANDIDATES {
        let Some((modal, support)) = modal_field_count(lines, candidate) else {
            continue;
        };
        if modal < 2 {
            continue;
        }
        // Strictly greater keeps the earlier candidate on ties
        if best.map_or(true, |(_, best_support)| support > best_support) {
            best = Some((candidate, support));
        }
    }

    best.map(|(delimiter, _)| delimiter)
}

/// Most frequent field count and how many lines have it; ties favor the larger count
fn modal_field_count<S: AsRef<str>>(lines: &[S], delimiter: u8) -> Option<(usize, usize)> {
    let mut frequencies: BTreeMap<usize, usize> = BTreeMap::new();
    for line in lines {
        *frequencies
            .entry(field_count(line.as_ref(), delimiter))
            .or_default() += 1;
    }

    frequencies
        .into_iter()
        .max_by(|(count_a, freq_a), (count_b, freq_b)| {
            freq_a.cmp(freq_b).then(count_a.cmp(count_b))
        })
}

fn field_count(line: &str, delimiter: u8) -> usize {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(line.as_bytes());
    reader
        .records()
        .next()
        .and_then(Result::ok)
        .map_or(1, |record| record.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_semicolon_table() {
        assert_eq!(sniff_delimiter(&["a;b;c", "1;2;3", "4;5;6"]), Some(b';'));
    }

    #[test]
    fn test_quoted_delimiters_ignored() {
        let lines = ["name|note", "Ann|\"x, y, z\"", "Bob|\"a, b\""];
        assert_eq!(sniff_delimiter(&lines), Some(b'|'));
    }

    #[test]
    fn test_tab_separated() {
        assert_eq!(sniff_delimiter(&["x\ty", "1\t2"]), Some(b'\t'));
    }

    #[test]
    fn test_priority_on_equal_support() {
        // Both comma and semicolon split every line into two fields
        assert_eq!(sniff_delimiter(&["a,b;c", "1,2;3"]), Some(b','));
    }

    #[test]
    fn test_no_candidate() {
        assert_eq!(sniff_delimiter(&["single", "column"]), None);
        assert_eq!(sniff_delimiter::<&str>(&[]), None);
    }

    #[test]
    fn test_modal_count_prefers_larger_on_tie() {
        assert_eq!(modal_field_count(&["a,b", "a,b,c"], b','), Some((3, 1)));
    }

    #[test]
    fn test_sniff_file_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "\n\na|b\n\n1|2\n").unwrap();
        assert_eq!(sniff_file(&path, 10).unwrap(), b'|');

        let single = dir.path().join("single.txt");
        fs::write(&single, "one\ntwo\n").unwrap();
        assert!(matches!(
            sniff_file(&single, 10),
            Err(DataError::MalformedData { .. })
        ));
    }

    #[test]
    fn test_sniff_file_rejects_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        fs::write(&path, b"a|b\n\xc3\x28|2\n").unwrap();
        match sniff_file(&path, 10) {
            Err(DataError::MalformedData { reason, .. }) => assert!(reason.contains("UTF-8")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
