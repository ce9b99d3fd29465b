//! Field separator sniffing.

/// Candidate separators, in tie-break order.
pub const SNIFF_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of non-empty lines, starting at the header, inspected when sniffing.
const SNIFF_LINES: usize = 20;

/// Count `sep` occurrences outside double-quoted sections of `line`.
fn count_unquoted(line: &str, sep: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == sep && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Guess the field separator of `text`.
///
/// The first `skip_lines` non-empty lines are banner rows and ignored. For
/// each candidate the header line must contain it at least once; candidates
/// are ranked by how many sampled lines repeat the header's count, then by
/// that count. Ties keep the earlier candidate. Falls back to `,`.
pub fn sniff_separator(text: &str, skip_lines: usize) -> u8 {
    let sample: Vec<&str> = text
        .lines()
        .filter(|line| !line.is_empty())
        .skip(skip_lines)
        .take(SNIFF_LINES)
        .collect();
    let Some(header) = sample.first() else {
        return b',';
    };

    let mut best: Option<(u8, usize, usize)> = None;
    for sep in SNIFF_CANDIDATES {
        let header_count = count_unquoted(header, sep);
        if header_count == 0 {
            continue;
        }
        let consistent = sample
            .iter()
            .filter(|line| count_unquoted(line, sep) == header_count)
            .count();
        let better = match best {
            None => true,
            Some((_, best_consistent, best_count)) => {
                (consistent, header_count) > (best_consistent, best_count)
            }
        };
        if better {
            best = Some((sep, consistent, header_count));
        }
    }

    best.map_or(b',', |(sep, _, _)| sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semicolon_detected() {
        let text = "PROCESSO;VALOR;UF\n1;10,50;SP\n2;20,00;RJ\n";
        assert_eq!(sniff_separator(text, 0), b';');
    }

    #[test]
    fn test_commas_inside_quotes_ignored() {
        let text = "A;B\n\"x, y, z\";1\n\"p, q\";2\n";
        assert_eq!(sniff_separator(text, 0), b';');
    }

    #[test]
    fn test_banner_lines_skipped() {
        let text = "Relatório, gerado em 01/02/2023\n\nA\tB\tC\n1\t2\t3\n";
        assert_eq!(sniff_separator(text, 1), b'\t');
    }

    #[test]
    fn test_fallback_comma() {
        assert_eq!(sniff_separator("single\nvalue\n", 0), b',');
        assert_eq!(sniff_separator("", 0), b',');
    }

    #[test]
    fn test_tie_keeps_earlier_candidate() {
        let text = "a,b|c\n1,2|3\n";
        assert_eq!(sniff_separator(text, 0), b',');
    }
}
