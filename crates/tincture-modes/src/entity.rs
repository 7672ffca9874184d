#![forbid(unsafe_code)]

//! Character-entity recognition (`&name;`, `&#123;`).

use tincture_core::Line;

/// Length of the character entity starting at `pos`, or 0 if there is none.
///
/// Grammar: `&` then either `#` and one or more decimal digits, or an ASCII
/// letter and any number of ASCII alphanumerics. A trailing `;` is included
/// when present but is not required. Pure lookahead: nothing is consumed.
pub fn entity_len(line: Line<'_>, pos: usize) -> usize {
    if line.at(pos) != '&' {
        return 0;
    }
    let mut j = pos + 1;
    match line.at(j) {
        '#' => {
            j += 1;
            let digits = j;
            while line.at(j).is_ascii_digit() {
                j += 1;
            }
            if j == digits {
                return 0;
            }
        }
        c if c.is_ascii_alphabetic() => {
            j += 1;
            while line.at(j).is_ascii_alphanumeric() {
                j += 1;
            }
        }
        _ => return 0,
    }
    if line.at(j) == ';' {
        j += 1;
    }
    j - pos
}
