// src/utils/format.rs

// Every finite f64 has a terminating decimal expansion within this many places.
const EXACT_DIGITS: usize = 1074;

/// Fixed-point rendering with `decimals` digits after the point.
///
/// Rounds on the exact binary value, half away from zero, so exact ties such
/// as 3.125 go up (`"3.13"`) while 1.005 (really 1.00499...) goes down.
/// Zero of either sign and non-finite input render as plain zero.
/// Example: value=1234.56789, decimals=4 -> "1234.5679"
pub fn fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() || value == 0.0 {
        return format!("{:.*}", decimals, 0.0);
    }

    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(decimals))
        .collect();

    let round_up = frac_part
        .as_bytes()
        .get(decimals)
        .map_or(false, |d| *d >= b'5');
    if round_up {
        increment(&mut digits);
    }

    let int_len = digits.len() - decimals;
    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(digits[..int_len].iter().map(|&d| d as char));
    if decimals > 0 {
        out.push('.');
        out.extend(digits[int_len..].iter().map(|&d| d as char));
    }
    out
}

/// Adds one unit in the last place of an ASCII digit string.
fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Example: value=12.3, decimals=2, suffix="%" -> "12.30%"
pub fn with_suffix(value: f64, decimals: usize, suffix: &str) -> String {
    format!("{}{}", fixed(value, decimals), suffix)
}
