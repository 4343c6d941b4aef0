//! Number formatting and numeral-string coercion.

/// Significant digits used when formatting non-integral numbers.
const PRECISION: usize = 14;

/// Format a number the way scripts print it: integral values without a
/// fractional part, everything else with up to 14 significant digits.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{n:.0}");
    }

    let sci = format!("{:.*e}", PRECISION - 1, n);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return n.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return n.to_string();
    };
    let precision = i32::try_from(PRECISION).unwrap_or(14);
    if exponent < -4 || exponent >= precision {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = usize::try_from(precision - 1 - exponent).unwrap_or(0);
        trim_fraction(&format!("{n:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Parse numeral text as arithmetic operands accept it: optional surrounding
/// whitespace, an optional sign, then a decimal (with optional exponent) or
/// `0x` hexadecimal integer.
pub fn parse_numeral(text: &str) -> Option<f64> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        hex_to_f64(u64::from_str_radix(hex, 16).ok()?)
    } else {
        let valid = !digits.is_empty()
            && !digits.starts_with(['+', '-'])
            && digits.bytes().any(|b| b.is_ascii_digit())
            && digits
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
        if !valid {
            return None;
        }
        digits.parse::<f64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

#[allow(clippy::cast_precision_loss, reason = "large hex numerals round")]
fn hex_to_f64(n: u64) -> f64 {
    n as f64
}

#[cfg(test)]
mod tests;
