//! Wire-writing combinators on [`Writer`].

use std::io;

use super::{Sink, Writer};

/// Fractional digits emitted by [`Writer::write_number`]. Values are
/// rounded at this position before any digit goes out.
pub const FRACTION_DIGITS: u32 = 6;

impl<W: Sink> Writer<W> {
    /// Writes a single byte.
    pub async fn write_char(&mut self, byte: u8) -> io::Result<()> {
        self.write_all(&[byte]).await
    }

    /// Writes the `\r\n` line terminator.
    pub async fn write_crlf(&mut self) -> io::Result<()> {
        self.write_all(b"\r\n").await
    }

    /// [`Writer::write_number`] in base 10.
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use nano_http::io::Writer;
    /// use nano_http::task::block_on;
    ///
    /// let mut writer = Writer::new(BytesMut::new());
    /// block_on(writer.write_decimal(-45.0)).unwrap();
    /// assert_eq!(writer.get_ref().as_ref(), b"-45");
    /// ```
    pub async fn write_decimal(&mut self, number: f64) -> io::Result<()> {
        self.write_number::<10>(number).await
    }

    /// Writes `number` in the given base without allocating.
    ///
    /// Digits are first extracted least-significant-first into a reversed
    /// accumulator seeded with a sentinel `1`, then popped back out
    /// most-significant-first; the sentinel keeps leading fraction zeros
    /// from collapsing (`123.05` in base 10 accumulates as `150321`:
    /// sentinel, fraction digits, then integer digits, each low-to-high).
    /// Digits ten and up map to `'a'..`, which keeps the
    /// scheme printable for bases up to 45.
    ///
    /// The fraction is rounded at [`FRACTION_DIGITS`] digits and trailing
    /// zeros are trimmed; an all-zero fraction drops the `.` entirely, so
    /// integral values render as plain integers. A zero integer part still
    /// renders a leading `0` (`0.5`, not `.5`).
    ///
    /// Non-finite values and magnitudes at or above `u64::MAX` are
    /// [`io::ErrorKind::InvalidInput`] errors.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        reason = "magnitude is checked non-negative and below u64::MAX before casting, and \
                  fraction digit counts stay far inside the f64 mantissa"
    )]
    pub async fn write_number<const BASE: u8>(&mut self, number: f64) -> io::Result<()> {
        const { assert!(BASE >= 2 && BASE <= 45, "base must be between 2 and 45") };

        if !number.is_finite() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot render a non-finite number",
            ));
        }
        let negative = number < 0.0;
        let magnitude = number.abs();
        if magnitude >= u64::MAX as f64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "number magnitude exceeds the integer range",
            ));
        }

        let base = u64::from(BASE);
        let fraction_cap = base.pow(FRACTION_DIGITS);

        let mut integer = magnitude.trunc() as u64;
        let mut fraction = (magnitude.fract() * fraction_cap as f64).round() as u64;
        let mut fraction_len = FRACTION_DIGITS;
        if fraction >= fraction_cap {
            // Rounding carried through every fractional digit.
            integer += 1;
            fraction = 0;
        }
        while fraction != 0 && fraction % base == 0 {
            fraction /= base;
            fraction_len -= 1;
        }
        if fraction == 0 {
            fraction_len = 0;
        }

        let wide_base = u128::from(base);
        let mut reversed: u128 = 1;
        for _ in 0..fraction_len {
            reversed = reversed * wide_base + u128::from(fraction % base);
            fraction /= base;
        }
        let mut integer_len = 0;
        if integer == 0 {
            reversed *= wide_base;
            integer_len = 1;
        }
        while integer != 0 {
            reversed = reversed * wide_base + u128::from(integer % base);
            integer /= base;
            integer_len += 1;
        }

        if negative {
            self.write_char(b'-').await?;
        }
        for _ in 0..integer_len {
            let digit = (reversed % wide_base) as u8;
            reversed /= wide_base;
            self.write_char(digit_char(digit)).await?;
        }
        if reversed != 1 {
            self.write_char(b'.').await?;
            while reversed != 1 {
                let digit = (reversed % wide_base) as u8;
                reversed /= wide_base;
                self.write_char(digit_char(digit)).await?;
            }
        }
        Ok(())
    }
}

const fn digit_char(digit: u8) -> u8 {
    if digit < 10 {
        b'0' + digit
    } else {
        b'a' + digit - 10
    }
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;

    use crate::task::block_on;

    use super::*;

    fn render<const BASE: u8>(number: f64) -> String {
        let mut writer = Writer::new(BytesMut::new());
        block_on(writer.write_number::<BASE>(number)).unwrap();
        String::from_utf8(writer.into_inner().to_vec()).unwrap()
    }

    #[test]
    fn integers_in_base_ten() {
        assert_eq!(render::<10>(0.0), "0");
        assert_eq!(render::<10>(123.0), "123");
        assert_eq!(render::<10>(-45.0), "-45");
    }

    #[test]
    fn digits_past_nine_use_letters() {
        assert_eq!(render::<16>(255.0), "ff");
        assert_eq!(render::<16>(26.0), "1a");
        assert_eq!(render::<36>(35.0), "z");
    }

    #[test]
    fn fractions_trim_trailing_zeros() {
        assert_eq!(render::<10>(1.5), "1.5");
        assert_eq!(render::<10>(2.50), "2.5");
        assert_eq!(render::<10>(0.25), "0.25");
        assert_eq!(render::<10>(-0.5), "-0.5");
    }

    #[test]
    fn fraction_keeps_leading_zeros() {
        assert_eq!(render::<10>(0.05), "0.05");
        assert_eq!(render::<10>(123.05), "123.05");
    }

    #[test]
    fn fraction_rounds_at_the_sixth_digit() {
        assert_eq!(render::<10>(3.141_592_653_5), "3.141593");
        assert_eq!(render::<10>(1.000_000_4), "1");
    }

    #[test]
    fn rounding_can_carry_into_the_integer() {
        assert_eq!(render::<10>(0.999_999_9), "1");
        assert_eq!(render::<10>(-1.999_999_9), "-2");
    }

    #[test]
    fn fractions_follow_the_base() {
        assert_eq!(render::<16>(255.5), "ff.8");
        assert_eq!(render::<2>(5.25), "101.01");
    }

    #[test]
    fn non_finite_and_oversized_are_rejected() {
        let mut writer = Writer::new(BytesMut::new());
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e300] {
            let error = block_on(writer.write_decimal(bad)).unwrap_err();
            assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
        }
        assert!(writer.get_ref().is_empty());
    }
}
