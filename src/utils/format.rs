//! Elapsed time formatting

/// Format seconds as `HH : MM : SS`. Hours are never wrapped, so they grow
/// past two digits on long sessions.
pub fn format_elapsed(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{:02} : {:02} : {:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(display: &str) -> Option<u64> {
        let mut fields = display.split(" : ");
        let hours = fields.next()?;
        let minutes = fields.next()?;
        let seconds = fields.next()?;
        if fields.next().is_some()
            || hours.len() < 2
            || minutes.len() != 2
            || seconds.len() != 2
            || !display.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == ':')
        {
            return None;
        }

        let minutes: u64 = minutes.parse().ok()?;
        let seconds: u64 = seconds.parse().ok()?;
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        Some(hours.parse::<u64>().ok()? * 3600 + minutes * 60 + seconds)
    }

    #[test]
    fn formats_known_values() {
        assert_eq!(format_elapsed(0), "00 : 00 : 00");
        assert_eq!(format_elapsed(59), "00 : 00 : 59");
        assert_eq!(format_elapsed(60), "00 : 01 : 00");
        assert_eq!(format_elapsed(3599), "00 : 59 : 59");
        assert_eq!(format_elapsed(3661), "01 : 01 : 01");
    }

    #[test]
    fn hours_grow_past_two_digits() {
        assert_eq!(format_elapsed(100 * 3600), "100 : 00 : 00");
        assert_eq!(format_elapsed(360_000 + 3599), "100 : 59 : 59");
    }

    #[test]
    fn decoding_the_display_gives_back_the_seconds() {
        let samples = (0..7300).step_by(7).chain([86_399, 86_400, 1_000_000, u64::MAX]);
        for seconds in samples {
            assert_eq!(decode(&format_elapsed(seconds)), Some(seconds), "{}", seconds);
        }
    }
}
