use anyhow::{Context, Result};
use std::io::{self, Write};

/// Search page used when the operator just presses enter: two-room
/// apartments for sale in Kalasatama, Helsinki.
pub const DEFAULT_LISTINGS_URL: &str = "https://asunnot.oikotie.fi/myytavat-asunnot?pagination=1&locations=%5B%5B5695451,4,%22Kalasatama,%20Helsinki%22%5D%5D&cardType=100&roomCount%5B%5D=2";

/// Detail page used when the operator just presses enter.
pub const DEFAULT_LISTING_URL: &str =
    "https://asunnot.oikotie.fi/myytavat-asunnot/hollola/17674777";

/// Ask for a URL on stdin; empty input picks the default.
pub fn prompt_url(what: &str, default: &str) -> Result<String> {
    println!("{} (enter for default)", what);
    print!("[{}]: ", default);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    Ok(resolve(&line, default))
}

fn resolve(input: &str, default: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        default.to_string()
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_falls_back_to_the_default() {
        assert_eq!(resolve("", DEFAULT_LISTING_URL), DEFAULT_LISTING_URL);
        assert_eq!(resolve("  \n", DEFAULT_LISTING_URL), DEFAULT_LISTING_URL);
    }

    #[test]
    fn explicit_input_wins_over_the_default() {
        assert_eq!(
            resolve("https://asunnot.oikotie.fi/myytavat-asunnot/turku/99\n", DEFAULT_LISTING_URL),
            "https://asunnot.oikotie.fi/myytavat-asunnot/turku/99"
        );
    }
}
