//! Media fragment addressing (`#t=start,end`)

/// Locator without any `#...` fragment
pub fn strip_fragment(src: &str) -> &str {
    src.split_once('#').map(|(base, _)| base).unwrap_or(src)
}

/// Base locator plus a `#t=start,end` time-range fragment
pub fn fragment_source(base: &str, start: f64, end: f64) -> String {
    format!("{}#t={},{}", strip_fragment(base), start, end)
}

/// Parse a `#t=start[,end]` fragment from a locator
pub fn parse_fragment(src: &str) -> Option<(f64, Option<f64>)> {
    let (_, fragment) = src.split_once('#')?;
    let range = fragment
        .split('&')
        .find_map(|part| part.strip_prefix("t="))?;

    let (start, end) = match range.split_once(',') {
        Some((start, end)) => (start, Some(end)),
        None => (range, None),
    };

    let start = if start.is_empty() { 0.0 } else { start.parse::<f64>().ok()? };
    let end = match end {
        Some(end) => Some(end.parse::<f64>().ok()?),
        None => None,
    };
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_source_formats_plain_numbers() {
        assert_eq!(
            fragment_source("file:///v/talk.mp4", 3.0, 14.0),
            "file:///v/talk.mp4#t=3,14"
        );
        assert_eq!(
            fragment_source("https://x/v.mp4#t=1,2", 0.5, 2.5),
            "https://x/v.mp4#t=0.5,2.5"
        );
    }

    #[test]
    fn test_parse_fragment() {
        assert_eq!(parse_fragment("a.mp4#t=3,14"), Some((3.0, Some(14.0))));
        assert_eq!(parse_fragment("a.mp4#t=7"), Some((7.0, None)));
        assert_eq!(parse_fragment("a.mp4#t=,9"), Some((0.0, Some(9.0))));
        assert_eq!(parse_fragment("a.mp4#xywh=1,2&t=4,5"), Some((4.0, Some(5.0))));
        assert_eq!(parse_fragment("a.mp4"), None);
        assert_eq!(parse_fragment("a.mp4#t=abc"), None);
    }

    #[test]
    fn test_strip_fragment() {
        assert_eq!(strip_fragment("a.mp4#t=1,2"), "a.mp4");
        assert_eq!(strip_fragment("a.mp4"), "a.mp4");
    }
}
