use once_cell::sync::Lazy;
use regex::Regex;

/// Dotted-quad IPv4 with octet range checking.
pub static IP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:25[0-5]|2[0-4]\d|[01]?\d\d?)\.){3}(?:25[0-5]|2[0-4]\d|[01]?\d\d?)\b")
        .unwrap()
});

// First digit run after the IP, separated only by non-digit text.
static DEC_PORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A[^0-9]{0,400}?(\d{1,5})\b").unwrap());

// Tight "ip:port" form used by sources that emit plain lists.
static IP_COLON_PORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b((?:(?:25[0-5]|2[0-4]\d|[01]?\d\d?)\.){3}(?:25[0-5]|2[0-4]\d|[01]?\d\d?)):(\d{1,5})\b",
    )
    .unwrap()
});

pub fn valid_port(port: &str) -> bool {
    matches!(port.parse::<u32>(), Ok(p) if (1..=65535).contains(&p))
}

/// Baseline extraction: every IPv4 token paired with the nearest port-like
/// digit run that follows it, searching only up to the next IPv4 token so a
/// port never gets attributed to the wrong address. Works for raw "ip:port"
/// lists and for table markup where ip and port sit in adjacent cells.
pub fn scan_ip_port(page: &str) -> Vec<(String, String)> {
    scan_windows(page, |window| {
        DEC_PORT_RE
            .captures(window)
            .map(|c| c[1].to_string())
            .filter(|p| valid_port(p))
    })
}

/// Same windowing as `scan_ip_port`, but the port token is located by a
/// caller-supplied pattern (capture group 1) anywhere in the window.
pub fn scan_with_port_pattern(page: &str, port_re: &Regex) -> Vec<(String, String)> {
    scan_windows(page, |window| {
        port_re.captures(window).map(|c| c[1].to_string())
    })
}

/// Strict "ip:port" extraction with numeric port validation, for sources
/// whose pages interleave addresses with other digit noise.
pub fn scan_ip_colon_port(page: &str) -> Vec<(String, String)> {
    IP_COLON_PORT_RE
        .captures_iter(page)
        .filter(|c| valid_port(&c[2]))
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

fn scan_windows<F>(page: &str, find_port: F) -> Vec<(String, String)>
where
    F: Fn(&str) -> Option<String>,
{
    let ips: Vec<_> = IP_RE.find_iter(page).collect();
    let mut pairs = Vec::new();
    for (i, ip) in ips.iter().enumerate() {
        let end = ips.get(i + 1).map(|next| next.start()).unwrap_or(page.len());
        if let Some(port) = find_port(&page[ip.end()..end]) {
            pairs.push((ip.as_str().to_string(), port));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ip_port_list() {
        let page = "127.0.0.1:8080\n10.1.2.3:80\n";
        assert_eq!(
            scan_ip_port(page),
            vec![
                ("127.0.0.1".to_string(), "8080".to_string()),
                ("10.1.2.3".to_string(), "80".to_string()),
            ]
        );
    }

    #[test]
    fn table_markup_with_adjacent_cells() {
        let page = "<tr><td>91.205.218.64</td><td>3128</td></tr>\
                    <tr><td>203.0.113.7</td><td>1080</td></tr>";
        assert_eq!(
            scan_ip_port(page),
            vec![
                ("91.205.218.64".to_string(), "3128".to_string()),
                ("203.0.113.7".to_string(), "1080".to_string()),
            ]
        );
    }

    #[test]
    fn port_never_crosses_into_next_address() {
        // no port between the first ip and the second: first ip is dropped
        let page = "1.2.3.4 then 5.6.7.8:9090";
        assert_eq!(
            scan_ip_port(page),
            vec![("5.6.7.8".to_string(), "9090".to_string())]
        );
    }

    #[test]
    fn out_of_range_ports_rejected() {
        assert!(scan_ip_port("1.2.3.4:99999").is_empty());
        assert!(scan_ip_colon_port("1.2.3.4:70000").is_empty());
        assert_eq!(
            scan_ip_colon_port("1.2.3.4:65535"),
            vec![("1.2.3.4".to_string(), "65535".to_string())]
        );
    }

    #[test]
    fn invalid_octets_not_matched() {
        assert!(scan_ip_port("300.1.2.3:8080").is_empty());
    }

    #[test]
    fn custom_port_pattern() {
        let re = Regex::new(r"'([0-9A-Fa-f]{1,4})'").unwrap();
        let page = "addr 10.0.0.1 port 'C38' done";
        assert_eq!(
            scan_with_port_pattern(page, &re),
            vec![("10.0.0.1".to_string(), "C38".to_string())]
        );
    }
}
