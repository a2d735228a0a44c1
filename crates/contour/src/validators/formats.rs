//! Built-in string formats

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use crate::foundation::definition::StringFormat;

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$"
    ).unwrap()
});

static URL_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s/$.?#][^\s]*$").unwrap());

static UUID_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
    )
    .unwrap()
});

static DATETIME_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])T([01]\d|2[0-3]):[0-5]\d:[0-5]\d(\.\d+)?(Z|[+-]([01]\d|2[0-3]):[0-5]\d)$",
    )
    .unwrap()
});

static DATE_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").unwrap()
});

static TIME_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^([01]\d|2[0-3]):[0-5]\d(:[0-5]\d(\.\d+)?)?$").unwrap()
});

static BASE64_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^([A-Za-z0-9+/]{4})*([A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$").unwrap()
});

/// Checks that the leading `YYYY-MM-DD` names a day that exists.
fn is_calendar_date(input: &str) -> bool {
    let field = |range: std::ops::Range<usize>| input.get(range)?.parse::<u32>().ok();
    let (Some(year), Some(month), Some(day)) = (field(0..4), field(5..7), field(8..10)) else {
        return false;
    };
    day >= 1 && day <= days_in_month(year, month)
}

const fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl StringFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Url => "url",
            Self::Uuid => "uuid",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Ip => "ip",
            Self::Datetime => "datetime",
            Self::Date => "date",
            Self::Time => "time",
            Self::Base64 => "base64",
        }
    }

    /// Default message for a value that does not match.
    pub(crate) const fn message(self) -> &'static str {
        match self {
            Self::Email => "Invalid email",
            Self::Url => "Invalid url",
            Self::Uuid => "Invalid uuid",
            Self::Ipv4 | Self::Ipv6 | Self::Ip => "Invalid ip",
            Self::Datetime => "Invalid datetime",
            Self::Date => "Invalid date",
            Self::Time => "Invalid time",
            Self::Base64 => "Invalid base64",
        }
    }

    #[must_use]
    pub fn matches(self, input: &str) -> bool {
        match self {
            Self::Email => EMAIL_REGEX.is_match(input),
            Self::Url => URL_REGEX.is_match(input),
            Self::Uuid => UUID_REGEX.is_match(input),
            Self::Ipv4 => input.parse::<Ipv4Addr>().is_ok(),
            Self::Ipv6 => input.parse::<Ipv6Addr>().is_ok(),
            Self::Ip => Self::Ipv4.matches(input) || Self::Ipv6.matches(input),
            Self::Datetime => DATETIME_REGEX.is_match(input) && is_calendar_date(input),
            Self::Date => DATE_REGEX.is_match(input) && is_calendar_date(input),
            Self::Time => TIME_REGEX.is_match(input),
            Self::Base64 => BASE64_REGEX.is_match(input),
        }
    }
}
