extern crate regex;
use self::regex::Regex;

lazy_static! {
    static ref FRAME_ID: Regex = Regex::new(r"^[A-Z0-9]{4}$").unwrap();
    static ref TEXT_ID: Regex = Regex::new(r"^T[A-Z0-9]{3}$").unwrap();
    static ref URL_ID: Regex = Regex::new(r"^W[A-Z0-9]{3}$").unwrap();
}

pub fn is_frame_id(input: &str) -> bool {
    FRAME_ID.is_match(input)
}

// T??? frames share one text layout
pub fn is_text_id(input: &str) -> bool {
    TEXT_ID.is_match(input)
}

// W??? frames are a bare url
pub fn is_url_id(input: &str) -> bool {
    URL_ID.is_match(input)
}
