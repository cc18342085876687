//! Resolution codes and the small string/filename helpers glue built on top of them.

use std::fmt;

/// Resolution code addressing one of the three materialised copies of a picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResCode {
    Thumb = 0,
    Small = 1,
    Orig = 2,
}

impl ResCode {
    pub const COUNT: usize = 3;

    pub fn as_index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(ResCode::Thumb),
            1 => Some(ResCode::Small),
            2 => Some(ResCode::Orig),
            _ => None,
        }
    }
}

impl fmt::Display for ResCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResCode::Thumb => write!(f, "thumb"),
            ResCode::Small => write!(f, "small"),
            ResCode::Orig => write!(f, "orig"),
        }
    }
}

/// Case-sensitive prefix match, exactly as `spec.md` §6 specifies.
pub fn resolution_from_name(name: &str) -> Option<ResCode> {
    match name {
        "thumb" | "thumbnail" => Some(ResCode::Thumb),
        "small" => Some(ResCode::Small),
        "orig" | "original" => Some(ResCode::Orig),
        _ => None,
    }
}

/// Reproduces the original `create_name` helper from `pictDBM.c`: `{id}_{suffix}.jpg`.
pub fn output_filename(pict_id: &str, res: ResCode) -> String {
    let suffix = match res {
        ResCode::Thumb => "_thumb",
        ResCode::Small => "_small",
        ResCode::Orig => "_orig",
    };
    format!("{pict_id}{suffix}.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!(resolution_from_name("thumb"), Some(ResCode::Thumb));
        assert_eq!(resolution_from_name("thumbnail"), Some(ResCode::Thumb));
        assert_eq!(resolution_from_name("small"), Some(ResCode::Small));
        assert_eq!(resolution_from_name("orig"), Some(ResCode::Orig));
        assert_eq!(resolution_from_name("original"), Some(ResCode::Orig));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(resolution_from_name("ORIG"), None);
        assert_eq!(resolution_from_name("medium"), None);
        assert_eq!(resolution_from_name(""), None);
    }

    #[test]
    fn builds_output_filenames() {
        assert_eq!(output_filename("a", ResCode::Thumb), "a_thumb.jpg");
        assert_eq!(output_filename("a", ResCode::Small), "a_small.jpg");
        assert_eq!(output_filename("a", ResCode::Orig), "a_orig.jpg");
    }

    #[test]
    fn index_round_trip() {
        for code in [ResCode::Thumb, ResCode::Small, ResCode::Orig] {
            assert_eq!(ResCode::from_index(code.as_index()), Some(code));
        }
        assert_eq!(ResCode::from_index(3), None);
    }
}
