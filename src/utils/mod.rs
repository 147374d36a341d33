//! Shared utilities.

pub mod date;
pub mod html;
pub mod path;

/// `"1 post"`, `"0 posts"`, `"3 publications"`.
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "post"), "0 posts");
        assert_eq!(plural_count(1, "post"), "1 post");
        assert_eq!(plural_count(2, "publication"), "2 publications");
    }
}
