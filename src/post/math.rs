//! Display-math extraction.
//!
//! `$$ ... $$` blocks are pulled out before Markdown rendering so the
//! renderer cannot mangle LaTeX (emphasis, smart quotes, escapes). Each
//! block is replaced by an inert placeholder and restored afterwards
//! inside a `math-display` container for client-side typesetting.
//!
//! Fenced code (```` ``` ````) is copied untouched, so `$$` inside code
//! samples stays literal.

const FENCE: &str = "```";
const MATH: &str = "$$";

/// Markdown with math blocks replaced by placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedMath {
    pub text: String,
    /// Trimmed LaTeX source, indexed by placeholder number.
    pub blocks: Vec<String>,
}

/// Placeholder inserted for block `index`.
pub fn placeholder(index: usize) -> String {
    format!("@@BLOCKMATH{index}@@")
}

/// Replace every `$$...$$` outside fenced code with a placeholder.
///
/// Unterminated fences or math blocks leave the rest of the input as-is.
pub fn extract_block_math(input: &str) -> ExtractedMath {
    let mut out = ExtractedMath {
        text: String::with_capacity(input.len()),
        blocks: Vec::new(),
    };
    let mut i = 0;

    while i < input.len() {
        let rest = &input[i..];

        if rest.starts_with(FENCE) {
            let Some(close) = rest[FENCE.len()..].find(FENCE) else {
                out.text.push_str(rest);
                break;
            };
            let fence_end = FENCE.len() + close + FENCE.len();
            // Keep the closing fence's whole line, newline included
            let copy_to = match rest[fence_end..].find('\n') {
                Some(nl) => fence_end + nl + 1,
                None => rest.len(),
            };
            out.text.push_str(&rest[..copy_to]);
            i += copy_to;
            continue;
        }

        if rest.starts_with(MATH) {
            let Some(close) = rest[MATH.len()..].find(MATH) else {
                out.text.push_str(rest);
                break;
            };
            let latex = &rest[MATH.len()..MATH.len() + close];
            out.text.push_str(&placeholder(out.blocks.len()));
            out.blocks.push(latex.trim().to_string());
            i += MATH.len() + close + MATH.len();
            continue;
        }

        // Advance one char, or a run of chars that cannot start a token
        let step = rest
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '`' || *c == '$')
            .map_or(rest.len(), |(idx, _)| idx);
        out.text.push_str(&rest[..step]);
        i += step;
    }

    out
}

/// Put math blocks back into rendered HTML.
///
/// Each placeholder's first occurrence becomes
/// `<div class="math-display">$$\n{latex}\n$$</div>`.
pub fn restore_block_math(html: &str, blocks: &[String]) -> String {
    let mut html = html.to_string();
    for (idx, latex) in blocks.iter().enumerate() {
        let block = format!("<div class=\"math-display\">$$\n{latex}\n$$</div>");
        html = html.replacen(&placeholder(idx), &block, 1);
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_single_block() {
        let out = extract_block_math("before\n$$\n a^2 + b^2 \n$$\nafter");
        assert_eq!(out.text, "before\n@@BLOCKMATH0@@\nafter");
        assert_eq!(out.blocks, vec!["a^2 + b^2"]);
    }

    #[test]
    fn test_extracts_multiple_blocks_in_order() {
        let out = extract_block_math("$$x$$ and $$y$$");
        assert_eq!(out.text, "@@BLOCKMATH0@@ and @@BLOCKMATH1@@");
        assert_eq!(out.blocks, vec!["x", "y"]);
    }

    #[test]
    fn test_fenced_code_is_untouched() {
        let input = "```tex\n$$x$$\n```\n$$y$$";
        let out = extract_block_math(input);
        assert_eq!(out.text, "```tex\n$$x$$\n```\n@@BLOCKMATH0@@");
        assert_eq!(out.blocks, vec!["y"]);
    }

    #[test]
    fn test_closing_fence_line_kept_whole() {
        // Text after the closing fence on the same line is copied verbatim
        let out = extract_block_math("```a```$$z$$\nnext $$w$$");
        assert_eq!(out.text, "```a```$$z$$\nnext @@BLOCKMATH0@@");
        assert_eq!(out.blocks, vec!["w"]);
    }

    #[test]
    fn test_unterminated_fence_copies_rest() {
        let input = "text\n```\n$$x$$ never closed";
        let out = extract_block_math(input);
        assert_eq!(out.text, input);
        assert!(out.blocks.is_empty());
    }

    #[test]
    fn test_unterminated_math_copies_rest() {
        let input = "cost is $$5 and rising";
        let out = extract_block_math(input);
        assert_eq!(out.text, input);
        assert!(out.blocks.is_empty());
    }

    #[test]
    fn test_inline_math_untouched() {
        let out = extract_block_math("inline $x$ stays");
        assert_eq!(out.text, "inline $x$ stays");
        assert!(out.blocks.is_empty());
    }

    #[test]
    fn test_multibyte_text() {
        let out = extract_block_math("Привет $$\\alpha$$ мир");
        assert_eq!(out.text, "Привет @@BLOCKMATH0@@ мир");
        assert_eq!(out.blocks, vec!["\\alpha"]);
    }

    #[test]
    fn test_restore() {
        let html = "<p>@@BLOCKMATH0@@</p>\n<p>@@BLOCKMATH1@@</p>";
        let restored = restore_block_math(html, &["x".into(), "y".into()]);
        assert_eq!(
            restored,
            "<p><div class=\"math-display\">$$\nx\n$$</div></p>\n<p><div class=\"math-display\">$$\ny\n$$</div></p>"
        );
    }

    #[test]
    fn test_restore_replaces_first_occurrence_only() {
        let restored = restore_block_math("@@BLOCKMATH0@@ @@BLOCKMATH0@@", &["x".into()]);
        assert!(restored.ends_with(" @@BLOCKMATH0@@"));
    }
}
