/// Decide whether a message should be shown as a structured artifact.
///
/// Cheap marker checks only: a `##` header marker, a pipe table (`|` together
/// with `---`), or a line starting with `- `. The structure itself always
/// comes from the block segmenter.
pub fn is_artifact(text: &str) -> bool {
    let has_header = text.contains("##");
    let has_table = text.contains('|') && text.contains("---");
    let has_bullets = text.lines().any(|line| line.starts_with("- "));

    has_header || has_table || has_bullets
}
