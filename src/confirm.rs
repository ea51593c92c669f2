//! Confirmation prompt shown before apply rewrites files

use std::io::{BufRead, Write};
use std::path::Path;

/// Asks whether to proceed with rewriting the files under `path`
///
/// Only `y` or `yes` (any case) approves; anything else, including end of
/// input, declines.
pub fn confirm_apply(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    path: &Path,
) -> std::io::Result<bool> {
    write!(
        writer,
        "You are about to rewrite dependency versions in {}.\nDo you want to proceed? [y/N] ",
        path.display()
    )?;
    writer.flush()?;

    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
