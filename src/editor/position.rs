//! Mapping between the text widget's `(row, col)` coordinates and buffer
//! byte offsets. Rows are lines of the buffer joined with `\n`; columns are
//! counted in chars, the way tui-textarea reports them.

/// Byte offset of `(row, col)` in `lines.join("\n")`. Both coordinates clamp
/// to the last valid position.
pub fn offset_of<S: AsRef<str>>(lines: &[S], row: usize, col: usize) -> usize {
    if lines.is_empty() {
        return 0;
    }
    let row = row.min(lines.len() - 1);
    let line_start: usize = lines[..row].iter().map(|l| l.as_ref().len() + 1).sum();
    let line = lines[row].as_ref();
    let col_bytes = line
        .char_indices()
        .nth(col)
        .map_or(line.len(), |(byte, _)| byte);
    line_start + col_bytes
}

/// `(row, col)` of a byte offset in `buffer`. Offsets past the end map to the
/// end of the last line; offsets inside a char map to that char.
pub fn position_of(buffer: &str, offset: usize) -> (usize, usize) {
    let offset = super::model::clamp_offset(buffer, offset);
    let before = &buffer[..offset];
    let row = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count();
    (row, col)
}
