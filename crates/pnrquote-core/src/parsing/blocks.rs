use super::segment::is_segment_line;

/// True if the document carries the multi-option `==` delimiter.
pub fn is_multi(text: &str) -> bool {
    text.contains("==")
}

/// Split the document into option blocks on lines made only of `=` (two or more).
///
/// Blank blocks are dropped. A document without delimiters, or with nothing
/// but blank blocks, is returned as a single block.
pub fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if is_delimiter(line) {
            blocks.push(std::mem::take(&mut current));
        } else {
            current.push(line);
        }
    }
    blocks.push(current);

    let non_blank: Vec<Vec<&str>> = blocks
        .into_iter()
        .filter(|b| b.iter().any(|l| !l.trim().is_empty()))
        .collect();

    if non_blank.is_empty() {
        vec![text.lines().collect()]
    } else {
        non_blank
    }
}

fn is_delimiter(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 2 && t.chars().all(|c| c == '=')
}

/// Index of the first body line after the reservation header, or 0.
///
/// Raw reservation dumps start each block with a locator line and a
/// passenger name line. Those two lines are dropped when neither is a
/// segment line and a segment line follows them; blocks that open with a
/// segment, or that have no segments at all, are kept whole.
pub fn header_end(lines: &[&str]) -> usize {
    let non_blank: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, _)| i)
        .collect();

    if non_blank.len() < 3 {
        return 0;
    }

    let (first, second) = (non_blank[0], non_blank[1]);
    if is_segment_line(lines[first]) || is_segment_line(lines[second]) {
        return 0;
    }

    let has_itinerary = lines[second + 1..].iter().any(|l| is_segment_line(l));
    if has_itinerary {
        second + 1
    } else {
        0
    }
}
