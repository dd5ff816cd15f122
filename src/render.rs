use crate::types::{DirectoryNode, FileRecord};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lines for a tree in pre-order: directory path, its files, then its children.
pub struct Lines<'a> {
    stack: Vec<Step<'a>>,
}

enum Step<'a> {
    Dir(&'a DirectoryNode),
    File(&'a FileRecord),
}

impl<'a> Iterator for Lines<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self.stack.pop()? {
            Step::Dir(node) => {
                self.stack
                    .extend(node.children.iter().rev().map(Step::Dir));
                self.stack.extend(node.files.iter().rev().map(Step::File));
                Some(node.path.display().to_string())
            }
            Step::File(record) => Some(format_record(record)),
        }
    }
}

#[must_use]
pub fn render(node: &DirectoryNode) -> Lines<'_> {
    Lines {
        stack: vec![Step::Dir(node)],
    }
}

/// `size bytes  timestamp  [digest  ]name` with fixed field widths.
#[must_use]
pub fn format_record(record: &FileRecord) -> String {
    let size = group_digits(record.size);
    let modified = record.modified.format(TIMESTAMP_FORMAT).to_string();

    match &record.digest {
        Some(digest) => format!(
            "{size:>12} bytes  {modified:<20}  {digest:<64}  {}",
            record.name
        ),
        None => format!("{size:>12} bytes  {modified:<20}  {}", record.name),
    }
}

/// Decimal with `,` between groups of three digits.
#[must_use]
pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
