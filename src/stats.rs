use crate::types::DirectoryNode;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color, Table};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub directories: usize,
    pub files: usize,
    pub total_bytes: u64,
    pub hashed_files: usize,
    pub unique_digests: usize,
    pub duplicate_files: usize,
    pub duplicate_groups: usize,
    pub wasted_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub digest: String,
    pub size: u64,
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Bytes that would be freed by keeping a single copy.
    #[must_use]
    pub fn wasted_bytes(&self) -> u64 {
        self.size
            .saturating_mul((self.paths.len() as u64).saturating_sub(1))
    }
}

/// Files grouped by digest, in pre-order of first appearance. Unhashed files are left out.
fn group_by_digest(root: &DirectoryNode) -> Vec<DuplicateGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for node in root.walk() {
        for file in &node.files {
            let Some(digest) = file.digest.as_deref() else {
                continue;
            };
            let path = file.path.clone();
            match index.get(digest) {
                Some(&i) => groups[i].paths.push(path),
                None => {
                    index.insert(digest, groups.len());
                    groups.push(DuplicateGroup {
                        digest: digest.to_string(),
                        size: file.size,
                        paths: vec![path],
                    });
                }
            }
        }
    }

    groups
}

#[must_use]
pub fn calculate_stats(root: &DirectoryNode) -> IndexStats {
    let groups = group_by_digest(root);
    let duplicates: Vec<_> = groups.iter().filter(|g| g.paths.len() > 1).collect();

    IndexStats {
        directories: root.directory_count(),
        files: root.file_count(),
        total_bytes: root.total_bytes(),
        hashed_files: groups.iter().map(|g| g.paths.len()).sum(),
        unique_digests: groups.len(),
        duplicate_files: duplicates.iter().map(|g| g.paths.len() - 1).sum(),
        duplicate_groups: duplicates.len(),
        wasted_bytes: duplicates.iter().map(|g| g.wasted_bytes()).sum(),
    }
}

/// Groups of two or more files sharing a digest, largest waste first.
#[must_use]
pub fn find_duplicates(root: &DirectoryNode) -> Vec<DuplicateGroup> {
    let mut groups: Vec<_> = group_by_digest(root)
        .into_iter()
        .filter(|g| g.paths.len() > 1)
        .collect();
    groups.sort_by(|a, b| {
        b.wasted_bytes()
            .cmp(&a.wasted_bytes())
            .then_with(|| a.digest.cmp(&b.digest))
    });
    groups
}

/// Full paths of every file whose digest matches, in pre-order.
#[must_use]
pub fn find_by_digest(root: &DirectoryNode, digest: &str) -> Vec<PathBuf> {
    let wanted = digest.trim();
    root.walk()
        .flat_map(|node| {
            node.files
                .iter()
                .filter(|f| {
                    f.digest
                        .as_deref()
                        .is_some_and(|d| d.eq_ignore_ascii_case(wanted))
                })
                .map(|f| f.path.clone())
        })
        .collect()
}

pub fn print_stats_table(stats: &IndexStats) {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_HORIZONTAL_ONLY);
    table.set_header(vec!["Metric", "Value"]);

    table.add_row(vec![Cell::new("Directories"), Cell::new(stats.directories)]);
    table.add_row(vec![Cell::new("Files"), Cell::new(stats.files)]);
    table.add_row(vec![
        Cell::new("Total size"),
        Cell::new(format!(
            "{} ({} bytes)",
            human_bytes::human_bytes(stats.total_bytes as f64),
            stats.total_bytes
        )),
    ]);

    if stats.hashed_files > 0 {
        table.add_row(vec![Cell::new("Hashed files"), Cell::new(stats.hashed_files)]);
        table.add_row(vec![
            Cell::new("Unique digests"),
            Cell::new(stats.unique_digests),
        ]);
        table.add_row(vec![
            Cell::new("Duplicate files"),
            Cell::new(stats.duplicate_files).fg(if stats.duplicate_files > 0 {
                Color::Yellow
            } else {
                Color::White
            }),
        ]);
        table.add_row(vec![
            Cell::new("Duplicate groups"),
            Cell::new(stats.duplicate_groups),
        ]);
        table.add_row(vec![
            Cell::new("Wasted space").add_attribute(Attribute::Bold),
            Cell::new(human_bytes::human_bytes(stats.wasted_bytes as f64))
                .add_attribute(Attribute::Bold),
        ]);
    }

    println!("{table}");
}

pub fn print_duplicates(groups: &[DuplicateGroup]) {
    if groups.is_empty() {
        println!("No duplicate files found.");
        return;
    }

    let total_files: usize = groups.iter().map(|g| g.paths.len()).sum();
    let wasted: u64 = groups.iter().map(DuplicateGroup::wasted_bytes).sum();
    println!(
        "Found {} duplicate files in {} groups, potential savings: {}",
        total_files,
        groups.len(),
        human_bytes::human_bytes(wasted as f64).yellow()
    );

    for group in groups {
        println!(
            "\n{} ({} each)",
            group.digest.cyan(),
            human_bytes::human_bytes(group.size as f64)
        );
        for path in &group.paths {
            println!("  {}", path.display());
        }
    }
}
