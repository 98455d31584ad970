use super::{format_size, shorten_hash, Metadata};
use crate::dirstat::DirStatResult;
use crate::dupfind::DuplicateResult;
use crate::exclusions::ExclusionRecord;
use crate::rename::RenameResult;
use std::io::{self, Write};

pub(super) fn duplicates(result: &DuplicateResult, out: &mut dyn Write) -> io::Result<()> {
    if !result.found {
        writeln!(out, "No duplicate files found.")?;
    } else {
        writeln!(out, "Duplicate files found:")?;
        for group in &result.groups {
            let mut files = group.files.clone();
            files.sort();
            let Some(first) = files.first() else {
                continue;
            };

            let size = if group.size >= 0 {
                format!("{} bytes", group.size)
            } else {
                "unknown size".to_string()
            };
            let first_name = first
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();

            writeln!(
                out,
                "- {} (size: {}, hash: {})",
                first_name,
                size,
                shorten_hash(&group.hash, 8)
            )?;
            for file in &files {
                writeln!(out, "  - {}", file.display())?;
            }
            writeln!(out)?;
        }
    }

    exclusions(&result.exclusions, out)?;
    footer(result.metadata.as_ref(), out)
}

pub(super) fn rename(result: &RenameResult, out: &mut dyn Write) -> io::Result<()> {
    if result.dry_run {
        writeln!(out, "DRY RUN - no files were renamed (use --force to apply)")?;
    }

    if result.operations.is_empty() {
        writeln!(out, "No files matched the pattern.")?;
    } else {
        let failed = result.operations.iter().filter(|op| !op.is_ok()).count();
        writeln!(
            out,
            "Rename operations: {} ({} failed)",
            result.operations.len(),
            failed
        )?;
        for op in &result.operations {
            if op.is_ok() {
                writeln!(out, "  {} -> {}", op.old_path.display(), op.new_path.display())?;
            } else {
                writeln!(
                    out,
                    "  {} -> {} [ERROR: {}]",
                    op.old_path.display(),
                    op.new_path.display(),
                    op.error
                )?;
            }
        }
    }

    exclusions(&result.exclusions, out)?;
    footer(result.metadata.as_ref(), out)
}

pub(super) fn dirstat(result: &DirStatResult, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Directory statistics")?;
    writeln!(out, "  Total files: {}", result.total_files)?;
    writeln!(out, "  Total size:  {}", format_size(result.total_size))?;
    if let Some(largest) = &result.largest_file {
        writeln!(
            out,
            "  Largest:     {} ({})",
            largest.path.display(),
            format_size(largest.size)
        )?;
    }

    if !result.file_types.is_empty() {
        writeln!(out)?;
        writeln!(out, "File types:")?;
        writeln!(out, "  {:<20} {:>8} {:>12} {:>8}", "Extension", "Count", "Size", "Percent")?;
        for ft in &result.file_types {
            writeln!(
                out,
                "  {:<20} {:>8} {:>12} {:>7.2}%",
                ft.extension,
                ft.count,
                format_size(ft.total_size),
                ft.percentage
            )?;
        }
    }

    if !result.directories.is_empty() {
        writeln!(out)?;
        writeln!(out, "Subdirectories:")?;
        writeln!(out, "  {:<40} {:>8} {:>12} {:>8}", "Path", "Files", "Size", "Percent")?;
        for dir in &result.directories {
            writeln!(
                out,
                "  {:<40} {:>8} {:>12} {:>7.2}%",
                dir.path.display().to_string(),
                dir.file_count,
                format_size(dir.total_size),
                dir.percentage
            )?;
        }
    }

    exclusions(&result.exclusions, out)?;
    footer(result.metadata.as_ref(), out)
}

fn exclusions(records: &[ExclusionRecord], out: &mut dyn Write) -> io::Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Excluded ({}):", records.len())?;
    for record in records {
        writeln!(out, "  {} ({})", record.path.display(), record.reason)?;
    }
    Ok(())
}

fn footer(metadata: Option<&Metadata>, out: &mut dyn Write) -> io::Result<()> {
    let Some(meta) = metadata else {
        return Ok(());
    };
    writeln!(out)?;
    writeln!(
        out,
        "Generated by {} {} v{} on {}",
        meta.tool_name, meta.sub_command, meta.version, meta.generated_at
    )?;
    if !meta.flags.is_empty() {
        writeln!(out, "Flags: {}", meta.flags_line())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        write(&mut buf).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn duplicates_list_sorted_files_with_short_hash() {
        let result = fixtures::duplicates();
        let text = render(|out| duplicates(&result, out));

        assert!(text.starts_with("Duplicate files found:\n"));
        assert!(text.contains("- file1.txt (size: 1024 bytes, hash: abc123de...)"));
        let first = text.find("/path/to/file1.txt").expect("file1");
        let second = text.find("/path/to/file2.txt").expect("file2");
        assert!(first < second, "files are listed alphabetically");
        assert!(text.contains("node_modules (dir_pattern)"));
        assert!(text.contains("Generated by filetools dupfind v0.4.0"));
    }

    #[test]
    fn no_duplicates_is_a_single_line() {
        let text = render(|out| duplicates(&fixtures::no_duplicates(), out));
        assert_eq!(text, "No duplicate files found.\n");
    }

    #[test]
    fn rename_marks_dry_run_and_errors() {
        let text = render(|out| rename(&fixtures::rename(), out));
        assert!(text.starts_with("DRY RUN"));
        assert!(text.contains("  test1.jpg -> renamed1.jpg\n"));
        assert!(text.contains("[ERROR: target file already exists]"));
        assert!(text.contains("Rename operations: 2 (1 failed)"));
    }

    #[test]
    fn dirstat_prints_totals_and_tables() {
        let text = render(|out| dirstat(&fixtures::dirstat(), out));
        assert!(text.contains("Total files: 3"));
        assert!(text.contains("Total size:  3.0 KB"));
        assert!(text.contains("data/big.bin (2.0 KB)"));
        assert!(text.contains("66.67%"));
        assert!(text.contains("Subdirectories:"));
    }
}
