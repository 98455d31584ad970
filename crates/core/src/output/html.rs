use super::{format_size, Metadata};
use crate::dirstat::DirStatResult;
use crate::dupfind::DuplicateResult;
use crate::exclusions::ExclusionRecord;
use crate::rename::RenameResult;
use std::io::{self, Write};

const STYLE: &str = r#"        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            padding: 20px;
            background-color: #f5f5f5;
        }
        .container {
            max-width: 1200px;
            margin: 0 auto;
            background: white;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
            padding: 30px;
        }
        h1 { color: #333; border-bottom: 2px solid #007acc; padding-bottom: 10px; }
        h2 { color: #333; margin-top: 30px; }
        .summary { background: #e9ecef; padding: 15px; border-radius: 6px; margin-bottom: 20px; }
        .stat { font-weight: bold; color: #007acc; margin-right: 20px; }
        .notice { background: #fff3cd; color: #856404; padding: 12px 15px; border-radius: 6px; margin-bottom: 20px; font-weight: bold; }
        .empty { text-align: center; color: #666; font-size: 18px; padding: 40px; }
        .group { margin-bottom: 30px; border: 1px solid #ddd; border-radius: 6px; overflow: hidden; }
        .group-header { background: #f8f9fa; padding: 15px 20px; border-bottom: 1px solid #ddd; }
        .hash { font-family: monospace; color: #007acc; font-weight: bold; }
        .size { color: #666; font-size: 14px; margin-left: 10px; }
        .files { list-style: none; padding: 0; margin: 0; }
        .files li { padding: 10px 20px; border-bottom: 1px solid #eee; font-family: monospace; }
        .files li:last-child { border-bottom: none; }
        table { width: 100%; border-collapse: collapse; margin-top: 10px; }
        th, td { border: 1px solid #ddd; padding: 8px 12px; text-align: left; }
        th { background-color: #f8f9fa; font-weight: 600; }
        tr:nth-child(even) { background-color: #f8f9fa; }
        td.path { font-family: monospace; }
        td.error { color: #dc3545; }
        .footer { margin-top: 40px; border-top: 1px solid #ddd; padding-top: 15px; color: #666; font-size: 13px; }
"#;

pub(super) fn duplicates(result: &DuplicateResult, out: &mut dyn Write) -> io::Result<()> {
    open_document(out, "Duplicate Files Report")?;

    if !result.found {
        writeln!(out, r#"        <div class="empty">No duplicate files found.</div>"#)?;
    } else {
        let total_files: usize = result.groups.iter().map(|group| group.files.len()).sum();
        writeln!(out, r#"        <div class="summary">"#)?;
        writeln!(
            out,
            r#"            <span class="stat">{} duplicate groups found</span>"#,
            result.groups.len()
        )?;
        writeln!(
            out,
            r#"            <span class="stat">{total_files} total duplicate files</span>"#
        )?;
        writeln!(out, "        </div>")?;

        for group in &result.groups {
            let size = if group.size >= 0 {
                format!("{} bytes", group.size)
            } else {
                "unknown size".to_string()
            };
            writeln!(out, r#"        <div class="group">"#)?;
            writeln!(
                out,
                r#"            <div class="group-header"><span class="hash" title="{}">{}</span><span class="size">{} ({} files)</span></div>"#,
                group.hash_type,
                escape(&group.hash),
                size,
                group.files.len()
            )?;
            writeln!(out, r#"            <ul class="files">"#)?;
            for file in &group.files {
                writeln!(
                    out,
                    "                <li>{}</li>",
                    escape(&file.display().to_string())
                )?;
            }
            writeln!(out, "            </ul>")?;
            writeln!(out, "        </div>")?;
        }
    }

    close_document(out, &result.exclusions, result.metadata.as_ref())
}

pub(super) fn rename(result: &RenameResult, out: &mut dyn Write) -> io::Result<()> {
    open_document(out, "Rename Files Report")?;

    if result.dry_run {
        writeln!(
            out,
            r#"        <div class="notice">DRY RUN: no files were renamed. Use --force to apply.</div>"#
        )?;
    }

    if result.operations.is_empty() {
        writeln!(out, r#"        <div class="empty">No files matched the pattern.</div>"#)?;
    } else {
        let failed = result.operations.iter().filter(|op| !op.is_ok()).count();
        writeln!(out, r#"        <div class="summary">"#)?;
        writeln!(
            out,
            r#"            <span class="stat">{} rename operations</span>"#,
            result.operations.len()
        )?;
        writeln!(out, r#"            <span class="stat">{failed} failed</span>"#)?;
        writeln!(out, "        </div>")?;

        writeln!(out, "        <table>")?;
        writeln!(
            out,
            "            <tr><th>Old path</th><th>New path</th><th>Status</th></tr>"
        )?;
        for op in &result.operations {
            let status = if op.is_ok() {
                "<td>ok</td>".to_string()
            } else {
                format!(r#"<td class="error">{}</td>"#, escape(&op.error))
            };
            writeln!(
                out,
                r#"            <tr><td class="path">{}</td><td class="path">{}</td>{status}</tr>"#,
                escape(&op.old_path.display().to_string()),
                escape(&op.new_path.display().to_string())
            )?;
        }
        writeln!(out, "        </table>")?;
    }

    close_document(out, &result.exclusions, result.metadata.as_ref())
}

pub(super) fn dirstat(result: &DirStatResult, out: &mut dyn Write) -> io::Result<()> {
    open_document(out, "Directory Statistics Report")?;

    writeln!(out, r#"        <div class="summary">"#)?;
    writeln!(
        out,
        r#"            <span class="stat">{} files</span>"#,
        result.total_files
    )?;
    writeln!(
        out,
        r#"            <span class="stat">{}</span>"#,
        format_size(result.total_size)
    )?;
    if let Some(largest) = &result.largest_file {
        writeln!(
            out,
            r#"            <span class="stat">Largest: {} ({})</span>"#,
            escape(&largest.path.display().to_string()),
            format_size(largest.size)
        )?;
    }
    writeln!(out, "        </div>")?;

    if !result.file_types.is_empty() {
        writeln!(out, "        <h2>File types</h2>")?;
        writeln!(out, "        <table>")?;
        writeln!(
            out,
            "            <tr><th>Extension</th><th>Count</th><th>Size</th><th>Percent</th></tr>"
        )?;
        for ft in &result.file_types {
            writeln!(
                out,
                "            <tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}%</td></tr>",
                escape(&ft.extension),
                ft.count,
                format_size(ft.total_size),
                ft.percentage
            )?;
        }
        writeln!(out, "        </table>")?;
    }

    if !result.directories.is_empty() {
        writeln!(out, "        <h2>Subdirectories</h2>")?;
        writeln!(out, "        <table>")?;
        writeln!(
            out,
            "            <tr><th>Path</th><th>Files</th><th>Size</th><th>Percent</th></tr>"
        )?;
        for dir in &result.directories {
            writeln!(
                out,
                r#"            <tr><td class="path">{}</td><td>{}</td><td>{}</td><td>{:.2}%</td></tr>"#,
                escape(&dir.path.display().to_string()),
                dir.file_count,
                format_size(dir.total_size),
                dir.percentage
            )?;
        }
        writeln!(out, "        </table>")?;
    }

    close_document(out, &result.exclusions, result.metadata.as_ref())
}

fn open_document(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, r#"<html lang="en">"#)?;
    writeln!(out, "<head>")?;
    writeln!(out, r#"    <meta charset="UTF-8">"#)?;
    writeln!(
        out,
        r#"    <meta name="viewport" content="width=device-width, initial-scale=1.0">"#
    )?;
    writeln!(out, "    <title>{title}</title>")?;
    writeln!(out, "    <style>")?;
    write!(out, "{STYLE}")?;
    writeln!(out, "    </style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, r#"    <div class="container">"#)?;
    writeln!(out, "        <h1>{title}</h1>")
}

fn close_document(
    out: &mut dyn Write,
    exclusions: &[ExclusionRecord],
    metadata: Option<&Metadata>,
) -> io::Result<()> {
    if !exclusions.is_empty() {
        writeln!(out, "        <h2>Exclusions ({})</h2>", exclusions.len())?;
        writeln!(out, "        <table>")?;
        writeln!(out, "            <tr><th>Path</th><th>Reason</th></tr>")?;
        for record in exclusions {
            writeln!(
                out,
                r#"            <tr><td class="path">{}</td><td>{}</td></tr>"#,
                escape(&record.path.display().to_string()),
                record.reason
            )?;
        }
        writeln!(out, "        </table>")?;
    }

    if let Some(meta) = metadata {
        writeln!(out, r#"        <div class="footer">"#)?;
        writeln!(
            out,
            "            Generated by {} {} v{} on {}",
            escape(&meta.tool_name),
            escape(&meta.sub_command),
            escape(&meta.version),
            escape(&meta.generated_at)
        )?;
        if !meta.flags.is_empty() {
            writeln!(out, "            <br>Flags: {}", escape(&meta.flags_line()))?;
        }
        writeln!(out, "        </div>")?;
    }

    writeln!(out, "    </div>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
