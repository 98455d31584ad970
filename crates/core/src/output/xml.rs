use super::Metadata;
use crate::dirstat::DirStatResult;
use crate::dupfind::DuplicateResult;
use crate::exclusions::ExclusionRecord;
use crate::rename::RenameResult;
use std::fmt::Display;
use std::io::{self, Write};

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Minimal indenting element writer; every text node is escaped.
struct XmlWriter<'a> {
    out: &'a mut dyn Write,
    depth: usize,
}

impl<'a> XmlWriter<'a> {
    fn new(out: &'a mut dyn Write) -> io::Result<Self> {
        writeln!(out, "{HEADER}")?;
        Ok(Self { out, depth: 0 })
    }

    fn open(&mut self, tag: &str) -> io::Result<()> {
        writeln!(self.out, "{}<{tag}>", self.indent())?;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self, tag: &str) -> io::Result<()> {
        self.depth -= 1;
        writeln!(self.out, "{}</{tag}>", self.indent())
    }

    fn leaf(&mut self, tag: &str, value: impl Display) -> io::Result<()> {
        writeln!(
            self.out,
            "{}<{tag}>{}</{tag}>",
            self.indent(),
            escape(&value.to_string())
        )
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }

    fn exclusions(&mut self, records: &[ExclusionRecord]) -> io::Result<()> {
        for record in records {
            self.open("exclusions")?;
            self.leaf("path", record.path.display())?;
            self.leaf("reason", record.reason)?;
            self.close("exclusions")?;
        }
        Ok(())
    }

    fn metadata(&mut self, metadata: Option<&Metadata>) -> io::Result<()> {
        let Some(meta) = metadata else {
            return Ok(());
        };
        self.open("metadata")?;
        self.leaf("tool_name", &meta.tool_name)?;
        self.leaf("sub_command", &meta.sub_command)?;
        for flag in &meta.flags {
            self.open("flags")?;
            self.leaf("name", &flag.name)?;
            self.leaf("value", &flag.value)?;
            self.close("flags")?;
        }
        self.leaf("version", &meta.version)?;
        self.leaf("generated_at", &meta.generated_at)?;
        self.close("metadata")
    }
}

pub(super) fn duplicates(result: &DuplicateResult, out: &mut dyn Write) -> io::Result<()> {
    let mut xml = XmlWriter::new(out)?;
    xml.open("DuplicateResult")?;
    for group in &result.groups {
        xml.open("groups")?;
        xml.leaf("hash", &group.hash)?;
        xml.leaf("hash_type", group.hash_type)?;
        xml.leaf("size", group.size)?;
        for file in &group.files {
            xml.leaf("files", file.display())?;
        }
        xml.close("groups")?;
    }
    xml.leaf("found", result.found)?;
    xml.exclusions(&result.exclusions)?;
    xml.metadata(result.metadata.as_ref())?;
    xml.close("DuplicateResult")
}

pub(super) fn rename(result: &RenameResult, out: &mut dyn Write) -> io::Result<()> {
    let mut xml = XmlWriter::new(out)?;
    xml.open("RenameResult")?;
    for op in &result.operations {
        xml.open("operations")?;
        xml.leaf("old_path", op.old_path.display())?;
        xml.leaf("new_path", op.new_path.display())?;
        if !op.is_ok() {
            xml.leaf("error", &op.error)?;
        }
        xml.close("operations")?;
    }
    xml.leaf("dry_run", result.dry_run)?;
    xml.exclusions(&result.exclusions)?;
    xml.metadata(result.metadata.as_ref())?;
    xml.close("RenameResult")
}

pub(super) fn dirstat(result: &DirStatResult, out: &mut dyn Write) -> io::Result<()> {
    let mut xml = XmlWriter::new(out)?;
    xml.open("DirStatResult")?;
    xml.leaf("total_files", result.total_files)?;
    xml.leaf("total_size", result.total_size)?;
    if let Some(largest) = &result.largest_file {
        xml.open("largest_file")?;
        xml.leaf("name", &largest.name)?;
        xml.leaf("size", largest.size)?;
        xml.leaf("path", largest.path.display())?;
        xml.close("largest_file")?;
    }
    for ft in &result.file_types {
        xml.open("file_types")?;
        xml.leaf("extension", &ft.extension)?;
        xml.leaf("count", ft.count)?;
        xml.leaf("total_size", ft.total_size)?;
        xml.leaf("percentage", format!("{:.2}", ft.percentage))?;
        xml.close("file_types")?;
    }
    for dir in &result.directories {
        xml.open("directories")?;
        xml.leaf("path", dir.path.display())?;
        xml.leaf("file_count", dir.file_count)?;
        xml.leaf("total_size", dir.total_size)?;
        xml.leaf("percentage", format!("{:.2}", dir.percentage))?;
        xml.close("directories")?;
    }
    xml.exclusions(&result.exclusions)?;
    xml.metadata(result.metadata.as_ref())?;
    xml.close("DirStatResult")
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
    fn duplicates_have_header_root_and_fields() {
        let xml = render(|out| duplicates(&fixtures::duplicates(), out));
        assert!(xml.starts_with(HEADER));
        assert!(xml.contains("<DuplicateResult>"));
        assert!(xml.contains("<hash>abc123def456</hash>"));
        assert!(xml.contains("<size>1024</size>"));
        assert!(xml.contains("<hash_type>md5</hash_type>"));
        assert!(xml.contains("<found>true</found>"));
        assert!(xml.contains("<reason>dir_pattern</reason>"));
        assert!(xml.trim_end().ends_with("</DuplicateResult>"));
    }

    #[test]
    fn rename_escapes_paths() {
        let xml = render(|out| rename(&fixtures::rename(), out));
        assert!(xml.contains("<old_path>sub/a&amp;b.jpg</old_path>"));
        assert!(xml.contains("<new_path>sub/&lt;b&gt;.jpg</new_path>"));
        assert!(xml.contains("<error>target file already exists</error>"));
        assert_eq!(xml.matches("<error>").count(), 1);
        assert!(xml.contains("<dry_run>true</dry_run>"));
    }

    #[test]
    fn dirstat_nests_elements() {
        let xml = render(|out| dirstat(&fixtures::dirstat(), out));
        assert!(xml.contains("<DirStatResult>\n  <total_files>3</total_files>"));
        assert!(xml.contains("    <name>big.bin</name>"));
        assert!(xml.contains("<percentage>66.67</percentage>"));
        assert!(xml.contains("<sub_command>dirstat</sub_command>"));
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&#34;x&#34;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
