//! Writing side: the token-level [`Writer`] and the scope layer that keeps
//! emitted documents structurally valid by construction.

mod writer;

pub use writer::{escape_string, format_float, Writer};

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::options::WriteOptions;
use crate::types::{IntegerLiteral, Table, Value};

impl<W: Write> Writer<W> {
    /// Opens the document root: a table body without parentheses.
    pub fn document(&mut self, options: WriteOptions) -> TableWriter<'_, W> {
        TableWriter {
            writer: self,
            options,
            count: 0,
            pending: false,
            root: true,
            done: false,
        }
    }
}

/// Scope for writing key/value entries into a table (or the document
/// root). Finishing consumes the scope, so a closed table cannot be
/// written to; a scope dropped without `finish` closes itself on a
/// best-effort basis.
pub struct TableWriter<'w, W: Write> {
    writer: &'w mut Writer<W>,
    options: WriteOptions,
    count: usize,
    pending: bool,
    root: bool,
    done: bool,
}

impl<'w, W: Write> TableWriter<'w, W> {
    pub fn add_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.before_entry(key)?;
        self.writer.write_string(value, self.options.quoted)
    }

    pub fn add_integer(&mut self, key: &str, value: impl itoa::Integer) -> Result<()> {
        self.before_entry(key)?;
        self.writer.write_integer(value)
    }

    pub fn add_float(&mut self, key: &str, value: f64) -> Result<()> {
        self.before_entry(key)?;
        self.writer.write_float(value)
    }

    pub fn add_literal(&mut self, key: &str, literal: &IntegerLiteral) -> Result<()> {
        self.before_entry(key)?;
        self.writer.write_literal(literal)
    }

    /// Writes an owned tree value of any kind under `key`, recursing into
    /// arrays and tables.
    pub fn add_value(&mut self, key: &str, value: &Value) -> Result<()> {
        match value {
            Value::Integer(literal) => self.add_literal(key, literal),
            Value::String(string) => self.add_string(key, string),
            Value::Array(array) => {
                let mut scope = self.begin_array(key)?;
                for item in array {
                    scope.push_value(item)?;
                }
                scope.finish()
            }
            Value::Table(table) => {
                let mut scope = self.begin_table(key)?;
                for (name, entry) in table.iter() {
                    scope.add_value(name, entry)?;
                }
                scope.finish()
            }
        }
    }

    /// Opens a nested table under `key`. The parent is unusable until the
    /// child scope is finished or dropped.
    pub fn begin_table(&mut self, key: &str) -> Result<TableWriter<'_, W>> {
        self.begin_table_with(key, self.options)
    }

    pub fn begin_array(&mut self, key: &str) -> Result<ArrayWriter<'_, W>> {
        self.begin_array_with(key, self.options)
    }

    /// Nested scope with its own layout options, e.g. an inline table
    /// inside a multi-line document. The child's layout governs how its
    /// brackets sit on the page.
    pub fn begin_table_with(
        &mut self,
        key: &str,
        options: WriteOptions,
    ) -> Result<TableWriter<'_, W>> {
        self.before_entry(key)?;
        if options.multi_line {
            self.writer.new_line()?;
            self.writer.write_indentation()?;
        }
        self.writer.enter_table()?;
        self.writer.enter_level();
        Ok(TableWriter {
            options,
            count: 0,
            pending: options.multi_line,
            root: false,
            done: false,
            writer: &mut *self.writer,
        })
    }

    pub fn begin_array_with(
        &mut self,
        key: &str,
        options: WriteOptions,
    ) -> Result<ArrayWriter<'_, W>> {
        self.before_entry(key)?;
        if options.multi_line {
            self.writer.new_line()?;
            self.writer.write_indentation()?;
        }
        self.writer.enter_array()?;
        self.writer.enter_level();
        Ok(ArrayWriter {
            options,
            count: 0,
            pending: options.multi_line,
            done: false,
            writer: &mut *self.writer,
        })
    }

    /// Emits a comment. Line comments own their line in multi-line layout;
    /// inline layout uses block comments so later entries stay readable.
    pub fn comment(&mut self, text: &str) -> Result<()> {
        if self.options.multi_line {
            if self.pending {
                self.writer.new_line()?;
            }
            self.writer.write_indentation()?;
            self.writer.line_comment(text)?;
        } else {
            if self.pending {
                self.writer.space()?;
            }
            self.writer.block_comment(text)?;
        }
        self.pending = true;
        Ok(())
    }

    /// Closes the scope. Taking `self` by value makes a second close a
    /// compile error rather than a malformed document.
    pub fn finish(mut self) -> Result<()> {
        self.done = true;
        self.close()
    }

    fn before_entry(&mut self, key: &str) -> Result<()> {
        self.separate()?;
        self.writer.write_key(key)?;
        self.count += 1;
        self.pending = true;
        Ok(())
    }

    fn separate(&mut self) -> Result<()> {
        if self.count > 0 && self.options.comma {
            self.writer.write_comma()?;
        }
        if self.options.multi_line {
            if self.pending {
                self.writer.new_line()?;
            }
            self.writer.write_indentation()?;
        } else if self.pending {
            self.writer.space()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.root {
            if self.options.multi_line && self.pending {
                self.writer.new_line()?;
            }
            return Ok(());
        }
        self.writer.leave_level();
        if self.options.multi_line {
            self.writer.new_line()?;
            self.writer.write_indentation()?;
        }
        self.writer.leave_table()
    }
}

impl<W: Write> Drop for TableWriter<'_, W> {
    fn drop(&mut self) {
        if !self.done {
            self.done = true;
            let _ = self.close();
        }
    }
}

/// Scope for writing unkeyed elements into an array.
pub struct ArrayWriter<'w, W: Write> {
    writer: &'w mut Writer<W>,
    options: WriteOptions,
    count: usize,
    pending: bool,
    done: bool,
}

impl<'w, W: Write> ArrayWriter<'w, W> {
    pub fn push_string(&mut self, value: &str) -> Result<()> {
        self.before_element()?;
        self.writer.write_string(value, self.options.quoted)
    }

    pub fn push_integer(&mut self, value: impl itoa::Integer) -> Result<()> {
        self.before_element()?;
        self.writer.write_integer(value)
    }

    pub fn push_float(&mut self, value: f64) -> Result<()> {
        self.before_element()?;
        self.writer.write_float(value)
    }

    pub fn push_literal(&mut self, literal: &IntegerLiteral) -> Result<()> {
        self.before_element()?;
        self.writer.write_literal(literal)
    }

    pub fn push_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Integer(literal) => self.push_literal(literal),
            Value::String(string) => self.push_string(string),
            Value::Array(array) => {
                let mut scope = self.begin_array()?;
                for item in array {
                    scope.push_value(item)?;
                }
                scope.finish()
            }
            Value::Table(table) => {
                let mut scope = self.begin_table()?;
                for (name, entry) in table.iter() {
                    scope.add_value(name, entry)?;
                }
                scope.finish()
            }
        }
    }

    /// Opens an anonymous table element.
    pub fn begin_table(&mut self) -> Result<TableWriter<'_, W>> {
        self.before_element()?;
        self.writer.enter_table()?;
        self.writer.enter_level();
        Ok(TableWriter {
            options: self.options,
            count: 0,
            pending: self.options.multi_line,
            root: false,
            done: false,
            writer: &mut *self.writer,
        })
    }

    pub fn begin_array(&mut self) -> Result<ArrayWriter<'_, W>> {
        self.before_element()?;
        self.writer.enter_array()?;
        self.writer.enter_level();
        Ok(ArrayWriter {
            options: self.options,
            count: 0,
            pending: self.options.multi_line,
            done: false,
            writer: &mut *self.writer,
        })
    }

    pub fn comment(&mut self, text: &str) -> Result<()> {
        if self.options.multi_line {
            if self.pending {
                self.writer.new_line()?;
            }
            self.writer.write_indentation()?;
            self.writer.line_comment(text)?;
        } else {
            if self.pending {
                self.writer.space()?;
            }
            self.writer.block_comment(text)?;
        }
        self.pending = true;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.done = true;
        self.close()
    }

    fn before_element(&mut self) -> Result<()> {
        if self.count > 0 && self.options.comma {
            self.writer.write_comma()?;
        }
        if self.options.multi_line {
            if self.pending {
                self.writer.new_line()?;
            }
            self.writer.write_indentation()?;
        } else if self.pending {
            self.writer.space()?;
        }
        self.count += 1;
        self.pending = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.writer.leave_level();
        if self.options.multi_line {
            self.writer.new_line()?;
            self.writer.write_indentation()?;
        }
        self.writer.leave_array()
    }
}

impl<W: Write> Drop for ArrayWriter<'_, W> {
    fn drop(&mut self) {
        if !self.done {
            self.done = true;
            let _ = self.close();
        }
    }
}

/// Renders a table as document text.
pub fn to_string(table: &Table, options: WriteOptions) -> Result<String> {
    let mut buffer = Vec::new();
    to_writer(&mut buffer, table, options)?;
    // the writer only ever emits valid UTF-8
    Ok(String::from_utf8(buffer).expect("writer output is UTF-8"))
}

/// Renders a table into any sink.
pub fn to_writer<W: Write>(out: W, table: &Table, options: WriteOptions) -> Result<()> {
    let mut writer = Writer::new(out);
    let mut root = writer.document(options);
    for (key, value) in table.iter() {
        root.add_value(key, value)?;
    }
    root.finish()?;
    writer.flush()
}

/// Writes a document file via a populate callback. Returns whether the
/// file was written and flushed successfully.
pub fn save_to_path<P: AsRef<Path>>(
    path: P,
    options: WriteOptions,
    populate: impl FnOnce(&mut TableWriter<'_, io::BufWriter<fs::File>>) -> Result<()>,
) -> bool {
    fn save(
        path: &Path,
        options: WriteOptions,
        populate: impl FnOnce(&mut TableWriter<'_, io::BufWriter<fs::File>>) -> Result<()>,
    ) -> Result<()> {
        let file = fs::File::create(path)?;
        let mut writer = Writer::new(io::BufWriter::new(file));
        let mut root = writer.document(options);
        populate(&mut root)?;
        root.finish()?;
        writer.flush()
    }
    save(path.as_ref(), options, populate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(
        options: WriteOptions,
        populate: impl FnOnce(&mut TableWriter<'_, &mut Vec<u8>>) -> Result<()>,
    ) -> String {
        let mut buffer = Vec::new();
        let mut writer = Writer::new(&mut buffer);
        let mut root = writer.document(options);
        populate(&mut root).unwrap();
        root.finish().unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[rstest::rstest]
    fn test_multi_line_layout() {
        let text = rendered(WriteOptions::default(), |root| {
            root.add_integer("width", 800)?;
            root.add_integer("height", 600)?;
            let mut view = root.begin_table("view")?;
            view.add_integer("x", 0)?;
            view.finish()
        });
        assert_eq!(text, "width = 800\nheight = 600\nview = \n(\n\tx = 0\n)\n");
    }

    #[rstest::rstest]
    fn test_inline_layout() {
        let text = rendered(WriteOptions::inline(), |root| {
            root.add_integer("a", 1)?;
            root.add_string("b", "two")?;
            let mut inner = root.begin_table("c")?;
            inner.add_integer("d", 3)?;
            inner.finish()
        });
        assert_eq!(text, "a = 1, b = \"two\", c = (d = 3)");
    }

    #[rstest::rstest]
    fn test_array_layouts() {
        let text = rendered(WriteOptions::inline(), |root| {
            let mut list = root.begin_array("list")?;
            list.push_integer(1)?;
            list.push_float(0.5)?;
            list.push_string("x")?;
            list.finish()
        });
        assert_eq!(text, "list = {1, 0.5, \"x\"}");

        let text = rendered(WriteOptions::default(), |root| {
            let mut list = root.begin_array("list")?;
            list.push_integer(1)?;
            list.push_integer(2)?;
            list.finish()
        });
        assert_eq!(text, "list = \n{\n\t1\n\t2\n}\n");
    }

    #[rstest::rstest]
    fn test_mixed_layout_with_scope_options() {
        let text = rendered(WriteOptions::default(), |root| {
            root.add_integer("a", 1)?;
            let mut inner = root.begin_table_with("point", WriteOptions::inline())?;
            inner.add_integer("x", 3)?;
            inner.add_integer("y", 4)?;
            inner.finish()?;
            root.add_integer("b", 2)
        });
        assert_eq!(text, "a = 1\npoint = (x = 3, y = 4)\nb = 2\n");
    }

    #[rstest::rstest]
    fn test_unquoted_strings() {
        let options = WriteOptions::inline().with_quoted(false);
        let text = rendered(options, |root| root.add_string("key", "bare"));
        assert_eq!(text, "key = bare");
    }

    #[rstest::rstest]
    fn test_dropped_scope_still_closes() {
        let text = rendered(WriteOptions::inline(), |root| {
            let mut inner = root.begin_table("t")?;
            inner.add_integer("a", 1)?;
            drop(inner);
            root.add_integer("b", 2)
        });
        assert_eq!(text, "t = (a = 1), b = 2");
    }

    #[rstest::rstest]
    fn test_comments_in_both_layouts() {
        let text = rendered(WriteOptions::default(), |root| {
            root.comment("header")?;
            root.add_integer("a", 1)
        });
        assert_eq!(text, "// header\na = 1\n");

        let text = rendered(WriteOptions::inline(), |root| {
            root.add_integer("a", 1)?;
            root.comment("note")?;
            root.add_integer("b", 2)
        });
        assert_eq!(text, "a = 1 /* note */, b = 2");
    }

    #[rstest::rstest]
    fn test_empty_document_writes_nothing() {
        let text = rendered(WriteOptions::default(), |_| Ok(()));
        assert_eq!(text, "");
    }

    #[rstest::rstest]
    fn test_to_string_round_trips_tree() {
        let parsed = crate::decode::from_str("a = 1, t = (b = \"x\")").unwrap();
        let text = to_string(&parsed, WriteOptions::inline()).unwrap();
        assert_eq!(text, "a = 1, t = (b = \"x\")");
    }

    #[rstest::rstest]
    fn test_save_to_path_reports_success() {
        let path = std::env::temp_dir().join("sff_writer_test.sff");
        let saved = save_to_path(&path, WriteOptions::default(), |root| {
            root.add_integer("a", 1)
        });
        assert!(saved);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "a = 1\n");
        let _ = std::fs::remove_file(&path);

        let bad = std::env::temp_dir().join("missing_dir").join("x.sff");
        assert!(!save_to_path(&bad, WriteOptions::default(), |_| Ok(())));
    }
}
